// src/store/memory.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::store::document::{Document, DocumentStore, Grant, Query, StoreError};
use crate::store::identity::{IdentityError, IdentityProvider};

// Implementação em memória do armazenamento, usada pelos testes e por
// execuções locais. Cada coleção é um Vec para preservar a ordem de
// inserção; é essa a ordem de iteração que o validador de unicidade
// de leads observa.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Backend("lock interno envenenado".to_string())
}

fn matches(doc: &Document, query: &Query) -> bool {
    match query {
        Query::Equal(field, value) => doc.fields.get(field) == Some(value),
        Query::Contains(field, value) => doc
            .fields
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|items| items.contains(value)),
        Query::GreaterEqual(field, value) => doc
            .fields
            .get(field)
            .and_then(|v| json_cmp(v, value))
            .is_some_and(Ordering::is_ge),
        Query::LessEqual(field, value) => doc
            .fields
            .get(field)
            .and_then(|v| json_cmp(v, value))
            .is_some_and(Ordering::is_le),
        Query::OrderDescCreated => true,
    }
}

// Comparação de valores JSON para os predicados de faixa. Strings que
// parseiam como RFC3339 comparam cronologicamente (datas serializadas).
fn json_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(dx), Ok(dy)) => Some(dx.cmp(&dy)),
                _ => Some(x.as_str().cmp(y.as_str())),
            }
        }
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: Uuid) -> Result<Document, StoreError> {
        let collections = self.collections.read().map_err(|_| lock_poisoned())?;
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id,
            })
    }

    async fn create(
        &self,
        collection: &str,
        id: Uuid,
        fields: Value,
        acl: Vec<Grant>,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().map_err(|_| lock_poisoned())?;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|d| d.id == id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id,
            });
        }

        let doc = Document {
            id,
            collection: collection.to_string(),
            fields,
            acl,
            created_at: Utc::now(),
        };
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        fields: Value,
        acl: Option<Vec<Grant>>,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().map_err(|_| lock_poisoned())?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id,
            })?;

        doc.fields = fields;
        if let Some(acl) = acl {
            doc.acl = acl;
        }
        Ok(doc.clone())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| lock_poisoned())?;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id,
            })?;

        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id,
            });
        }
        Ok(())
    }

    async fn list(&self, collection: &str, queries: &[Query]) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| lock_poisoned())?;
        let mut result: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| queries.iter().all(|q| matches(d, q)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if queries
            .iter()
            .any(|q| matches!(q, Query::OrderDescCreated))
        {
            result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(result)
    }
}

// Provedor de identidade em memória, com a mesma semântica de conflito
// do provedor real (e-mail duplicado -> EmailTaken).
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    identities: RwLock<HashMap<Uuid, String>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    // Auxiliar de teste: a identidade com este e-mail ainda existe?
    pub fn email_exists(&self, email: &str) -> bool {
        self.identities
            .read()
            .ok()
            .is_some_and(|ids| ids.values().any(|e| e == email))
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_identity(
        &self,
        email: &str,
        _password: &str,
        _display_name: &str,
    ) -> Result<Uuid, IdentityError> {
        let mut identities = self
            .identities
            .write()
            .map_err(|_| IdentityError::Provider("lock interno envenenado".to_string()))?;

        if identities.values().any(|e| e == email) {
            return Err(IdentityError::EmailTaken);
        }

        let id = Uuid::new_v4();
        identities.insert(id, email.to_string());
        Ok(id)
    }

    async fn delete_identity(&self, id: Uuid) -> Result<(), IdentityError> {
        let mut identities = self
            .identities
            .write()
            .map_err(|_| IdentityError::Provider("lock interno envenenado".to_string()))?;

        identities
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| IdentityError::Provider(format!("identidade '{id}' não existe")))
    }
}
