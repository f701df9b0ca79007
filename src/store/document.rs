// src/store/document.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

// Erros nativos do armazenamento. A mensagem de "não encontrado" é
// propagada sem alteração até o chamador.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Documento '{id}' não encontrado na coleção '{collection}'")]
    NotFound { collection: String, id: Uuid },

    #[error("Documento '{id}' já existe na coleção '{collection}'")]
    AlreadyExists { collection: String, id: Uuid },

    #[error("Falha no armazenamento de documentos: {0}")]
    Backend(String),
}

// Capacidades que uma concessão pode carregar sobre um documento
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Update,
    Delete,
}

// Uma entrada de ACL: (sujeito, conjunto de capacidades)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    pub subject: Uuid,
    pub capabilities: BTreeSet<Capability>,
}

impl Grant {
    pub fn new(subject: Uuid, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            subject,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

// Predicados de consulta suportados pelo armazenamento externo:
// igualdade, "valor ∈ campo-array", faixa e ordenação descendente
// por data de criação. Nada além disso é assumido.
#[derive(Debug, Clone)]
pub enum Query {
    Equal(&'static str, Value),
    Contains(&'static str, Value),
    GreaterEqual(&'static str, Value),
    LessEqual(&'static str, Value),
    OrderDescCreated,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub collection: String,
    pub fields: Value,
    pub acl: Vec<Grant>,
    pub created_at: DateTime<Utc>,
}

// O armazenamento de documentos hospedado, consumido como capacidade.
// `update` sobrescreve os campos por inteiro (cada passo de cascade é
// uma sobrescrita pura, portanto reaplicável com segurança).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: Uuid) -> Result<Document, StoreError>;

    async fn create(
        &self,
        collection: &str,
        id: Uuid,
        fields: Value,
        acl: Vec<Grant>,
    ) -> Result<Document, StoreError>;

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        fields: Value,
        acl: Option<Vec<Grant>>,
    ) -> Result<Document, StoreError>;

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError>;

    async fn list(&self, collection: &str, queries: &[Query]) -> Result<Vec<Document>, StoreError>;
}
