// src/store/access_repo.rs

use serde_json::json;
use std::sync::Arc;

use crate::common::error::AppError;
use crate::models::access::{AccessRule, ComponentKey};
use crate::models::user::Role;
use crate::store::document::{Document, DocumentStore, Query};

#[derive(Clone)]
pub struct AccessRuleRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

fn decode(doc: Document) -> Result<AccessRule, AppError> {
    Ok(serde_json::from_value(doc.fields)
        .map_err(|e| anyhow::anyhow!("Documento de regra de acesso inválido: {e}"))?)
}

impl AccessRuleRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self { store, collection }
    }

    pub async fn list_all(&self) -> Result<Vec<AccessRule>, AppError> {
        let docs = self.store.list(&self.collection, &[]).await?;
        docs.into_iter().map(decode).collect()
    }

    // Unicidade em (component, role): no máximo um documento satisfaz
    pub async fn find(
        &self,
        component: ComponentKey,
        role: Role,
    ) -> Result<Option<AccessRule>, AppError> {
        let queries = [
            Query::Equal("component", json!(component)),
            Query::Equal("role", json!(role)),
        ];
        let mut docs = self.store.list(&self.collection, &queries).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn create(&self, rule: &AccessRule) -> Result<AccessRule, AppError> {
        let fields = serde_json::to_value(rule)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar regra: {e}"))?;
        let doc = self
            .store
            .create(&self.collection, rule.id, fields, Vec::new())
            .await?;
        decode(doc)
    }

    pub async fn update(&self, rule: &AccessRule) -> Result<AccessRule, AppError> {
        let fields = serde_json::to_value(rule)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar regra: {e}"))?;
        let doc = self
            .store
            .update(&self.collection, rule.id, fields, None)
            .await?;
        decode(doc)
    }
}
