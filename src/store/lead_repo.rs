// src/store/lead_repo.rs

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::lead::Lead;
use crate::store::document::{Document, DocumentStore, Grant, Query};

#[derive(Clone)]
pub struct LeadRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

fn decode(doc: Document) -> Result<Lead, AppError> {
    Ok(serde_json::from_value(doc.fields)
        .map_err(|e| anyhow::anyhow!("Documento de lead inválido: {e}"))?)
}

impl LeadRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self { store, collection }
    }

    pub async fn create(&self, lead: &Lead, acl: Vec<Grant>) -> Result<Lead, AppError> {
        let fields = serde_json::to_value(lead)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar lead: {e}"))?;
        let doc = self
            .store
            .create(&self.collection, lead.id, fields, acl)
            .await?;
        decode(doc)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Lead, AppError> {
        decode(self.store.get(&self.collection, id).await?)
    }

    pub async fn update(&self, lead: &Lead, acl: Option<Vec<Grant>>) -> Result<Lead, AppError> {
        let fields = serde_json::to_value(lead)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar lead: {e}"))?;
        let doc = self
            .store
            .update(&self.collection, lead.id, fields, acl)
            .await?;
        decode(doc)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        Ok(self.store.delete(&self.collection, id).await?)
    }

    pub async fn list(&self, queries: &[Query]) -> Result<Vec<Lead>, AppError> {
        let docs = self.store.list(&self.collection, queries).await?;
        docs.into_iter().map(decode).collect()
    }

    // Varredura global na ordem de iteração do armazenamento; é sobre
    // ela que o validador de unicidade decide o "primeiro" duplicado
    pub async fn list_all(&self) -> Result<Vec<Lead>, AppError> {
        self.list(&[]).await
    }

    pub async fn any_open_in_branch(&self, branch_id: Uuid) -> Result<bool, AppError> {
        let queries = [
            Query::Equal("branchId", json!(branch_id)),
            Query::Equal("isClosed", json!(false)),
        ];
        let docs = self.store.list(&self.collection, &queries).await?;
        Ok(!docs.is_empty())
    }
}
