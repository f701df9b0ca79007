// src/store/branch_repo.rs

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::branch::Branch;
use crate::store::document::{Document, DocumentStore, Query};

#[derive(Clone)]
pub struct BranchRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

fn decode(doc: Document) -> Result<Branch, AppError> {
    Ok(serde_json::from_value(doc.fields)
        .map_err(|e| anyhow::anyhow!("Documento de filial inválido: {e}"))?)
}

impl BranchRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self { store, collection }
    }

    // Filiais pertencem ao sistema; nenhuma ACL por documento é anexada
    pub async fn create(&self, branch: &Branch) -> Result<Branch, AppError> {
        let fields = serde_json::to_value(branch)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar filial: {e}"))?;
        let doc = self
            .store
            .create(&self.collection, branch.id, fields, Vec::new())
            .await?;
        decode(doc)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Branch, AppError> {
        decode(self.store.get(&self.collection, id).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Branch>, AppError> {
        let queries = [Query::Equal("name", json!(name))];
        let mut docs = self.store.list(&self.collection, &queries).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        Ok(self.store.delete(&self.collection, id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Branch>, AppError> {
        let docs = self
            .store
            .list(&self.collection, &[Query::OrderDescCreated])
            .await?;
        docs.into_iter().map(decode).collect()
    }
}
