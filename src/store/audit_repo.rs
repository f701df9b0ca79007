// src/store/audit_repo.rs

use std::sync::Arc;

use crate::common::error::AppError;
use crate::models::audit::AuditRecord;
use crate::store::document::DocumentStore;

// Coleção append-only; nada além de inserções
#[derive(Clone)]
pub struct AuditRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl AuditRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self { store, collection }
    }

    pub async fn append(&self, record: &AuditRecord) -> Result<(), AppError> {
        let fields = serde_json::to_value(record)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar auditoria: {e}"))?;
        self.store
            .create(&self.collection, record.id, fields, Vec::new())
            .await?;
        Ok(())
    }
}
