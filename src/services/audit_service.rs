// src/services/audit_service.rs

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::models::audit::AuditRecord;
use crate::models::user::User;
use crate::store::AuditRepository;

// Canal lateral de auditoria. Gravação é melhor-esforço: se falhar,
// loga e segue; a operação principal nunca é derrubada por isto.
#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
}

impl AuditService {
    pub fn new(repo: AuditRepository) -> Self {
        Self { repo }
    }

    pub async fn record(
        &self,
        action: &str,
        actor: &User,
        target_id: Option<Uuid>,
        target_type: &str,
        metadata: Value,
    ) {
        let record = AuditRecord {
            id: Uuid::new_v4(),
            action: action.to_string(),
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            target_id,
            target_type: target_type.to_string(),
            metadata,
            performed_at: Utc::now(),
        };

        if let Err(err) = self.repo.append(&record).await {
            tracing::warn!("Falha ao gravar auditoria '{}': {}", action, err);
        }
    }
}
