// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// Registro de auditoria gravado em coleção própria, append-only.
// Falha ao gravar nunca derruba a operação principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub action: String,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub target_id: Option<Uuid>,
    pub target_type: String,

    #[serde(default)]
    pub metadata: Value,

    pub performed_at: DateTime<Utc>,
}
