// src/models/branch.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Unidade organizacional que delimita a visibilidade de leads e usuários
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchPayload {
    #[validate(length(
        min = 1,
        max = 128,
        message = "O nome da filial deve ter entre 1 e 128 caracteres."
    ))]
    pub name: String,
}
