// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

// Os quatro papéis da hierarquia. Enum fechado de propósito: adicionar um
// papel novo obriga a revisar todos os `match` do crate em tempo de compilação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    TeamLead,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::TeamLead => "team_lead",
            Role::Agent => "agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Representa um usuário vindo do armazenamento de documentos
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,

    // Cadeia hierárquica: manager -> team_lead -> agent.
    // `team_lead_id` só é preenchido para agentes criados sob um team lead.
    pub manager_id: Option<Uuid>,
    pub team_lead_id: Option<Uuid>,

    // Modelo multi-filial vigente
    #[serde(default)]
    pub branch_ids: Vec<Uuid>,

    // Campo legado do modelo de filial única. Ainda é escrito pelos cascades
    // de atribuição de filial e lido pela guarda de exclusão de filial.
    pub branch_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

// Dados para provisionar um novo usuário na hierarquia
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: String,

    pub role: Role,

    #[serde(default)]
    pub branch_ids: Vec<Uuid>,
}
