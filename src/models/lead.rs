// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

// Um lead de vendas. O payload `data` é opaco (validado contra uma
// configuração de formulário externa); este núcleo só conhece as duas
// chaves usadas pela checagem de unicidade: `email` e `phone`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    #[serde(default)]
    pub data: Value,

    pub status: String,

    // Sempre o usuário criador; definido uma única vez, imutável.
    pub owner_id: Uuid,

    pub assigned_to_id: Option<Uuid>,

    // Herdado do criador, ou definido explicitamente por um admin.
    pub branch_id: Option<Uuid>,

    pub is_closed: bool,

    // Preenchido no fechamento e PRESERVADO na reabertura; um novo
    // fechamento sobrescreve o valor anterior.
    pub closed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Lead {
    // Valor não-vazio de `data.email`, já aparado
    pub fn email(&self) -> Option<&str> {
        uniqueness_field(&self.data, "email")
    }

    pub fn phone(&self) -> Option<&str> {
        uniqueness_field(&self.data, "phone")
    }
}

// Extrai um campo de unicidade do payload opaco; strings vazias não contam
pub fn uniqueness_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// Qual campo disparou o conflito de unicidade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateField {
    Email,
    Phone,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateField::Email => f.write_str("email"),
            DuplicateField::Phone => f.write_str("phone"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    pub data: Value,

    #[serde(default = "default_status")]
    pub status: String,

    pub assigned_to_id: Option<Uuid>,

    // Considerado apenas quando o criador é admin; os demais herdam a
    // filial do próprio criador.
    pub branch_id: Option<Uuid>,
}

fn default_status() -> String {
    "New".to_string()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    pub data: Option<Value>,
    pub status: Option<String>,
}

// Filtros composáveis aplicados DEPOIS do recorte por papel (AND entre si)
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFilters {
    // `None` significa "somente abertos"; fechados só entram quando
    // pedidos explicitamente.
    pub is_closed: Option<bool>,

    pub status: Option<String>,

    // Ignorado para agentes (o recorte por papel já restringe)
    pub assigned_to_id: Option<Uuid>,

    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,

    // Busca textual aplicada por último, no cliente, sobre todos os
    // valores do payload opaco.
    pub search_query: Option<String>,
}
