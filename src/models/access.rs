// src/models/access.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::user::Role;

// As áreas da aplicação controláveis pela tabela de regras
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKey {
    Dashboard,
    Leads,
    History,
    UserManagement,
    FieldManagement,
    Settings,
}

impl ComponentKey {
    pub const ALL: [ComponentKey; 6] = [
        ComponentKey::Dashboard,
        ComponentKey::Leads,
        ComponentKey::History,
        ComponentKey::UserManagement,
        ComponentKey::FieldManagement,
        ComponentKey::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKey::Dashboard => "dashboard",
            ComponentKey::Leads => "leads",
            ComponentKey::History => "history",
            ComponentKey::UserManagement => "user-management",
            ComponentKey::FieldManagement => "field-management",
            ComponentKey::Settings => "settings",
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Uma regra de permissão customizada; unicidade garantida em (component, role)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    pub id: Uuid,
    pub component: ComponentKey,
    pub role: Role,
    pub allowed: bool,
}
