// src/access/rules.rs
//
// A tabela plana de regras de acesso consumida pelo gating de UI.
// Ordem de resolução: admin incondicional -> regra customizada exata ->
// tabela padrão embutida.

use crate::models::access::{AccessRule, ComponentKey};
use crate::models::user::Role;

// Padrões embutidos quando não há regra customizada para (componente, papel).
// team_lead supervisiona agentes mas não mexe em esquema de formulário
// nem em configurações do tenant.
pub fn default_allowed(component: ComponentKey, role: Role) -> bool {
    match role {
        Role::Admin | Role::Manager => true,
        Role::TeamLead => matches!(
            component,
            ComponentKey::Dashboard
                | ComponentKey::Leads
                | ComponentKey::History
                | ComponentKey::UserManagement
        ),
        Role::Agent => matches!(component, ComponentKey::Dashboard | ComponentKey::Leads),
    }
}

pub fn resolve(component: ComponentKey, role: Role, custom: &[AccessRule]) -> bool {
    // Admin nunca consulta regra nenhuma
    if role == Role::Admin {
        return true;
    }

    // Regra customizada exata vence, inclusive para negar o que o padrão
    // concederia a um manager
    if let Some(rule) = custom
        .iter()
        .find(|rule| rule.component == component && rule.role == role)
    {
        return rule.allowed;
    }

    default_allowed(component, role)
}
