// src/access/visibility.rs
//
// O Visibility Filter: predicados puros, dependentes do papel, que
// decidem quais registros uma listagem devolve. Reutilizados por todas
// as operações de consulta dos serviços.

use serde_json::Value;
use uuid::Uuid;

use crate::models::lead::{Lead, LeadFilters};
use crate::models::user::{Role, User};

// Recorte de leads por papel (modelo de 4 papéis, admin acima de managers):
// - admin: tudo
// - manager/team_lead: leads das suas filiais; sem filial atribuída,
//   recua para os leads que o próprio ator criou
// - agente: estritamente os leads atribuídos a ele, sem exceção
pub fn lead_visible(actor: &User, lead: &Lead) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Manager | Role::TeamLead => {
            if actor.branch_ids.is_empty() {
                lead.owner_id == actor.id
            } else {
                lead.branch_id
                    .is_some_and(|branch| actor.branch_ids.contains(&branch))
            }
        }
        Role::Agent => lead.assigned_to_id == Some(actor.id),
    }
}

// Aplica o recorte por papel e depois os filtros composáveis (AND).
// A busca textual vem por último, sobre o payload opaco.
pub fn filter_leads(actor: &User, leads: Vec<Lead>, filters: &LeadFilters) -> Vec<Lead> {
    let needle = filters
        .search_query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);
    let want_closed = filters.is_closed.unwrap_or(false);

    leads
        .into_iter()
        .filter(|lead| lead_visible(actor, lead))
        .filter(|lead| lead.is_closed == want_closed)
        .filter(|lead| {
            filters
                .status
                .as_deref()
                .is_none_or(|status| lead.status == status)
        })
        .filter(|lead| match (actor.role, filters.assigned_to_id) {
            // Filtro de responsável é só para manager/team_lead/admin
            (Role::Agent, _) | (_, None) => true,
            (_, Some(assignee)) => lead.assigned_to_id == Some(assignee),
        })
        .filter(|lead| filters.created_after.is_none_or(|t| lead.created_at >= t))
        .filter(|lead| filters.created_before.is_none_or(|t| lead.created_at <= t))
        .filter(|lead| {
            needle
                .as_deref()
                .is_none_or(|q| value_contains(&lead.data, q))
        })
        .collect()
}

// Substring case-insensitive em qualquer valor do payload. O payload não
// tem esquema, então não dá para indexar isso no servidor.
fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Bool(b) => b.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|item| value_contains(item, needle)),
        Value::Object(map) => map.values().any(|item| value_contains(item, needle)),
        Value::Null => false,
    }
}

// Visibilidade de usuários: interseção não-vazia de filiais.
// Ator sem filial nenhuma vê lista vazia, nunca "vê todo mundo".
pub fn user_visible(actor: &User, candidate: &User) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Manager | Role::TeamLead => candidate
            .branch_ids
            .iter()
            .any(|branch| actor.branch_ids.contains(branch)),
        Role::Agent => false,
    }
}

// Papéis atribuíveis como responsáveis por lead, por papel do ator
pub fn assignable_roles(role: Role) -> &'static [Role] {
    match role {
        Role::Admin => &[Role::TeamLead, Role::Agent],
        Role::Manager => &[Role::TeamLead, Role::Agent],
        Role::TeamLead => &[Role::Agent],
        Role::Agent => &[],
    }
}

// Interseção usada tanto na listagem de usuários quanto nos atribuíveis
pub fn branches_overlap(a: &[Uuid], b: &[Uuid]) -> bool {
    a.iter().any(|branch| b.contains(branch))
}
