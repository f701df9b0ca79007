// src/access/hierarchy.rs
//
// Regras puras da hierarquia de quatro papéis: quem cria quem, qual
// subconjunto de filiais pode ser concedido e como os campos de cadeia
// (managerId / teamLeadId) são derivados na criação.

use uuid::Uuid;

use crate::models::user::{Role, User};

// Sucesso sse `target ⊆ creator`. No primeiro id fora do conjunto do
// criador (na ordem de iteração de `target`), devolve esse id.
pub fn validate_branch_subset(creator: &[Uuid], target: &[Uuid]) -> Result<(), Uuid> {
    match target.iter().find(|branch| !creator.contains(branch)) {
        Some(invalid) => Err(*invalid),
        None => Ok(()),
    }
}

// Papéis que cada papel pode provisionar. Agentes não criam ninguém.
pub fn allowed_subordinate_roles(role: Role) -> &'static [Role] {
    match role {
        Role::Admin => &[Role::Manager, Role::TeamLead, Role::Agent],
        Role::Manager => &[Role::TeamLead, Role::Agent],
        Role::TeamLead => &[Role::Agent],
        Role::Agent => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLinks {
    pub manager_id: Option<Uuid>,
    pub team_lead_id: Option<Uuid>,
}

// Deriva os back-references da cadeia para o novo usuário.
// Um agente criado por team lead herda o manager DO TEAM LEAD (nunca o
// id do próprio team lead no campo managerId); é isso que mantém a
// cadeia de três níveis consultável a partir da folha.
pub fn chain_links(creator: &User, target_role: Role) -> ChainLinks {
    match (creator.role, target_role) {
        (Role::Manager, Role::TeamLead) | (Role::Manager, Role::Agent) => ChainLinks {
            manager_id: Some(creator.id),
            team_lead_id: None,
        },
        (Role::TeamLead, Role::Agent) => ChainLinks {
            manager_id: creator.manager_id,
            team_lead_id: Some(creator.id),
        },
        // Admin provisiona fora da cadeia; managers/admins não carregam
        // back-references.
        _ => ChainLinks {
            manager_id: None,
            team_lead_id: None,
        },
    }
}
