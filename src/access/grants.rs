// src/access/grants.rs
//
// O Permission Grant Computer: função pura de (estado do registro) para
// o conjunto COMPLETO de concessões que deve substituir a ACL atual.
// Toda transição de estado reinvoca isto e regrava a ACL inteira;
// edição incremental de permissão não existe no modelo.

use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::models::lead::Lead;
use crate::models::user::Role;
use crate::store::document::{Capability, Grant};

use Capability::{Delete, Read, Update};

type GrantMap = BTreeMap<Uuid, BTreeSet<Capability>>;

fn add(map: &mut GrantMap, subject: Uuid, capabilities: impl IntoIterator<Item = Capability>) {
    map.entry(subject).or_default().extend(capabilities);
}

fn into_grants(map: GrantMap) -> Vec<Grant> {
    map.into_iter()
        .map(|(subject, capabilities)| Grant::new(subject, capabilities))
        .collect()
}

// ACL de um lead:
// - dono: read/update/delete, sempre
// - responsável (se houver): read/update aberto, somente read fechado.
// Reatribuição cai fora daqui de graça: como a ACL é substituída por
// inteiro, o responsável anterior simplesmente não aparece mais.
pub fn lead_grants(owner_id: Uuid, assigned_to_id: Option<Uuid>, is_closed: bool) -> Vec<Grant> {
    let mut map = GrantMap::new();
    add(&mut map, owner_id, [Read, Update, Delete]);

    if let Some(assignee) = assigned_to_id {
        add(&mut map, assignee, [Read]);
        if !is_closed {
            add(&mut map, assignee, [Update]);
        }
    }
    into_grants(map)
}

pub fn lead_doc_grants(lead: &Lead) -> Vec<Grant> {
    lead_grants(lead.owner_id, lead.assigned_to_id, lead.is_closed)
}

// ACL do documento de usuário, pelo papel do novo usuário:
// - manager (e admin): só o próprio, read/update
// - team_lead: próprio read/update + manager criador read/update/delete
// - agent: próprio read/update + team lead criador read/update + manager
//   da cadeia read/delete (remove, mas quem edita é o team lead)
pub fn user_doc_grants(
    user_id: Uuid,
    role: Role,
    manager_id: Option<Uuid>,
    team_lead_id: Option<Uuid>,
) -> Vec<Grant> {
    let mut map = GrantMap::new();
    add(&mut map, user_id, [Read, Update]);

    match role {
        Role::Admin | Role::Manager => {}
        Role::TeamLead => {
            if let Some(manager) = manager_id {
                add(&mut map, manager, [Read, Update, Delete]);
            }
        }
        Role::Agent => {
            if let Some(team_lead) = team_lead_id {
                add(&mut map, team_lead, [Read, Update]);
            }
            if let Some(manager) = manager_id {
                add(&mut map, manager, [Read, Delete]);
            }
        }
    }
    into_grants(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps_of(grants: &[Grant], subject: Uuid) -> Option<&BTreeSet<Capability>> {
        grants
            .iter()
            .find(|g| g.subject == subject)
            .map(|g| &g.capabilities)
    }

    #[test]
    fn lead_aberto_da_update_ao_responsavel() {
        let owner = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let grants = lead_grants(owner, Some(assignee), false);

        assert_eq!(
            caps_of(&grants, owner),
            Some(&BTreeSet::from([Read, Update, Delete]))
        );
        assert_eq!(
            caps_of(&grants, assignee),
            Some(&BTreeSet::from([Read, Update]))
        );
        assert_eq!(grants.len(), 2);
    }

    #[test]
    fn fechar_rebaixa_o_responsavel_para_somente_leitura() {
        let owner = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let grants = lead_grants(owner, Some(assignee), true);

        let caps = caps_of(&grants, assignee).cloned().unwrap_or_default();
        assert!(caps.contains(&Read));
        assert!(!caps.contains(&Update));
        // O dono não muda com o fechamento
        assert_eq!(
            caps_of(&grants, owner),
            Some(&BTreeSet::from([Read, Update, Delete]))
        );
    }

    #[test]
    fn reatribuicao_zera_o_responsavel_anterior() {
        let owner = Uuid::new_v4();
        let old_assignee = Uuid::new_v4();
        let new_assignee = Uuid::new_v4();

        let before = lead_grants(owner, Some(old_assignee), false);
        assert!(caps_of(&before, old_assignee).is_some());

        let after = lead_grants(owner, Some(new_assignee), false);
        assert!(caps_of(&after, old_assignee).is_none());
        assert_eq!(
            caps_of(&after, new_assignee),
            Some(&BTreeSet::from([Read, Update]))
        );
    }

    #[test]
    fn reatribuicao_em_lead_fechado_concede_somente_leitura() {
        let owner = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let grants = lead_grants(owner, Some(assignee), true);
        assert_eq!(caps_of(&grants, assignee), Some(&BTreeSet::from([Read])));
    }

    #[test]
    fn dono_que_tambem_e_responsavel_mantem_o_conjunto_cheio() {
        let owner = Uuid::new_v4();
        let grants = lead_grants(owner, Some(owner), true);
        // União por sujeito: as capacidades do dono dominam
        assert_eq!(grants.len(), 1);
        assert_eq!(
            caps_of(&grants, owner),
            Some(&BTreeSet::from([Read, Update, Delete]))
        );
    }

    #[test]
    fn doc_de_agente_separa_edicao_de_remocao() {
        let agent = Uuid::new_v4();
        let team_lead = Uuid::new_v4();
        let manager = Uuid::new_v4();
        let grants = user_doc_grants(agent, Role::Agent, Some(manager), Some(team_lead));

        assert_eq!(caps_of(&grants, agent), Some(&BTreeSet::from([Read, Update])));
        assert_eq!(
            caps_of(&grants, team_lead),
            Some(&BTreeSet::from([Read, Update]))
        );
        // Manager da cadeia remove, mas não edita
        assert_eq!(
            caps_of(&grants, manager),
            Some(&BTreeSet::from([Read, Delete]))
        );
    }

    #[test]
    fn doc_de_manager_nao_tem_concessao_de_superior() {
        let manager = Uuid::new_v4();
        let grants = user_doc_grants(manager, Role::Manager, None, None);
        assert_eq!(grants.len(), 1);
        assert_eq!(
            caps_of(&grants, manager),
            Some(&BTreeSet::from([Read, Update]))
        );
    }

    #[test]
    fn doc_de_team_lead_da_override_ao_manager_criador() {
        let team_lead = Uuid::new_v4();
        let manager = Uuid::new_v4();
        let grants = user_doc_grants(team_lead, Role::TeamLead, Some(manager), None);
        assert_eq!(
            caps_of(&grants, manager),
            Some(&BTreeSet::from([Read, Update, Delete]))
        );
    }
}
