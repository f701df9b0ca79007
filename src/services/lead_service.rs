// src/services/lead_service.rs

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    access::{grants, visibility},
    common::error::AppError,
    models::lead::{
        uniqueness_field, CreateLeadPayload, DuplicateField, Lead, LeadFilters, UpdateLeadPayload,
    },
    models::user::{Role, User},
    services::audit_service::AuditService,
    store::{LeadRepository, Query},
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    audit: AuditService,
}

impl LeadService {
    pub fn new(repo: LeadRepository, audit: AuditService) -> Self {
        Self { repo, audit }
    }

    // Detector de duplicidade entre filiais (de propósito: a varredura é
    // global, sem recorte por filial). E-mail é checado estritamente
    // antes de telefone; só o primeiro encontrado, na ordem de iteração
    // do armazenamento, é reportado. `exclude_lead_id` tira da varredura
    // o próprio registro em atualização, para que um lead com seus
    // valores inalterados nunca se auto-acuse.
    pub async fn validate_uniqueness(
        &self,
        data: &Value,
        exclude_lead_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let leads: Vec<Lead> = self
            .repo
            .list_all()
            .await?
            .into_iter()
            .filter(|lead| Some(lead.id) != exclude_lead_id)
            .collect();

        if let Some(email) = uniqueness_field(data, "email") {
            if let Some(existing) = leads.iter().find(|lead| lead.email() == Some(email)) {
                return Err(AppError::DuplicateLead {
                    field: DuplicateField::Email,
                    existing_lead_id: existing.id,
                    existing_branch_id: existing.branch_id,
                });
            }
        }

        if let Some(phone) = uniqueness_field(data, "phone") {
            if let Some(existing) = leads.iter().find(|lead| lead.phone() == Some(phone)) {
                return Err(AppError::DuplicateLead {
                    field: DuplicateField::Phone,
                    existing_lead_id: existing.id,
                    existing_branch_id: existing.branch_id,
                });
            }
        }

        Ok(())
    }

    // O dono é SEMPRE o criador, independente do papel e de qualquer
    // assignedToId vindo no payload.
    pub async fn create_lead(
        &self,
        actor: &User,
        payload: CreateLeadPayload,
    ) -> Result<Lead, AppError> {
        self.validate_uniqueness(&payload.data, None).await?;

        // Admin pode fixar a filial explicitamente; os demais herdam a do
        // criador (campo legado quando preenchido, senão a primeira do
        // conjunto multi-filial).
        let branch_id = if actor.role == Role::Admin {
            payload.branch_id
        } else {
            actor.branch_id.or_else(|| actor.branch_ids.first().copied())
        };

        let lead = Lead {
            id: Uuid::new_v4(),
            data: payload.data,
            status: payload.status,
            owner_id: actor.id,
            assigned_to_id: payload.assigned_to_id,
            branch_id,
            is_closed: false,
            closed_at: None,
            created_at: Utc::now(),
        };

        let acl = grants::lead_doc_grants(&lead);
        let created = self.repo.create(&lead, acl).await?;

        self.audit
            .record(
                "lead.create",
                actor,
                Some(created.id),
                "lead",
                json!({ "branchId": created.branch_id, "assignedToId": created.assigned_to_id }),
            )
            .await;
        Ok(created)
    }

    pub async fn find_lead(&self, id: Uuid) -> Result<Lead, AppError> {
        self.repo.find_by_id(id).await
    }

    // Atualiza dados/status. O dono é imutável; a ACL é recalculada e
    // regravada por inteiro, nunca remendada.
    pub async fn update_lead(
        &self,
        actor: &User,
        id: Uuid,
        payload: UpdateLeadPayload,
    ) -> Result<Lead, AppError> {
        let mut lead = self.repo.find_by_id(id).await?;

        let data = payload.data.unwrap_or_else(|| lead.data.clone());
        self.validate_uniqueness(&data, Some(id)).await?;
        lead.data = data;

        if let Some(status) = payload.status {
            lead.status = status;
        }

        let acl = grants::lead_doc_grants(&lead);
        let updated = self.repo.update(&lead, Some(acl)).await?;

        self.audit
            .record("lead.update", actor, Some(id), "lead", json!({}))
            .await;
        Ok(updated)
    }

    // Reatribuição: a regravação integral da ACL remove todas as
    // concessões do responsável anterior e aplica ao novo a política do
    // estado atual (fechado => somente leitura).
    pub async fn assign_lead(
        &self,
        actor: &User,
        id: Uuid,
        assigned_to_id: Option<Uuid>,
    ) -> Result<Lead, AppError> {
        let mut lead = self.repo.find_by_id(id).await?;
        let previous = lead.assigned_to_id;
        lead.assigned_to_id = assigned_to_id;

        let acl = grants::lead_doc_grants(&lead);
        let updated = self.repo.update(&lead, Some(acl)).await?;

        self.audit
            .record(
                "lead.assign",
                actor,
                Some(id),
                "lead",
                json!({ "from": previous, "to": assigned_to_id }),
            )
            .await;
        Ok(updated)
    }

    // Fechar congela o responsável em somente-leitura e carimba closedAt.
    // Fechar de novo sobrescreve o carimbo anterior.
    pub async fn close_lead(&self, actor: &User, id: Uuid) -> Result<Lead, AppError> {
        let mut lead = self.repo.find_by_id(id).await?;
        lead.is_closed = true;
        lead.closed_at = Some(Utc::now());

        let acl = grants::lead_doc_grants(&lead);
        let updated = self.repo.update(&lead, Some(acl)).await?;

        self.audit
            .record("lead.close", actor, Some(id), "lead", json!({}))
            .await;
        Ok(updated)
    }

    // Reabrir restaura o update do responsável; closedAt fica INTACTO:
    // o carimbo do último fechamento é preservado deliberadamente.
    pub async fn reopen_lead(&self, actor: &User, id: Uuid) -> Result<Lead, AppError> {
        let mut lead = self.repo.find_by_id(id).await?;
        lead.is_closed = false;

        let acl = grants::lead_doc_grants(&lead);
        let updated = self.repo.update(&lead, Some(acl)).await?;

        self.audit
            .record("lead.reopen", actor, Some(id), "lead", json!({}))
            .await;
        Ok(updated)
    }

    pub async fn delete_lead(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let lead = self.repo.find_by_id(id).await?;
        if actor.role != Role::Admin && lead.owner_id != actor.id {
            return Err(AppError::NotLeadOwner);
        }

        self.repo.delete(id).await?;
        self.audit
            .record("lead.delete", actor, Some(id), "lead", json!({}))
            .await;
        Ok(())
    }

    // Predicados simples descem ao armazenamento; recorte por papel e
    // busca textual são aplicados no cliente (o payload é opaco).
    pub async fn list_leads(
        &self,
        actor: &User,
        filters: LeadFilters,
    ) -> Result<Vec<Lead>, AppError> {
        let mut queries = vec![
            Query::Equal("isClosed", json!(filters.is_closed.unwrap_or(false))),
            Query::OrderDescCreated,
        ];
        if let Some(status) = &filters.status {
            queries.push(Query::Equal("status", json!(status)));
        }
        if actor.role != Role::Agent {
            if let Some(assignee) = filters.assigned_to_id {
                queries.push(Query::Equal("assignedToId", json!(assignee)));
            }
        }
        if let Some(after) = filters.created_after {
            queries.push(Query::GreaterEqual("createdAt", json!(after)));
        }
        if let Some(before) = filters.created_before {
            queries.push(Query::LessEqual("createdAt", json!(before)));
        }

        let leads = self.repo.list(&queries).await?;
        Ok(visibility::filter_leads(actor, leads, &filters))
    }
}
