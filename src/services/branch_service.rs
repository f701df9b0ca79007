// src/services/branch_service.rs

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::branch::{Branch, CreateBranchPayload},
    models::user::{Role, User},
    services::audit_service::AuditService,
    store::{BranchRepository, LeadRepository, UserRepository},
};

#[derive(Clone)]
pub struct BranchService {
    repo: BranchRepository,
    user_repo: UserRepository,
    lead_repo: LeadRepository,
    audit: AuditService,
}

impl BranchService {
    pub fn new(
        repo: BranchRepository,
        user_repo: UserRepository,
        lead_repo: LeadRepository,
        audit: AuditService,
    ) -> Self {
        Self {
            repo,
            user_repo,
            lead_repo,
            audit,
        }
    }

    pub async fn create_branch(
        &self,
        actor: &User,
        payload: CreateBranchPayload,
    ) -> Result<Branch, AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        payload.validate()?;

        // Nome é único no sistema inteiro
        if self.repo.find_by_name(&payload.name).await?.is_some() {
            return Err(AppError::BranchNameTaken);
        }

        let branch = Branch {
            id: Uuid::new_v4(),
            name: payload.name,
            is_active: true,
            created_at: Utc::now(),
        };
        let created = self.repo.create(&branch).await?;

        self.audit
            .record(
                "branch.create",
                actor,
                Some(created.id),
                "branch",
                json!({ "name": created.name }),
            )
            .await;
        Ok(created)
    }

    pub async fn find_branch(&self, id: Uuid) -> Result<Branch, AppError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>, AppError> {
        self.repo.list_all().await
    }

    // Exclusão guardada, nesta ordem:
    // 1. alguém ainda atribuído pelo campo legado branchId -> rejeita
    // 2. lead não-fechado na filial -> rejeita
    // 3. senão, exclui incondicionalmente
    pub async fn delete_branch(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        if self.user_repo.any_with_branch(id).await? {
            return Err(AppError::BranchHasManagers);
        }
        if self.lead_repo.any_open_in_branch(id).await? {
            return Err(AppError::BranchHasActiveLeads);
        }

        self.repo.delete(id).await?;
        self.audit
            .record("branch.delete", actor, Some(id), "branch", json!({}))
            .await;
        Ok(())
    }
}
