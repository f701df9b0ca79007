// src/services/user_service.rs

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    access::{grants, hierarchy, visibility},
    common::error::AppError,
    models::user::{CreateUserPayload, Role, User},
    services::audit_service::AuditService,
    store::{IdentityError, IdentityProvider, UserRepository},
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    identity: Arc<dyn IdentityProvider>,
    audit: AuditService,
}

impl UserService {
    pub fn new(
        repo: UserRepository,
        identity: Arc<dyn IdentityProvider>,
        audit: AuditService,
    ) -> Self {
        Self {
            repo,
            identity,
            audit,
        }
    }

    // Provisiona um usuário na hierarquia:
    // 1. valida payload, papel-alvo e subconjunto de filiais
    // 2. deriva os campos de cadeia (managerId / teamLeadId)
    // 3. cria a identidade no provedor externo
    // 4. cria o documento com a ACL calculada; se ISSO falhar, a
    //    identidade recém-criada é desfeita antes de repassar o erro,
    //    para não sobrar conta órfã só de autenticação.
    pub async fn create_user(
        &self,
        actor: &User,
        payload: CreateUserPayload,
    ) -> Result<User, AppError> {
        payload.validate()?;

        if !hierarchy::allowed_subordinate_roles(actor.role).contains(&payload.role) {
            return Err(AppError::SubordinateRoleNotAllowed {
                actor: actor.role,
                target: payload.role,
            });
        }

        if payload.role != Role::Admin && payload.branch_ids.is_empty() {
            return Err(AppError::EmptyBranchList(payload.role));
        }

        // Admin atribui qualquer filial existente; os demais só concedem
        // subconjunto das próprias
        if actor.role != Role::Admin {
            hierarchy::validate_branch_subset(&actor.branch_ids, &payload.branch_ids)
                .map_err(AppError::BranchNotAllowed)?;
        }

        let links = hierarchy::chain_links(actor, payload.role);

        let identity_id = match self
            .identity
            .create_identity(&payload.email, &payload.password, &payload.name)
            .await
        {
            Ok(id) => id,
            Err(IdentityError::EmailTaken) => return Err(AppError::EmailAlreadyExists),
            Err(other) => return Err(other.into()),
        };

        let user = User {
            id: identity_id,
            email: payload.email,
            name: payload.name,
            role: payload.role,
            manager_id: links.manager_id,
            team_lead_id: links.team_lead_id,
            branch_ids: payload.branch_ids,
            // O campo legado só é preenchido pelos cascades de filial
            branch_id: None,
            created_at: chrono::Utc::now(),
        };

        let acl =
            grants::user_doc_grants(user.id, user.role, links.manager_id, links.team_lead_id);

        let created = match self.repo.create(&user, acl).await {
            Ok(created) => created,
            Err(err) => {
                // Rollback compensatório
                if let Err(cleanup) = self.identity.delete_identity(identity_id).await {
                    tracing::error!(
                        "Falha ao desfazer identidade {} após erro na criação do documento: {}",
                        identity_id,
                        cleanup
                    );
                }
                return Err(err);
            }
        };

        self.audit
            .record(
                "user.create",
                actor,
                Some(created.id),
                "user",
                json!({ "role": created.role, "branchIds": created.branch_ids }),
            )
            .await;

        Ok(created)
    }

    pub async fn find_user(&self, id: Uuid) -> Result<User, AppError> {
        self.repo.find_by_id(id).await
    }

    // Agentes nunca consultam listas de usuários
    pub async fn list_users(&self, actor: &User) -> Result<Vec<User>, AppError> {
        if actor.role == Role::Agent {
            return Ok(Vec::new());
        }
        let all = self.repo.list_all().await?;
        Ok(all
            .into_iter()
            .filter(|candidate| visibility::user_visible(actor, candidate))
            .collect())
    }

    // Subordinados atribuíveis a lead: matriz de papéis + filiais em comum
    pub async fn get_assignable_users(&self, actor: &User) -> Result<Vec<User>, AppError> {
        let roles = visibility::assignable_roles(actor.role);
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let all = self.repo.list_all().await?;
        Ok(all
            .into_iter()
            .filter(|candidate| roles.contains(&candidate.role))
            .filter(|candidate| {
                actor.role == Role::Admin
                    || visibility::branches_overlap(&candidate.branch_ids, &actor.branch_ids)
            })
            .collect())
    }

    // Exclusão dura APENAS do documento; a identidade externa permanece.
    pub async fn delete_user(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let target = self.repo.find_by_id(id).await?;

        let in_chain =
            target.manager_id == Some(actor.id) || target.team_lead_id == Some(actor.id);
        if actor.role != Role::Admin && !in_chain {
            return Err(AppError::Forbidden);
        }

        self.repo.delete(id).await?;
        self.audit
            .record(
                "user.delete",
                actor,
                Some(id),
                "user",
                json!({ "role": target.role }),
            )
            .await;
        Ok(())
    }

    // Cascade de atribuição de filial (modelo legado de filial única):
    // grava o branchId do manager e sobrescreve, incondicionalmente, o
    // branchId de TODO agente ligado a ele. Escrita sequencial, sem
    // atomicidade; a primeira falha interrompe e o chamador relê o estado.
    // Cada passo é sobrescrita pura, então reexecutar converge.
    pub async fn assign_manager_to_branch(
        &self,
        actor: &User,
        manager_id: Uuid,
        branch_id: Uuid,
    ) -> Result<(), AppError> {
        self.cascade_branch(actor, manager_id, Some(branch_id)).await
    }

    // Inverso do cascade: anula o branchId do manager e de seus agentes
    pub async fn remove_manager_from_branch(
        &self,
        actor: &User,
        manager_id: Uuid,
    ) -> Result<(), AppError> {
        self.cascade_branch(actor, manager_id, None).await
    }

    async fn cascade_branch(
        &self,
        actor: &User,
        manager_id: Uuid,
        branch_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let mut manager = self.repo.find_by_id(manager_id).await?;
        if manager.role != Role::Manager {
            return Err(AppError::Forbidden);
        }

        manager.branch_id = branch_id;
        self.repo.update(&manager, None).await?;

        let agents = self.repo.find_agents_of_manager(manager_id).await?;
        let total = agents.len();
        for mut agent in agents {
            agent.branch_id = branch_id;
            self.repo.update(&agent, None).await?;
        }
        tracing::info!(
            "Cascade de filial aplicado ao manager {} e {} agente(s)",
            manager_id,
            total
        );

        self.audit
            .record(
                "branch.cascade",
                actor,
                Some(manager_id),
                "user",
                json!({ "branchId": branch_id, "agents": total }),
            )
            .await;
        Ok(())
    }
}
