// src/services/access_service.rs

use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    access::rules,
    common::error::AppError,
    models::access::{AccessRule, ComponentKey},
    models::user::{Role, User},
    store::AccessRuleRepository,
};

// A tabela de regras com cache por sessão. A disponibilidade do CRM
// vence a aplicação estrita das customizações: se a busca de regras
// falhar, resolvemos ABERTO com a tabela padrão embutida, nunca
// "negar tudo".
#[derive(Clone)]
pub struct AccessService {
    repo: AccessRuleRepository,
    cache: Arc<RwLock<Option<Arc<Vec<AccessRule>>>>>,
}

impl AccessService {
    pub fn new(repo: AccessRuleRepository) -> Self {
        Self {
            repo,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn can_access(&self, component: ComponentKey, role: Role) -> bool {
        // Admin resolve antes de qualquer busca
        if role == Role::Admin {
            return true;
        }
        let custom = self.rules_or_empty().await;
        rules::resolve(component, role, &custom)
    }

    // Descarta o cache e rebusca as regras do armazenamento
    pub async fn refresh(&self) -> Result<(), AppError> {
        let fresh = self.repo.list_all().await?;
        *self.cache.write().await = Some(Arc::new(fresh));
        Ok(())
    }

    pub async fn list_rules(&self) -> Result<Vec<AccessRule>, AppError> {
        self.repo.list_all().await
    }

    // Upsert no par único (component, role); o cache é invalidado em seguida
    pub async fn set_rule(
        &self,
        actor: &User,
        component: ComponentKey,
        role: Role,
        allowed: bool,
    ) -> Result<AccessRule, AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        let saved = match self.repo.find(component, role).await? {
            Some(mut existing) => {
                existing.allowed = allowed;
                self.repo.update(&existing).await?
            }
            None => {
                let rule = AccessRule {
                    id: Uuid::new_v4(),
                    component,
                    role,
                    allowed,
                };
                self.repo.create(&rule).await?
            }
        };

        *self.cache.write().await = None;
        Ok(saved)
    }

    async fn rules_or_empty(&self) -> Arc<Vec<AccessRule>> {
        {
            let cached = self.cache.read().await;
            if let Some(rules) = cached.as_ref() {
                return rules.clone();
            }
        }

        let mut guard = self.cache.write().await;
        // Outro chamador pode ter preenchido enquanto esperávamos
        if let Some(rules) = guard.as_ref() {
            return rules.clone();
        }

        match self.repo.list_all().await {
            Ok(fetched) => {
                let rules = Arc::new(fetched);
                *guard = Some(rules.clone());
                rules
            }
            Err(err) => {
                // Falha aberta: sem cache, a próxima chamada tenta de novo
                tracing::warn!(
                    "Falha ao carregar regras de acesso, aplicando padrões embutidos: {}",
                    err
                );
                Arc::new(Vec::new())
            }
        }
    }
}
