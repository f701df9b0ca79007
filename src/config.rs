// src/config.rs

use std::env;
use std::sync::Arc;

use crate::services::{AccessService, AuditService, BranchService, LeadService, UserService};
use crate::store::{
    AccessRuleRepository, AuditRepository, BranchRepository, DocumentStore, IdentityProvider,
    LeadRepository, UserRepository,
};

// Configuração explícita, passada na construção dos serviços; nada de
// ler ambiente em tempo de chamada. `from_env` existe só para o startup
// de um binário embutidor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub users_collection: String,
    pub branches_collection: String,
    pub leads_collection: String,
    pub access_rules_collection: String,
    pub audit_collection: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            users_collection: "users".to_string(),
            branches_collection: "branches".to_string(),
            leads_collection: "leads".to_string(),
            access_rules_collection: "access_rules".to_string(),
            audit_collection: "audit_log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            users_collection: env::var("USERS_COLLECTION")
                .unwrap_or(defaults.users_collection),
            branches_collection: env::var("BRANCHES_COLLECTION")
                .unwrap_or(defaults.branches_collection),
            leads_collection: env::var("LEADS_COLLECTION")
                .unwrap_or(defaults.leads_collection),
            access_rules_collection: env::var("ACCESS_RULES_COLLECTION")
                .unwrap_or(defaults.access_rules_collection),
            audit_collection: env::var("AUDIT_COLLECTION")
                .unwrap_or(defaults.audit_collection),
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub branches: BranchService,
    pub leads: LeadService,
    pub access: AccessService,
    pub audit: AuditService,
}

impl AppState {
    // Monta o gráfico de dependências sobre o armazenamento e o provedor
    // de identidade externos
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        config: AppConfig,
    ) -> Self {
        let user_repo = UserRepository::new(store.clone(), config.users_collection.clone());
        let branch_repo = BranchRepository::new(store.clone(), config.branches_collection.clone());
        let lead_repo = LeadRepository::new(store.clone(), config.leads_collection.clone());
        let access_repo =
            AccessRuleRepository::new(store.clone(), config.access_rules_collection.clone());
        let audit_repo = AuditRepository::new(store.clone(), config.audit_collection.clone());

        let audit = AuditService::new(audit_repo);

        tracing::info!("✅ Serviços do núcleo CRM inicializados");

        Self {
            users: UserService::new(user_repo.clone(), identity, audit.clone()),
            branches: BranchService::new(branch_repo, user_repo, lead_repo.clone(), audit.clone()),
            leads: LeadService::new(lead_repo, audit.clone()),
            access: AccessService::new(access_repo),
            audit,
        }
    }
}
