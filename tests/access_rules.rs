//! Tabela de regras de acesso: padrões embutidos, overrides, cache e
//! resolução aberta quando o armazenamento falha.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crm_core::config::{AppConfig, AppState};
use crm_core::models::access::ComponentKey;
use crm_core::models::user::{Role, User};
use crm_core::store::document::{Document, DocumentStore, Grant, Query, StoreError};
use crm_core::store::memory::{MemoryIdentity, MemoryStore};

fn setup() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(MemoryIdentity::new());
    let state = AppState::new(store.clone(), identity, AppConfig::default());
    (state, store)
}

fn admin() -> User {
    User {
        id: Uuid::new_v4(),
        email: "admin@crm.test".to_string(),
        name: "Admin".to_string(),
        role: Role::Admin,
        manager_id: None,
        team_lead_id: None,
        branch_ids: vec![],
        branch_id: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn agente_sem_regras_usa_a_tabela_padrao() {
    let (state, _) = setup();

    assert!(state.access.can_access(ComponentKey::Dashboard, Role::Agent).await);
    assert!(state.access.can_access(ComponentKey::Leads, Role::Agent).await);
    assert!(!state.access.can_access(ComponentKey::Settings, Role::Agent).await);
    assert!(!state.access.can_access(ComponentKey::History, Role::Agent).await);
}

#[tokio::test]
async fn override_customizado_nega_manager_e_amplia_agente() {
    let (state, _) = setup();
    let admin = admin();

    state
        .access
        .set_rule(&admin, ComponentKey::Settings, Role::Manager, false)
        .await
        .unwrap();
    state
        .access
        .set_rule(&admin, ComponentKey::History, Role::Agent, true)
        .await
        .unwrap();

    assert!(!state.access.can_access(ComponentKey::Settings, Role::Manager).await);
    assert!(state.access.can_access(ComponentKey::History, Role::Agent).await);
    // O resto segue o padrão
    assert!(state.access.can_access(ComponentKey::Dashboard, Role::Manager).await);
}

#[tokio::test]
async fn upsert_mantem_uma_regra_por_par() {
    let (state, _) = setup();
    let admin = admin();

    state
        .access
        .set_rule(&admin, ComponentKey::Leads, Role::Agent, false)
        .await
        .unwrap();
    state
        .access
        .set_rule(&admin, ComponentKey::Leads, Role::Agent, true)
        .await
        .unwrap();

    let rules = state.access.list_rules().await.unwrap();
    assert_eq!(rules.len(), 1);
    assert!(rules[0].allowed);
    assert!(state.access.can_access(ComponentKey::Leads, Role::Agent).await);
}

#[tokio::test]
async fn refresh_descarta_o_cache_da_sessao() {
    let (state, store) = setup();

    // Primeira resolução popula o cache com zero regras
    assert!(state.access.can_access(ComponentKey::Dashboard, Role::Manager).await);

    // Regra inserida por fora do serviço: o cache da sessão não a vê...
    let rule = crm_core::models::access::AccessRule {
        id: Uuid::new_v4(),
        component: ComponentKey::Dashboard,
        role: Role::Manager,
        allowed: false,
    };
    store
        .create(
            "access_rules",
            rule.id,
            serde_json::to_value(&rule).unwrap(),
            Vec::new(),
        )
        .await
        .unwrap();
    assert!(state.access.can_access(ComponentKey::Dashboard, Role::Manager).await);

    // ...até o refresh explícito
    state.access.refresh().await.unwrap();
    assert!(!state.access.can_access(ComponentKey::Dashboard, Role::Manager).await);
}

// Armazenamento cuja listagem de regras sempre falha
struct RuleFetchFails {
    inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for RuleFetchFails {
    async fn get(&self, collection: &str, id: Uuid) -> Result<Document, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn create(
        &self,
        collection: &str,
        id: Uuid,
        fields: Value,
        acl: Vec<Grant>,
    ) -> Result<Document, StoreError> {
        self.inner.create(collection, id, fields, acl).await
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        fields: Value,
        acl: Option<Vec<Grant>>,
    ) -> Result<Document, StoreError> {
        self.inner.update(collection, id, fields, acl).await
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: &str, queries: &[Query]) -> Result<Vec<Document>, StoreError> {
        if collection == "access_rules" {
            return Err(StoreError::Backend("regras indisponíveis".to_string()));
        }
        self.inner.list(collection, queries).await
    }
}

#[tokio::test]
async fn falha_na_busca_resolve_aberto_com_os_padroes() {
    let store = Arc::new(RuleFetchFails {
        inner: MemoryStore::new(),
    });
    let identity = Arc::new(MemoryIdentity::new());
    let state = AppState::new(store, identity, AppConfig::default());

    // Os padrões valem; nada de "negar tudo"
    assert!(state.access.can_access(ComponentKey::Dashboard, Role::Agent).await);
    assert!(state.access.can_access(ComponentKey::Settings, Role::Manager).await);
    assert!(!state.access.can_access(ComponentKey::Settings, Role::Agent).await);

    // Admin resolve correto sem sequer tocar no armazenamento
    assert!(state.access.can_access(ComponentKey::Settings, Role::Admin).await);
}
