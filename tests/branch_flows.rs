//! Filiais: unicidade de nome e as guardas de exclusão.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crm_core::common::error::AppError;
use crm_core::config::{AppConfig, AppState};
use crm_core::models::branch::CreateBranchPayload;
use crm_core::models::lead::CreateLeadPayload;
use crm_core::models::user::{CreateUserPayload, Role, User};
use crm_core::store::memory::{MemoryIdentity, MemoryStore};

fn setup() -> AppState {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(MemoryIdentity::new());
    AppState::new(store, identity, AppConfig::default())
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

fn branch(name: &str) -> CreateBranchPayload {
    CreateBranchPayload {
        name: name.to_string(),
    }
}

#[tokio::test]
async fn criacao_ativa_por_padrao_e_nome_unico() {
    let state = setup();
    let admin = admin();

    let created = state
        .branches
        .create_branch(&admin, branch("Matriz"))
        .await
        .unwrap();
    assert!(created.is_active);

    let err = state
        .branches
        .create_branch(&admin, branch("Matriz"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BranchNameTaken));
}

#[tokio::test]
async fn nome_fora_do_limite_e_rejeitado() {
    let state = setup();
    let admin = admin();

    let err = state
        .branches
        .create_branch(&admin, branch(&"x".repeat(129)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = state
        .branches
        .create_branch(&admin, branch(""))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn so_admin_gerencia_filiais() {
    let state = setup();
    let manager = User {
        role: Role::Manager,
        ..admin()
    };

    let err = state
        .branches
        .create_branch(&manager, branch("Filial Sul"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn exclusao_barrada_por_manager_atribuido() {
    let state = setup();
    let admin = admin();

    let created = state
        .branches
        .create_branch(&admin, branch("Centro"))
        .await
        .unwrap();

    // O cascade grava o branchId legado do manager; é ele que a guarda lê
    let manager = state
        .users
        .create_user(
            &admin,
            CreateUserPayload {
                email: "m@crm.test".to_string(),
                password: "segredo123".to_string(),
                name: "Manager".to_string(),
                role: Role::Manager,
                branch_ids: vec![created.id],
            },
        )
        .await
        .unwrap();
    state
        .users
        .assign_manager_to_branch(&admin, manager.id, created.id)
        .await
        .unwrap();

    let err = state
        .branches
        .delete_branch(&admin, created.id)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot delete branch with assigned managers"
    );

    // Desatribuindo, a guarda seguinte libera e a exclusão passa
    state
        .users
        .remove_manager_from_branch(&admin, manager.id)
        .await
        .unwrap();
    state.branches.delete_branch(&admin, created.id).await.unwrap();
    assert!(state.branches.find_branch(created.id).await.is_err());
}

#[tokio::test]
async fn exclusao_barrada_por_lead_aberto_e_liberada_apos_fechar() {
    let state = setup();
    let admin = admin();

    let created = state
        .branches
        .create_branch(&admin, branch("Norte"))
        .await
        .unwrap();

    let lead = state
        .leads
        .create_lead(
            &admin,
            CreateLeadPayload {
                data: json!({ "email": "b@lead.test" }),
                status: "New".to_string(),
                assigned_to_id: None,
                branch_id: Some(created.id),
            },
        )
        .await
        .unwrap();

    let err = state
        .branches
        .delete_branch(&admin, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BranchHasActiveLeads));
    assert_eq!(err.to_string(), "Cannot delete branch with active leads");

    // Lead fechado não segura mais a filial
    state.leads.close_lead(&admin, lead.id).await.unwrap();
    state.branches.delete_branch(&admin, created.id).await.unwrap();
}
