// src/store/user_repo.rs

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::user::User;
use crate::store::document::{Document, DocumentStore, Grant, Query};

// O repositório de usuários, responsável por todas as interações com a
// coleção de usuários do armazenamento externo
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

fn decode(doc: Document) -> Result<User, AppError> {
    Ok(serde_json::from_value(doc.fields)
        .map_err(|e| anyhow::anyhow!("Documento de usuário inválido: {e}"))?)
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: String) -> Self {
        Self { store, collection }
    }

    pub async fn create(&self, user: &User, acl: Vec<Grant>) -> Result<User, AppError> {
        let fields = serde_json::to_value(user)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar usuário: {e}"))?;
        let doc = self
            .store
            .create(&self.collection, user.id, fields, acl)
            .await?;
        decode(doc)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, AppError> {
        decode(self.store.get(&self.collection, id).await?)
    }

    // Sobrescrita integral dos campos; a ACL só muda quando `acl` é Some
    pub async fn update(&self, user: &User, acl: Option<Vec<Grant>>) -> Result<User, AppError> {
        let fields = serde_json::to_value(user)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar usuário: {e}"))?;
        let doc = self
            .store
            .update(&self.collection, user.id, fields, acl)
            .await?;
        decode(doc)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        Ok(self.store.delete(&self.collection, id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let docs = self.store.list(&self.collection, &[]).await?;
        docs.into_iter().map(decode).collect()
    }

    // Todos os agentes diretamente ligados a este manager (alvo dos cascades)
    pub async fn find_agents_of_manager(&self, manager_id: Uuid) -> Result<Vec<User>, AppError> {
        let queries = [
            Query::Equal("role", json!("agent")),
            Query::Equal("managerId", json!(manager_id)),
        ];
        let docs = self.store.list(&self.collection, &queries).await?;
        docs.into_iter().map(decode).collect()
    }

    // Alguém ainda está atribuído a esta filial pelo campo legado?
    // (guarda de exclusão de filial, modelo de filial única)
    pub async fn any_with_branch(&self, branch_id: Uuid) -> Result<bool, AppError> {
        let queries = [Query::Equal("branchId", json!(branch_id))];
        let docs = self.store.list(&self.collection, &queries).await?;
        Ok(!docs.is_empty())
    }
}
