// src/store/identity.rs

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IdentityError {
    // Mapeado do 409 do provedor
    #[error("A user with this email already exists")]
    EmailTaken,

    #[error("Falha no provedor de identidade: {0}")]
    Provider(String),
}

// Provedor de identidade externo. A emissão de sessão é toda dele;
// este núcleo só cria e remove identidades.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Uuid, IdentityError>;

    async fn delete_identity(&self, id: Uuid) -> Result<(), IdentityError>;
}
