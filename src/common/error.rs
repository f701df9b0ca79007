// src/common/error.rs

use thiserror::Error;
use uuid::Uuid;

use crate::models::lead::DuplicateField;
use crate::models::user::Role;
use crate::store::document::StoreError;
use crate::store::identity::IdentityError;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Acima da camada de serviço todo erro vira uma única mensagem legível;
// não há códigos estruturados expostos.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("A user with this email already exists")]
    EmailAlreadyExists,

    #[error("A branch with this name already exists")]
    BranchNameTaken,

    #[error("Branch list cannot be empty when creating a {0}")]
    EmptyBranchList(Role),

    // Primeira filial ofensora da checagem de subconjunto
    #[error("Branch {0} is not among the creator's branches")]
    BranchNotAllowed(Uuid),

    #[error("A {actor} is not allowed to create {target} accounts")]
    SubordinateRoleNotAllowed { actor: Role, target: Role },

    #[error("Cannot delete branch with assigned managers")]
    BranchHasManagers,

    #[error("Cannot delete branch with active leads")]
    BranchHasActiveLeads,

    #[error("A lead with this {field} already exists")]
    DuplicateLead {
        field: DuplicateField,
        existing_lead_id: Uuid,
        existing_branch_id: Option<Uuid>,
    },

    #[error("Only the lead owner can delete it")]
    NotLeadOwner,

    #[error("User is not allowed to perform this action")]
    Forbidden,

    // Erros do armazenamento passam adiante sem reformulação; a mensagem
    // nativa de "não encontrado" chega intacta ao chamador.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}
