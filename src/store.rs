pub mod document;
pub mod identity;
pub mod memory;

pub mod access_repo;
pub use access_repo::AccessRuleRepository;
pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod branch_repo;
pub use branch_repo::BranchRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

pub use document::{Capability, Document, DocumentStore, Grant, Query, StoreError};
pub use identity::{IdentityError, IdentityProvider};
pub use memory::{MemoryIdentity, MemoryStore};
