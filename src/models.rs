pub mod access;
pub mod audit;
pub mod branch;
pub mod lead;
pub mod user;

pub use access::{AccessRule, ComponentKey};
pub use audit::AuditRecord;
pub use branch::Branch;
pub use lead::{DuplicateField, Lead, LeadFilters};
pub use user::{Role, User};
