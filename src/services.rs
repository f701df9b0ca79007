pub mod access_service;
pub use access_service::AccessService;
pub mod audit_service;
pub use audit_service::AuditService;
pub mod branch_service;
pub use branch_service::BranchService;
pub mod lead_service;
pub use lead_service::LeadService;
pub mod user_service;
pub use user_service::UserService;
