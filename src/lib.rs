//! Núcleo de autorização e visibilidade de um CRM multi-filial.
//!
//! A hierarquia de quatro papéis (admin, manager, team_lead, agent)
//! determina o que cada ator enxerga e muta; cada registro carrega uma
//! ACL calculada centralmente e regravada por inteiro a cada transição
//! de estado. O armazenamento de documentos e o provedor de identidade
//! são colaboradores externos, consumidos pelos traits em [`store`].
//!
//! A superfície pública é a camada de serviços ([`config::AppState`]):
//! chamadas assíncronas diretas, sem protocolo de rede próprio.

pub mod access;
pub mod common;
pub mod config;
pub mod models;
pub mod services;
pub mod store;

pub use common::error::AppError;
pub use config::{AppConfig, AppState};
