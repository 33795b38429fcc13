pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod store;

// Re-exports for convenience
pub use errors::{RegistryError, RegistryResult};
pub use models::{CreateRisk, Risk, RiskState};
pub use store::RiskStore;
