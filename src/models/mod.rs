//! Wire DTOs for every backend resource the console consumes.

pub mod agent;
pub mod alert;
pub mod auth;
pub mod detection;
pub mod pagination;
pub mod severity;

pub use agent::Agent;
pub use alert::Alert;
pub use detection::Detection;
pub use severity::{AgentStatus, AlertStatus, Severity};
