//! # Loan Portal Core
//!
//! Domain layer for the loan portal backend: entities, the error taxonomy,
//! repository interfaces with in-memory implementations, and the services
//! that run the loan lifecycle, credential recovery and accounts.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
