//! Shared utilities and common types for the loan portal server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Validation helpers (email format, log masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, EmailConfig, EmailProvider, Environment,
    JwtConfig, LoggingConfig, RateLimitConfig, RecoveryConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, MessageResponse};
pub use utils::validation;
