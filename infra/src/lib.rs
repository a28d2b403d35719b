//! # Infrastructure Layer
//!
//! Concrete adapters behind the core crate's repository and service traits.
//!
//! ## Architecture
//!
//! - **Database**: MySQL repositories using SQLx
//! - **Cache**: Redis client and the shared reset-code rate limiter
//! - **Email**: notifiers that deliver reset codes (log or HTTP provider)
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis-backed rate limiting (default)
//! - `http-email`: Enable the HTTP email provider (default)

use lp_core::errors::DomainError;
use thiserror::Error;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Email delivery for reset codes
pub mod email;

/// Services module - infrastructure implementations of core service traits
pub mod services;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration loading for infrastructure services
    //!
    //! Reads an optional `.env` file before building the shared
    //! [`AppConfig`] from the process environment.

    pub use lp_shared::config::{AppConfig, CacheConfig, DatabaseConfig, EmailConfig};

    use crate::InfrastructureError;

    /// Load and validate the application configuration
    pub fn load() -> Result<AppConfig, InfrastructureError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => tracing::debug!("No .env file found, using process environment"),
            Err(e) => return Err(InfrastructureError::Config(format!("Invalid .env file: {}", e))),
        }

        let config = AppConfig::from_env();
        config.validate().map_err(InfrastructureError::Config)?;
        Ok(config)
    }
}

/// Infrastructure-specific error types
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Database operation failed
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Cache operation failed
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Outbound HTTP call failed
    #[cfg(feature = "http-email")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
