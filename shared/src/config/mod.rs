//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing configuration
//! - `cache` - Redis connection configuration
//! - `database` - MySQL connection and pool configuration
//! - `email` - Outbound email provider configuration
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Reset-code request throttling
//! - `recovery` - Credential recovery code settings
//! - `server` - HTTP server and CORS configuration

pub mod auth;
pub mod cache;
pub mod database;
pub mod email;
pub mod environment;
pub mod rate_limit;
pub mod recovery;
pub mod server;

use serde::{Deserialize, Serialize};

pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use email::{EmailConfig, EmailProvider};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::{RateLimitConfig, MAX_RESET_CODE_WINDOW_SECONDS};
pub use recovery::RecoveryConfig;
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Redis is optional; without it the rate limiter runs in-process
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: None,
            jwt: JwtConfig::default(),
            rate_limit: RateLimitConfig::default(),
            recovery: RecoveryConfig::default(),
            email: EmailConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load every sub-configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            jwt: JwtConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            recovery: RecoveryConfig::from_env(),
            email: EmailConfig::from_env(),
            cors: CorsConfig::from_env(environment),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.is_production() && self.jwt.is_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.rate_limit.reset_code_window_seconds == 0 {
            return Err("Reset code window must be greater than 0".to_string());
        }
        if self.rate_limit.reset_code_window_seconds > rate_limit::MAX_RESET_CODE_WINDOW_SECONDS {
            return Err(format!(
                "Reset code window must not exceed {} seconds",
                rate_limit::MAX_RESET_CODE_WINDOW_SECONDS
            ));
        }
        if self.recovery.code_expiration_minutes <= 0 {
            return Err("Reset code expiration must be positive".to_string());
        }
        if self.email.provider == EmailProvider::Http && self.email.endpoint.is_none() {
            return Err("EMAIL_API_URL is required for the http email provider".to_string());
        }
        Ok(())
    }
}

pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
