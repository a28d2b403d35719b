//! Configuration for the credential recovery service

use lp_shared::config::{RateLimitConfig, RecoveryConfig};

use crate::domain::entities::reset_code::DEFAULT_EXPIRATION_MINUTES;

#[derive(Debug, Clone)]
pub struct RecoveryServiceConfig {
    /// Minutes before an issued code expires
    pub code_expiration_minutes: i64,
    /// Subject line of the reset email
    pub email_subject: String,
    /// Whether code requests pass through the rate limiter
    pub rate_limit_enabled: bool,
}

impl Default for RecoveryServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            email_subject: "Password Reset Code".to_string(),
            rate_limit_enabled: true,
        }
    }
}

impl RecoveryServiceConfig {
    pub fn from_settings(recovery: &RecoveryConfig, rate_limit: &RateLimitConfig) -> Self {
        Self {
            code_expiration_minutes: recovery.code_expiration_minutes,
            email_subject: recovery.email_subject.clone(),
            rate_limit_enabled: rate_limit.enabled,
        }
    }

    /// Body of the reset email
    pub fn email_body(&self, code: &str) -> String {
        format!(
            "Your password reset code is: {}\n\nThis code will expire in {} minutes. \
             If you did not request a password reset, you can ignore this email.",
            code, self.code_expiration_minutes
        )
    }
}
