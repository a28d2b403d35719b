//! Credential recovery configuration

use serde::{Deserialize, Serialize};

/// Reset code lifetime and the email that delivers it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecoveryConfig {
    /// Minutes a reset code stays valid after issuance
    pub code_expiration_minutes: i64,

    /// Subject line of the reset email
    pub email_subject: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: 10,
            email_subject: String::from("Password Reset Code"),
        }
    }
}

impl RecoveryConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_expiration_minutes: super::env_or(
                "RESET_CODE_EXPIRATION_MINUTES",
                defaults.code_expiration_minutes,
            ),
            email_subject: std::env::var("RESET_EMAIL_SUBJECT").unwrap_or(defaults.email_subject),
        }
    }
}
