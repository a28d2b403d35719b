//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Cooldown between reset-code requests for one email, in seconds
pub const DEFAULT_RESET_CODE_WINDOW_SECONDS: u64 = 15;

/// Largest accepted cooldown; one day
pub const MAX_RESET_CODE_WINDOW_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Minimum gap between accepted reset-code requests per identity
    #[serde(default = "default_reset_code_window")]
    pub reset_code_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            reset_code_window_seconds: default_reset_code_window(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: super::env_or("RATE_LIMIT_ENABLED", defaults.enabled),
            reset_code_window_seconds: super::env_or(
                "RESET_CODE_WINDOW_SECONDS",
                defaults.reset_code_window_seconds,
            ),
        }
    }

    /// Rate limiting switched off (local tooling only)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn with_window_seconds(mut self, seconds: u64) -> Self {
        self.reset_code_window_seconds = seconds;
        self
    }
}

fn default_enabled() -> bool {
    true
}

fn default_reset_code_window() -> u64 {
    DEFAULT_RESET_CODE_WINDOW_SECONDS
}
