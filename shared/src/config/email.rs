//! Outbound email configuration

use serde::{Deserialize, Serialize};

/// Which email transport delivers notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// Write a masked delivery record to the log only
    #[default]
    Log,
    /// POST the message to an HTTP email API
    Http,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "http" => Ok(Self::Http),
            other => Err(format!("Unknown email provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,

    /// HTTP email API endpoint (required for `Http`)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer API key for the HTTP email API
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Sender address
    pub from_address: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::Log,
            endpoint: None,
            api_key: None,
            from_address: String::from("no-reply@loan-portal.local"),
            timeout_seconds: 10,
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: super::env_or("EMAIL_PROVIDER", defaults.provider),
            endpoint: std::env::var("EMAIL_API_URL").ok(),
            api_key: std::env::var("EMAIL_API_KEY").ok(),
            from_address: std::env::var("EMAIL_FROM").unwrap_or(defaults.from_address),
            timeout_seconds: super::env_or("EMAIL_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }

    /// Configure the HTTP provider
    pub fn http(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: EmailProvider::Http,
            endpoint: Some(endpoint.into()),
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }
}
