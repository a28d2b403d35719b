//! Notifier backed by an HTTP transactional email API.
//!
//! Posts `{from, to, subject, text}` as JSON with a bearer key and reads
//! an optional `id` from the response body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use lp_core::services::NotifierTrait;
use lp_shared::config::EmailConfig;
use lp_shared::utils::validation::mask_email;

use crate::InfrastructureError;

#[derive(Debug, Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderReply {
    #[serde(default)]
    id: Option<String>,
}

pub struct HttpEmailNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from_address: String,
}

impl HttpEmailNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| {
                InfrastructureError::Config("EMAIL_API_URL is required for the http provider".to_string())
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<String, InfrastructureError> {
        let payload = OutboundEmail {
            from: &self.from_address,
            to,
            subject,
            text: body,
        };

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(InfrastructureError::General(format!(
                "Email provider returned {}: {}",
                status, detail
            )));
        }

        let reply: ProviderReply = response.json().await.unwrap_or_default();
        Ok(reply.id.unwrap_or_else(|| format!("http-{}", uuid::Uuid::new_v4())))
    }
}

#[async_trait]
impl NotifierTrait for HttpEmailNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<String, String> {
        match self.deliver(to, subject, body).await {
            Ok(message_id) => {
                info!(
                    to = %mask_email(to),
                    message_id = %message_id,
                    event = "email_sent",
                    "Email delivered to provider"
                );
                Ok(message_id)
            }
            Err(e) => {
                error!(to = %mask_email(to), error = %e, event = "email_failed", "Email delivery failed");
                Err(e.to_string())
            }
        }
    }
}
