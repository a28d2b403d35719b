//! Outbound notification seam

use async_trait::async_trait;

/// Delivers a message to an email address
#[async_trait]
pub trait NotifierTrait: Send + Sync {
    /// Send a message; returns a provider message id
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<String, String>;
}
