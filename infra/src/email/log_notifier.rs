//! Notifier that writes deliveries to the log instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use lp_core::services::NotifierTrait;
use lp_shared::utils::validation::mask_email;

/// Development notifier
///
/// Logs the masked recipient and subject at `info`; the body (which holds
/// the code) only at `debug`.
#[derive(Clone, Default)]
pub struct LogNotifier {
    message_count: Arc<AtomicU64>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of messages "sent"
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotifierTrait for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<String, String> {
        let message_id = format!("log-{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            to = %mask_email(to),
            subject,
            message_id = %message_id,
            event = "email_logged",
            "Email delivery recorded"
        );
        debug!(to = %mask_email(to), body, "Email body");

        Ok(message_id)
    }
}
