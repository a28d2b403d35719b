//! Email delivery for password reset codes
//!
//! - **Log notifier**: records a masked delivery line, for development
//! - **HTTP notifier**: posts the message to a transactional email API

pub mod log_notifier;

#[cfg(feature = "http-email")]
pub mod http_notifier;


use std::sync::Arc;

use lp_core::services::NotifierTrait;
use lp_shared::config::{EmailConfig, EmailProvider};

use crate::InfrastructureError;

pub use log_notifier::LogNotifier;

#[cfg(feature = "http-email")]
pub use http_notifier::HttpEmailNotifier;

/// Create the notifier selected by `config.provider`
///
/// # Returns
/// * `Err(InfrastructureError::Config)` - The HTTP provider is selected without an endpoint,
///   or support for it was not compiled in
pub fn create_notifier(config: &EmailConfig) -> Result<Arc<dyn NotifierTrait>, InfrastructureError> {
    match config.provider {
        EmailProvider::Log => {
            tracing::info!("Using log email notifier");
            Ok(Arc::new(LogNotifier::new()))
        }
        #[cfg(feature = "http-email")]
        EmailProvider::Http => {
            let notifier = HttpEmailNotifier::new(config)?;
            tracing::info!(endpoint = %notifier.endpoint(), "Using HTTP email notifier");
            Ok(Arc::new(notifier))
        }
        #[cfg(not(feature = "http-email"))]
        EmailProvider::Http => Err(InfrastructureError::Config(
            "EMAIL_PROVIDER=http requires the http-email feature".to_string(),
        )),
    }
}
