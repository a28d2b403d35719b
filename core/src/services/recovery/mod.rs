//! Credential recovery via emailed one-time reset codes
//!
//! Flow: a rate-gated request issues a 6-digit code to the account's email;
//! the code can be checked without spending it, and is spent exactly once
//! when the password is reset. Issuing a new code does not revoke older
//! outstanding codes.

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::RecoveryServiceConfig;
pub use service::CredentialRecoveryService;
pub use traits::NotifierTrait;
pub use types::CodeIssued;
