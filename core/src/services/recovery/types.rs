//! Result types for the credential recovery service

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of a successful code issuance; never carries the code itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeIssued {
    pub code_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub message_id: String,
}
