//! Password reset code repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::reset_code::ResetCode;
use crate::errors::DomainError;

/// Codes are append-only; the only mutation is the used flag, set by `claim`
/// and cleared by `release` when the write a claim guarded did not happen.
#[async_trait]
pub trait ResetCodeRepository: Send + Sync {
    async fn create(&self, code: &ResetCode) -> Result<(), DomainError>;

    /// Every code with this value for this user, used or not, newest first
    async fn find_by_user_and_code(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<Vec<ResetCode>, DomainError>;

    /// Atomically mark the code used if it is still unused and unexpired at `now`.
    ///
    /// # Returns
    /// * `Ok(true)` - This caller consumed the code
    /// * `Ok(false)` - Already used, expired or unknown
    async fn claim(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Return a claimed code to unused so it can be spent again.
    ///
    /// Only for undoing a claim whose password write failed.
    async fn release(&self, id: Uuid) -> Result<(), DomainError>;
}
