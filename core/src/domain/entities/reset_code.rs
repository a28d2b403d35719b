//! Password reset code entity for email-based credential recovery.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the reset code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of a reset code (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// One-time password reset code bound to a single user.
///
/// Created on issuance, flipped to used exactly once on consumption, never
/// deleted. Several unused codes for the same user may coexist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetCode {
    pub id: Uuid,

    /// Owner of the code
    pub user_id: i64,

    /// Zero-padded 6-digit code
    pub code: String,

    pub expires_at: DateTime<Utc>,

    pub is_used: bool,

    pub created_at: DateTime<Utc>,
}

impl ResetCode {
    /// Creates a new code issued at `now` with a random value
    pub fn new(user_id: i64, now: DateTime<Utc>, expiration_minutes: i64) -> Self {
        Self::with_code(user_id, Self::generate_code(), now, expiration_minutes)
    }

    /// Creates a code with a known value
    pub fn with_code(
        user_id: i64,
        code: String,
        now: DateTime<Utc>,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            code,
            expires_at: now + Duration::minutes(expiration_minutes),
            is_used: false,
            created_at: now,
        }
    }

    /// Uniform over 000000..=999999
    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        let code: u32 = rng.gen_range(0..=999_999);
        format!("{:0width$}", code, width = CODE_LENGTH)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Valid iff unused and strictly before expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && !self.is_expired_at(now)
    }

    pub fn mark_as_used(&mut self) {
        self.is_used = true;
    }
}
