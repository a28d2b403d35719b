//! Redis-based rate limiter for reset-code requests

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use lp_core::services::RateLimiterTrait;
use lp_shared::config::MAX_RESET_CODE_WINDOW_SECONDS;

use super::reset_code_key;
use crate::cache::redis_client::RedisClient;

/// Shared-window limiter: one `SET NX PX` per request.
///
/// The key only exists while the window is open, so the check and the
/// record happen in a single Redis command and concurrent requests from
/// any number of instances admit exactly one.
pub struct RedisRateLimiter {
    redis_client: Arc<RedisClient>,
    window_seconds: u64,
}

impl RedisRateLimiter {
    /// Windows above `MAX_RESET_CODE_WINDOW_SECONDS` are clamped to it
    pub fn new(redis_client: Arc<RedisClient>, window_seconds: u64) -> Self {
        Self {
            redis_client,
            window_seconds: window_seconds.min(MAX_RESET_CODE_WINDOW_SECONDS),
        }
    }

    /// Key lifetime; the extra millisecond keeps a request at exactly
    /// `window_seconds` denied, matching the in-memory limiter
    fn ttl_ms(&self) -> u64 {
        self.window_seconds * 1000 + 1
    }
}

#[async_trait]
impl RateLimiterTrait for RedisRateLimiter {
    async fn gate(&self, key: &str) -> Result<bool, String> {
        let redis_key = self.redis_client.key(&reset_code_key(key));
        let recorded_at = Utc::now().timestamp_millis().to_string();

        let allowed = self
            .redis_client
            .set_if_absent(&redis_key, &recorded_at, self.ttl_ms())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Rate limiter unavailable");
                format!("Failed to check rate limit: {}", e)
            })?;

        if !allowed {
            tracing::debug!(window_seconds = self.window_seconds, "Reset code request throttled");
        }
        Ok(allowed)
    }

    fn window_seconds(&self) -> u64 {
        self.window_seconds
    }
}
