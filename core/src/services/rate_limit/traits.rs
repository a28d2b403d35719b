use async_trait::async_trait;

/// Rate limiting service trait
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Check-and-record in one atomic step per key.
    ///
    /// Returns `true` when the request is allowed (and recorded).
    async fn gate(&self, key: &str) -> Result<bool, String>;

    /// Cooldown length, used to tell denied callers when to retry
    fn window_seconds(&self) -> u64;
}
