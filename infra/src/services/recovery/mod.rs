//! Credential-recovery infrastructure services

#[cfg(feature = "redis-cache")]
pub mod rate_limiter;


#[cfg(feature = "redis-cache")]
pub use rate_limiter::RedisRateLimiter;

/// Redis key suffix for the reset-code window of one email
pub fn reset_code_key(email: &str) -> String {
    format!("rate_limit:reset_code:{}", email)
}
