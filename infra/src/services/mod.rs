//! Infrastructure implementations of core service traits

pub mod recovery;

use std::sync::Arc;

use lp_core::services::{Clock, InMemoryRateLimiter, RateLimiterTrait};
use lp_shared::config::{CacheConfig, RateLimitConfig};

use crate::InfrastructureError;

/// Pick the reset-code rate limiter for this deployment.
///
/// With a Redis URL configured the window is shared by every instance;
/// otherwise it is tracked in process memory.
pub async fn create_rate_limiter(
    rate_limit: &RateLimitConfig,
    cache: Option<&CacheConfig>,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn RateLimiterTrait>, InfrastructureError> {
    let window_seconds = rate_limit.reset_code_window_seconds;

    #[cfg(feature = "redis-cache")]
    {
        if let Some(cache) = cache {
            let client = crate::cache::RedisClient::new(cache.clone()).await?;
            tracing::info!(window_seconds, "Using Redis rate limiter");
            return Ok(Arc::new(recovery::RedisRateLimiter::new(Arc::new(client), window_seconds)));
        }
    }

    #[cfg(not(feature = "redis-cache"))]
    {
        if cache.is_some() {
            tracing::warn!("REDIS_URL is set but redis-cache support is disabled");
        }
    }

    tracing::info!(window_seconds, "Using in-memory rate limiter");
    Ok(Arc::new(InMemoryRateLimiter::new(window_seconds, clock)))
}
