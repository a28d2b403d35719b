//! Redis client implementation
//!
//! A multiplexed async connection with connect-time retry and a small set
//! of operations used by the infrastructure layer. Every key is namespaced
//! with the configured prefix.

use redis::{aio::MultiplexedConnection, Client, RedisError};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::CacheConfig;
use crate::InfrastructureError;

/// Redis client with connection retry
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Create a new Redis client with the default retry policy (3 attempts, 100ms base delay)
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        Self::new_with_retry_config(config, 3, 100).await
    }

    /// Create a new Redis client with custom retry configuration
    ///
    /// # Arguments
    /// * `max_retries` - Maximum number of attempts for connecting and for each command
    /// * `retry_delay_ms` - Base delay between retries in milliseconds, doubled per attempt
    pub async fn new_with_retry_config(
        config: CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(
            client,
            Duration::from_secs(config.connection_timeout),
            max_retries,
            retry_delay_ms,
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            max_retries,
            retry_delay_ms,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        connect_timeout: Duration,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Connecting to Redis");

            let outcome = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result.map_err(InfrastructureError::Cache),
                Err(_) => Err(InfrastructureError::General(format!(
                    "Redis connection timed out after {}s",
                    connect_timeout.as_secs()
                ))),
            };

            match outcome {
                Ok(connection) => return Ok(connection),
                Err(e) if attempts < max_retries => {
                    warn!(
                        attempt = attempts,
                        max_retries,
                        retry_in_ms = delay,
                        error = %e,
                        "Failed to connect to Redis, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(attempts, error = %e, "Failed to connect to Redis");
                    return Err(e);
                }
            }
        }
    }

    /// Clone of the multiplexed connection for direct command use
    pub fn get_connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Namespace a key with the configured prefix
    pub fn key(&self, suffix: &str) -> String {
        prefixed_key(&self.config.key_prefix, suffix)
    }

    /// `SET key value NX PX ttl_ms`: store only if absent, with a millisecond expiry.
    ///
    /// # Returns
    /// * `Ok(true)` - The key was absent and is now set
    /// * `Ok(false)` - The key already existed and was left untouched
    pub async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl_ms: u64,
    ) -> Result<bool, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            let mut conn = self.get_connection();
            let result: Result<Option<String>, RedisError> = redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("NX")
                .arg("PX")
                .arg(ttl_ms)
                .query_async(&mut conn)
                .await;

            match result {
                Ok(reply) => return Ok(reply.is_some()),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(key, attempt = attempts, error = %e, "Redis SET NX failed, retrying");
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => return Err(InfrastructureError::Cache(e)),
            }
        }
    }

    /// Remaining time to live in milliseconds, `None` when the key is absent or has no expiry
    pub async fn ttl_ms(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let mut conn = self.get_connection();
        let ttl: i64 = redis::cmd("PTTL").arg(key).query_async(&mut conn).await?;
        Ok((ttl >= 0).then_some(ttl))
    }

    /// Check that Redis answers `PING`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");
        let mut conn = self.get_connection();
        let reply: String = redis::cmd("PING").query_async(&mut conn).await.map_err(|e| {
            error!(error = %e, "Redis health check failed");
            InfrastructureError::Cache(e)
        })?;
        Ok(reply == "PONG")
    }
}

pub(crate) fn prefixed_key(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_string()
    } else {
        format!("{}:{}", prefix, suffix)
    }
}

pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.find('@'), url.find("://")) {
        return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
    }
    url.to_string()
}
