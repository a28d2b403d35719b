//! Cache module for Redis-backed shared state
//!
//! Provides the Redis client with connection retry and the primitives the
//! distributed rate limiter is built on.

pub mod redis_client;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;

// Re-export commonly used types
pub use lp_shared::config::CacheConfig;
