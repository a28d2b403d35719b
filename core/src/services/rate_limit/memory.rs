//! Process-local rate limiter.
//!
//! Entries are never evicted; memory grows with the number of distinct keys
//! seen over the process lifetime.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use lp_shared::config::MAX_RESET_CODE_WINDOW_SECONDS;

use crate::services::clock::Clock;

use super::traits::RateLimiterTrait;

const SHARD_COUNT: usize = 16;

type Shard = Mutex<HashMap<String, DateTime<Utc>>>;

pub struct InMemoryRateLimiter {
    shards: Vec<Shard>,
    window: Duration,
    window_seconds: u64,
    clock: Arc<dyn Clock>,
}

impl InMemoryRateLimiter {
    /// Windows above `MAX_RESET_CODE_WINDOW_SECONDS` are clamped to it
    pub fn new(window_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        let window_seconds = window_seconds.min(MAX_RESET_CODE_WINDOW_SECONDS);
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
            window: Duration::seconds(window_seconds as i64),
            window_seconds,
            clock,
        }
    }

    fn shard_for(&self, key: &str) -> &Shard {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().map(|map| map.len()).unwrap_or(0))
            .sum()
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn gate(&self, key: &str) -> Result<bool, String> {
        let now = self.clock.now();
        let mut entries = self
            .shard_for(key)
            .lock()
            .map_err(|_| "rate limiter state poisoned".to_string())?;

        match entries.get(key) {
            Some(last) if *last + self.window >= now => Ok(false),
            _ => {
                entries.insert(key.to_string(), now);
                Ok(true)
            }
        }
    }

    fn window_seconds(&self) -> u64 {
        self.window_seconds
    }
}
