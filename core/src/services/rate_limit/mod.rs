//! Per-identity cooldown gate
//!
//! A request for a key is accepted when the key has never been seen or its
//! last accepted request is strictly older than the window. Denied requests
//! leave the recorded timestamp untouched.

mod memory;
mod traits;


pub use memory::InMemoryRateLimiter;
pub use traits::RateLimiterTrait;
