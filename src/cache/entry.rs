//! Cache Entry Module
//!
//! Defines the stored form of a cached value: an expiry timestamp and a
//! compressed payload.

use std::time::Duration;

// == Ttl ==
/// How long an entry stays live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Expires once the duration has elapsed
    After(Duration),
    /// Never expires; only delete, delete_all or replacement removes it
    Forever,
}

impl Ttl {
    /// TTL of the given number of milliseconds.
    pub fn millis(ms: u64) -> Self {
        Ttl::After(Duration::from_millis(ms))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::After(duration)
    }
}

// == Cache Entry ==
/// A single stored value with its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Compressed, serialized value
    pub payload: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    pub fn new(payload: Vec<u8>, ttl: Ttl) -> Self {
        let expires_at = match ttl {
            Ttl::After(duration) => {
                let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
                Some(current_timestamp_ms().saturating_add(ms))
            }
            Ttl::Forever => None,
        };

        Self {
            payload,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks expiry against a clock reading in Unix milliseconds.
    ///
    /// An entry is still live at exactly its expiry millisecond and expired
    /// strictly after it.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms > expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
