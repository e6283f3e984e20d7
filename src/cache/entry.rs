//! Cache Entry Module
//!
//! Defines a stored response body, its key derivation and age accounting.

use serde_json::Value;

use crate::cache::DurationClass;

/// Owner identifier used for callers without an authenticated id.
pub const ANONYMOUS_OWNER: &str = "anonymous";

// == Key Derivation ==
/// Builds the cache key for an owner and a request path.
///
/// `full_path` is taken exactly as received, query string included. Requests
/// that differ only in parameter order get separate entries.
pub fn cache_key(owner: Option<&str>, full_path: &str) -> String {
    format!("{}:{}", owner.unwrap_or(ANONYMOUS_OWNER), full_path)
}

// == Cache Entry ==
/// A response body captured from a successful read handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Body produced by the handler at write time
    pub payload: Value,
    /// Write timestamp (Unix milliseconds)
    pub written_at: u64,
}

impl CacheEntry {
    pub fn new(payload: Value, written_at: u64) -> Self {
        Self {
            payload,
            written_at,
        }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written.
    ///
    /// A clock that moved backwards yields an age of 0.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.written_at)
    }

    // == Is Fresh ==
    /// An entry is fresh while its age is strictly below the class threshold.
    pub fn is_fresh(&self, now: u64, class: DurationClass) -> bool {
        self.age_ms(now) < class.as_millis()
    }

    /// Byte length of the payload's JSON serialization.
    pub fn payload_size(&self) -> usize {
        serde_json::to_vec(&self.payload)
            .map(|bytes| bytes.len())
            .unwrap_or(0)
    }
}
