//! Cache Statistics Module
//!
//! Point-in-time view of the store for observability.

use serde::Serialize;

// == Entry Stats ==
/// Diagnostic view of a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStats {
    pub key: String,
    /// Age in milliseconds at snapshot time
    pub age: u64,
    /// Serialized payload size in bytes
    pub size: usize,
}

// == Cache Stats ==
/// Snapshot of the store, entries ordered oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Current number of entries in the store
    pub total_entries: usize,
    /// Lookups served from the store since startup
    pub hits: u64,
    /// Lookups that found nothing fresh since startup
    pub misses: u64,
    pub entries: Vec<EntryStats>,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Sum of serialized payload sizes.
    pub fn total_size(&self) -> usize {
        self.entries.iter().map(|e| e.size).sum()
    }
}
