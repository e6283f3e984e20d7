//! Cache Module
//!
//! In-memory response cache for read routes: per-owner keys, named freshness
//! classes, substring invalidation and an age-ceiling sweep.

mod clock;
mod duration;
mod entry;
mod response_cache;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use duration::{DurationClass, ParseDurationClassError};
pub use entry::{cache_key, CacheEntry, ANONYMOUS_OWNER};
pub use response_cache::{Computed, ResponseCache, Served, CACHED_FIELD, CACHE_AGE_FIELD};
pub use stats::{CacheStats, EntryStats};
pub use store::{CacheStore, Lookup};

// == Public Constants ==
/// Default upper bound on a response body the cache will record, in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024; // 1 MB
