//! Response Cache Module
//!
//! Shared handle over the store. Owned by the composition root and cloned
//! into router state and the sweep task.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore, Clock, DurationClass, Lookup, SystemClock};

/// Field set to `true` on bodies served from the cache.
pub const CACHED_FIELD: &str = "cached";

/// Field carrying the served entry's age in milliseconds.
pub const CACHE_AGE_FIELD: &str = "cacheAge";

// == Computation Outcome ==
/// What a wrapped computation produced.
#[derive(Debug)]
pub enum Computed<T> {
    /// Success: record `payload`, hand `output` back to the caller
    Store(Value, T),
    /// Anything else: hand `output` back, record nothing
    Skip(T),
}

// == Served ==
/// What the caller of [`ResponseCache::get_or_compute`] receives.
#[derive(Debug)]
pub enum Served<T> {
    /// Stored payload plus the diagnostic fields
    Hit(Value),
    /// The computation's own output, unmodified
    Computed(T),
}

// == Response Cache ==
/// Process-wide response cache.
pub struct ResponseCache {
    store: RwLock<CacheStore>,
    clock: Arc<dyn Clock>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    /// Creates an empty cache on wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(CacheStore::new()),
            clock,
        }
    }

    // == Lookup ==
    /// Returns the fresh payload for `key` with diagnostics attached.
    ///
    /// Stale entries are dropped under the same write lock that observed them,
    /// so a concurrent store of the same key cannot be lost to the delete.
    pub async fn lookup(&self, key: &str, class: DurationClass) -> Option<Value> {
        self.lookup_at_epoch(key, class).await.0
    }

    /// Lookup that also returns the invalidation epoch seen under the same lock.
    async fn lookup_at_epoch(&self, key: &str, class: DurationClass) -> (Option<Value>, u64) {
        let now = self.clock.now_ms();
        let (result, epoch) = {
            let mut store = self.store.write().await;
            (store.lookup(key, class, now), store.epoch())
        };

        let payload = match result {
            Lookup::Fresh { payload, age_ms } => {
                debug!(key, age_ms, %class, "cache hit");
                Some(with_diagnostics(payload, age_ms))
            }
            Lookup::Stale => {
                debug!(key, %class, "cache entry stale, evicted");
                None
            }
            Lookup::Absent => {
                debug!(key, "cache miss");
                None
            }
        };
        (payload, epoch)
    }

    // == Store ==
    /// Records `payload` under `key`, stamped with the current time.
    pub async fn store(&self, key: String, payload: Value) {
        let now = self.clock.now_ms();
        debug!(key = %key, "caching response");
        self.store.write().await.insert(key, payload, now);
    }

    // == Get Or Compute ==
    /// Serves `key` from the cache, or runs `compute` and records its result.
    ///
    /// The lock is not held while `compute` runs. If the computation is
    /// dropped before finishing nothing is stored. If any invalidation runs
    /// while it is in flight the result is returned but not stored, since it
    /// may predate the write that triggered the invalidation.
    pub async fn get_or_compute<F, Fut, T>(
        &self,
        key: &str,
        class: DurationClass,
        compute: F,
    ) -> Served<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Computed<T>>,
    {
        let (hit, epoch) = self.lookup_at_epoch(key, class).await;
        if let Some(payload) = hit {
            return Served::Hit(payload);
        }

        match compute().await {
            Computed::Store(payload, output) => {
                let now = self.clock.now_ms();
                let stored = self
                    .store
                    .write()
                    .await
                    .insert_if_current(key.to_string(), payload, now, epoch);
                if stored {
                    debug!(key, "caching response");
                } else {
                    debug!(key, "invalidated during compute, not caching");
                }
                Served::Computed(output)
            }
            Computed::Skip(output) => Served::Computed(output),
        }
    }

    // == Invalidation ==
    /// Removes every entry whose key contains `pattern`.
    pub async fn invalidate_by_pattern(&self, pattern: &str) -> usize {
        let removed = self.store.write().await.invalidate_pattern(pattern);
        if removed > 0 {
            info!(pattern, removed, "cache invalidated by pattern");
        }
        removed
    }

    /// Removes every entry.
    pub async fn invalidate_all(&self) -> usize {
        let removed = self.store.write().await.invalidate_all();
        info!(removed, "cache cleared");
        removed
    }

    /// Removes every entry whose key mentions `owner`.
    ///
    /// This is a substring match, so an owner id that appears inside another
    /// key's path is swept too.
    pub async fn invalidate_by_owner(&self, owner: &str) -> usize {
        self.invalidate_by_pattern(owner).await
    }

    // == Stats ==
    /// Returns a snapshot of the store. Takes only a read lock.
    pub async fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        self.store.read().await.snapshot(now)
    }

    // == Sweep ==
    /// Removes entries older than the longest duration class.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        self.store
            .write()
            .await
            .sweep(now, DurationClass::ceiling())
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

/// Adds the hit markers to a JSON object. Other JSON values pass unchanged.
fn with_diagnostics(payload: Value, age_ms: u64) -> Value {
    match payload {
        Value::Object(mut map) => {
            map.insert(CACHED_FIELD.to_string(), Value::Bool(true));
            map.insert(CACHE_AGE_FIELD.to_string(), Value::from(age_ms));
            Value::Object(map)
        }
        other => other,
    }
}
