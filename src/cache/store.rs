//! Cache Store Module
//!
//! Map-backed entry bookkeeping: freshness checks on read, overwrite on write,
//! substring invalidation and the age-ceiling sweep. Callers supply the
//! current time so the store itself never reads a clock.

use std::collections::HashMap;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, DurationClass, EntryStats};

// == Lookup Result ==
/// Outcome of reading a key against a duration class.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Entry is younger than the class threshold
    Fresh { payload: Value, age_ms: u64 },
    /// Entry existed but was too old and has been removed
    Stale,
    /// No entry for the key
    Absent,
}

// == Cache Store ==
/// Entry storage for cached response bodies.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key to entry
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
    /// Bumped by every invalidation
    epoch: u64,
}

impl CacheStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Lookup ==
    /// Reads `key`, treating it as fresh only while younger than `class`.
    ///
    /// A stale entry is deleted before returning.
    pub fn lookup(&mut self, key: &str, class: DurationClass, now: u64) -> Lookup {
        let Some(entry) = self.entries.get(key) else {
            self.misses += 1;
            return Lookup::Absent;
        };

        if entry.is_fresh(now, class) {
            self.hits += 1;
            return Lookup::Fresh {
                payload: entry.payload.clone(),
                age_ms: entry.age_ms(now),
            };
        }

        self.entries.remove(key);
        self.misses += 1;
        Lookup::Stale
    }

    // == Insert ==
    /// Stores `payload` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: String, payload: Value, now: u64) {
        self.entries.insert(key, CacheEntry::new(payload, now));
    }

    // == Insert If Current ==
    /// Stores `payload` only if no invalidation has run since `epoch` was read.
    ///
    /// Returns whether the entry was written.
    pub fn insert_if_current(
        &mut self,
        key: String,
        payload: Value,
        now: u64,
        epoch: u64,
    ) -> bool {
        if self.epoch != epoch {
            return false;
        }
        self.insert(key, payload, now);
        true
    }

    /// Invalidation counter, read before computing a payload for
    /// [`insert_if_current`](Self::insert_if_current).
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // == Invalidate Pattern ==
    /// Removes every entry whose key contains `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_pattern(&mut self, pattern: &str) -> usize {
        self.epoch += 1;
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        before - self.entries.len()
    }

    // == Invalidate All ==
    /// Removes every entry, returning how many there were.
    pub fn invalidate_all(&mut self) -> usize {
        self.epoch += 1;
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Snapshot ==
    /// Returns current statistics, entries ordered by descending age.
    pub fn snapshot(&self, now: u64) -> CacheStats {
        let mut entries: Vec<EntryStats> = self
            .entries
            .iter()
            .map(|(key, entry)| EntryStats {
                key: key.clone(),
                age: entry.age_ms(now),
                size: entry.payload_size(),
            })
            .collect();
        entries.sort_by(|a, b| b.age.cmp(&a.age).then_with(|| a.key.cmp(&b.key)));

        CacheStats {
            total_entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            entries,
        }
    }

    // == Sweep ==
    /// Removes entries older than `ceiling`, whatever class they were read with.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: u64, ceiling: DurationClass) -> usize {
        let limit = ceiling.as_millis();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.age_ms(now) <= limit);
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
