//! Pool Statistics Module
//!
//! Counters kept by the in-memory pool: hits, misses, capacity evictions and
//! the live entry count.

use serde::Serialize;

// == Pool Stats ==
/// Performance counters for a pool instance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PoolStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing, or only an expired entry
    pub misses: u64,
    /// Entries removed to make room for new ones
    pub evictions: u64,
    /// Current number of stored entries
    pub entries: usize,
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before the first read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_entries(&mut self, count: usize) {
        self.entries = count;
    }
}
