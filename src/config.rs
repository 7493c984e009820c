//! Configuration Module
//!
//! Tuning knobs for the bundled in-memory pool, loadable from environment
//! variables with sensible defaults.

use std::env;

/// Pool tuning parameters.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of entries before recency eviction kicks in
    pub max_entries: usize,
    /// Background purge interval in seconds
    pub purge_interval: u64,
}

impl PoolConfig {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TAGCACHE_MAX_ENTRIES` - Maximum pool entries (default: 1024)
    /// - `TAGCACHE_PURGE_INTERVAL` - Purge frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            max_entries: env::var("TAGCACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            purge_interval: env::var("TAGCACHE_PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            purge_interval: 1,
        }
    }
}
