//! In-Memory Pool Module
//!
//! Reference item-pool backed by a HashMap, with lazy expiry, capacity
//! eviction in recency order, a tag index, and a deferred-write queue for
//! the stage-then-flush pattern.
//!
//! Entries are stored under storage-internal keys (the caller key behind
//! [`INTERNAL_KEY_PREFIX`]); the tag index holds internal keys as well, and
//! `strip_internal_key` translates them back for callers.

use std::collections::HashMap;

use indexmap::IndexSet;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::pool::item::current_timestamp_ms;
use crate::pool::recency::RecencyTracker;
use crate::pool::stats::PoolStats;
use crate::pool::{ItemPool, PoolItem, TaggableItemPool};
use crate::validate;

// == Public Constants ==
/// Prefix put in front of every caller key before it is stored.
pub const INTERNAL_KEY_PREFIX: &str = "tagcache:";

fn internal_key(key: &str) -> String {
    format!("{INTERNAL_KEY_PREFIX}{key}")
}

fn check_key(key: &str) -> PoolResult<()> {
    match validate::key_violation(key) {
        Some(msg) => Err(PoolError::InvalidKey(msg)),
        None => Ok(()),
    }
}

// == Stored Entry ==
/// One persisted entry with value, timestamps and tag membership.
#[derive(Debug, Clone)]
struct StoredEntry {
    value: Value,
    /// Creation timestamp (Unix milliseconds)
    #[allow(dead_code)]
    created_at: u64,
    /// Expiry instant (Unix milliseconds), None = no expiry
    expires_at: Option<u64>,
    tags: Vec<String>,
}

impl StoredEntry {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => current_timestamp_ms() >= at,
            None => false,
        }
    }
}

// == Pool State ==
/// Everything guarded by the pool mutex.
#[derive(Debug, Default)]
struct PoolInner {
    /// Internal key to entry
    entries: HashMap<String, StoredEntry>,
    /// Tag to member internal keys, in insertion order
    tag_index: HashMap<String, IndexSet<String>>,
    /// Items staged by `save_deferred`, waiting for `commit`
    deferred: Vec<PoolItem>,
    /// Access order for capacity eviction
    recency: RecencyTracker,
    stats: PoolStats,
}

impl PoolInner {
    /// Removes an entry together with its tag memberships and recency slot.
    /// Returns whether an entry was actually present.
    fn drop_entry(&mut self, ikey: &str) -> bool {
        match self.entries.remove(ikey) {
            Some(entry) => {
                self.unindex(ikey, &entry.tags);
                self.recency.forget(ikey);
                self.stats.set_entries(self.entries.len());
                true
            }
            None => false,
        }
    }

    fn unindex(&mut self, ikey: &str, tags: &[String]) {
        for tag in tags {
            if let Some(members) = self.tag_index.get_mut(tag) {
                members.shift_remove(ikey);
                if members.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
    }

    /// Insert path shared by `save` and `commit`. The item's tags fully
    /// replace any previous membership of the key.
    fn store(&mut self, item: PoolItem, max_entries: usize) {
        let ikey = internal_key(item.key());

        if let Some(previous) = self.entries.remove(&ikey) {
            self.unindex(&ikey, &previous.tags);
        } else if self.entries.len() >= max_entries {
            if let Some(stale) = self.recency.pop_stalest() {
                debug!(key = %stale, "evicting stalest entry at capacity");
                self.drop_entry(&stale);
                self.stats.record_eviction();
            }
        }

        let expires_at = item.expires_at();
        let tags = item.tags().to_vec();
        for tag in &tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(ikey.clone());
        }

        self.entries.insert(
            ikey.clone(),
            StoredEntry {
                value: item.into_value(),
                created_at: current_timestamp_ms(),
                expires_at,
                tags,
            },
        );
        self.recency.touch(&ikey);
        self.stats.set_entries(self.entries.len());
    }
}

// == Memory Pool ==
/// In-memory item pool, shareable across threads behind an `Arc`.
#[derive(Debug)]
pub struct MemoryPool {
    inner: Mutex<PoolInner>,
    /// Maximum number of entries before recency eviction kicks in
    max_entries: usize,
}

impl MemoryPool {
    // == Constructors ==
    /// Creates a pool holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(PoolInner::default()),
            max_entries,
        }
    }

    /// Creates a pool sized from a [`PoolConfig`].
    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.max_entries)
    }

    // == Purge Expired ==
    /// Removes every expired entry, returning how many were dropped.
    ///
    /// Reads already treat expired entries as absent; this reclaims their
    /// memory and prunes the tag index ahead of time.
    pub fn purge_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(ikey, _)| ikey.clone())
            .collect();

        let count = expired.len();
        for ikey in expired {
            inner.drop_entry(&ikey);
        }
        count
    }

    // == Introspection ==
    /// Current number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Snapshot of the pool counters.
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_entries(inner.entries.len());
        stats
    }
}

impl Default for MemoryPool {
    fn default() -> Self {
        Self::from_config(&PoolConfig::default())
    }
}

// == Item Pool Implementation ==
impl ItemPool for MemoryPool {
    fn get_item(&self, key: &str) -> PoolResult<PoolItem> {
        check_key(key)?;
        let ikey = internal_key(key);
        let mut inner = self.inner.lock();

        let expired = matches!(inner.entries.get(&ikey), Some(entry) if entry.is_expired());
        if expired {
            inner.drop_entry(&ikey);
            inner.stats.record_miss();
            return Ok(PoolItem::miss(key));
        }

        if let Some(entry) = inner.entries.get(&ikey) {
            let value = entry.value.clone();
            let expires_at = entry.expires_at;
            inner.stats.record_hit();
            inner.recency.touch(&ikey);
            Ok(PoolItem::hit(key, value, expires_at))
        } else {
            inner.stats.record_miss();
            Ok(PoolItem::miss(key))
        }
    }

    fn get_items(&self, keys: &[String]) -> PoolResult<Vec<PoolItem>> {
        keys.iter().map(|key| self.get_item(key)).collect()
    }

    fn has_item(&self, key: &str) -> PoolResult<bool> {
        check_key(key)?;
        let ikey = internal_key(key);
        let mut inner = self.inner.lock();

        let expired = matches!(inner.entries.get(&ikey), Some(entry) if entry.is_expired());
        if expired {
            inner.drop_entry(&ikey);
            return Ok(false);
        }
        Ok(inner.entries.contains_key(&ikey))
    }

    fn save(&self, item: PoolItem) -> PoolResult<bool> {
        check_key(item.key())?;
        let mut inner = self.inner.lock();
        if item.is_expired() {
            // the write succeeded, but the entry must never read as a hit
            inner.drop_entry(&internal_key(item.key()));
            return Ok(true);
        }
        inner.store(item, self.max_entries);
        Ok(true)
    }

    fn save_deferred(&self, item: PoolItem) -> PoolResult<bool> {
        check_key(item.key())?;
        let mut inner = self.inner.lock();
        if item.is_expired() {
            // staging an already-expired entry counts as a failed write;
            // any previous entry under the key is still dropped
            inner.drop_entry(&internal_key(item.key()));
            return Ok(false);
        }
        inner.deferred.push(item);
        Ok(true)
    }

    fn commit(&self) -> PoolResult<bool> {
        let mut inner = self.inner.lock();
        let staged: Vec<PoolItem> = inner.deferred.drain(..).collect();
        for item in staged {
            inner.store(item, self.max_entries);
        }
        Ok(true)
    }

    fn delete_item(&self, key: &str) -> PoolResult<bool> {
        check_key(key)?;
        let mut inner = self.inner.lock();
        inner.drop_entry(&internal_key(key));
        // post-condition (key absent) holds either way
        Ok(true)
    }

    fn delete_items(&self, keys: &[String]) -> PoolResult<bool> {
        for key in keys {
            check_key(key)?;
        }
        let mut inner = self.inner.lock();
        for key in keys {
            inner.drop_entry(&internal_key(key));
        }
        Ok(true)
    }

    fn clear(&self) -> PoolResult<bool> {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.tag_index.clear();
        inner.recency.clear();
        inner.stats.set_entries(0);
        Ok(true)
    }
}

// == Taggable Pool Implementation ==
impl TaggableItemPool for MemoryPool {
    fn load_tag(&self, tag: &str) -> PoolResult<Vec<String>> {
        let mut inner = self.inner.lock();
        let members: Vec<String> = match inner.tag_index.get(tag) {
            Some(set) => set.iter().cloned().collect(),
            None => return Ok(Vec::new()),
        };

        let mut live = Vec::with_capacity(members.len());
        for ikey in members {
            let expired = matches!(inner.entries.get(&ikey), Some(entry) if entry.is_expired());
            if expired {
                inner.drop_entry(&ikey);
            } else if inner.entries.contains_key(&ikey) {
                live.push(ikey);
            }
        }
        Ok(live)
    }

    fn clean(&self, tags: &[String]) -> PoolResult<bool> {
        let mut inner = self.inner.lock();
        let mut removed = 0usize;
        for tag in tags {
            let members: Vec<String> = match inner.tag_index.get(tag) {
                Some(set) => set.iter().cloned().collect(),
                None => continue,
            };
            for ikey in members {
                let live = matches!(inner.entries.get(&ikey), Some(entry) if !entry.is_expired());
                if inner.drop_entry(&ikey) && live {
                    removed += 1;
                }
            }
        }
        Ok(removed > 0)
    }

    fn strip_internal_key(&self, raw: &str) -> String {
        raw.strip_prefix(INTERNAL_KEY_PREFIX)
            .unwrap_or(raw)
            .to_string()
    }
}
