//! Tag-Augmented Cache Facade
//!
//! Extends the simple facade with a tag dimension: a current tag set is
//! attached to every write, the members of a tag can be read back in one
//! call, and whole tags can be evicted at once.
//!
//! Tag membership is always a consequence of a write. There is no way to
//! attach or detach a tag without rewriting the entry, and a rewrite fully
//! replaces the previous membership.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;
use crate::facade::SimpleCache;
use crate::pool::{TaggableItemPool, Ttl};
use crate::validate;

// == Tagged Cache ==
/// Cache facade whose writes carry the instance's current tag set.
///
/// The current tags are plain per-instance state. Callers sharing one
/// instance across threads must treat `set_tags` plus the writes that rely
/// on it as one critical section, or give each writer its own facade.
#[derive(Debug)]
pub struct TaggedCache<P: TaggableItemPool> {
    inner: SimpleCache<P>,
    /// Tags attached to every subsequent write, None = untagged writes
    tags: Option<Vec<String>>,
}

impl<P: TaggableItemPool> TaggedCache<P> {
    /// Wraps an already-constructed taggable pool. Writes start untagged.
    pub fn new(pool: P) -> Self {
        Self {
            inner: SimpleCache::new(pool),
            tags: None,
        }
    }

    /// The underlying item pool.
    pub fn pool(&self) -> &P {
        self.inner.pool()
    }

    // == Current Tag Set ==
    /// Replaces the tag set attached to subsequent writes. `None` makes
    /// subsequent writes untagged.
    pub fn set_tags(&mut self, tags: Option<Vec<String>>) -> &mut Self {
        self.tags = tags;
        self
    }

    /// The tag set currently attached to writes.
    pub fn get_tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    fn current_tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    // == Reads (delegated unchanged) ==
    pub fn get(&self, key: &str) -> Result<Value> {
        self.inner.get(key)
    }

    pub fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        self.inner.get_or(key, default)
    }

    pub fn get_multiple(&self, keys: &[&str]) -> Result<IndexMap<String, Value>> {
        self.inner.get_multiple(keys)
    }

    pub fn get_multiple_or(&self, keys: &[&str], default: Value) -> Result<IndexMap<String, Value>> {
        self.inner.get_multiple_or(keys, default)
    }

    pub fn has(&self, key: &str) -> Result<bool> {
        self.inner.has(key)
    }

    pub fn delete(&self, key: &str) -> Result<bool> {
        self.inner.delete(key)
    }

    pub fn delete_multiple(&self, keys: &[&str]) -> Result<bool> {
        self.inner.delete_multiple(keys)
    }

    pub fn clear(&self) -> Result<bool> {
        self.inner.clear()
    }

    // == Writes (tagged) ==
    /// Same contract as the simple facade, with the current tag set
    /// recorded in the same save as value and expiry.
    pub fn set(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        validate::validate_key(key)?;
        self.inner.write(key, value, ttl, Some(self.current_tags()))
    }

    /// Same contract as the simple facade's bulk write, each staged entry
    /// carrying the current tag set.
    pub fn set_multiple(&self, values: &[(&str, Value)], ttl: Ttl) -> Result<bool> {
        self.inner.write_many(values, ttl, Some(self.current_tags()))
    }

    // == Tag Queries ==
    /// Values of every live entry currently tagged `tag`, in write order.
    ///
    /// Members are re-read through the normal get path, so entries that
    /// expired since the index was last pruned are filtered out. An unknown
    /// tag yields an empty mapping, never an error.
    pub fn get_multiple_by_tag(&self, tag: &str) -> Result<IndexMap<String, Value>> {
        let raw_keys = self.pool().load_tag(tag)?;

        let mut out = IndexMap::with_capacity(raw_keys.len());
        for raw in raw_keys {
            let key = self.pool().strip_internal_key(&raw);
            let item = self.pool().get_item(&key)?;
            if item.is_hit() {
                out.insert(key, item.into_value());
            }
        }
        Ok(out)
    }

    // == Tag Eviction ==
    /// Evicts every entry carrying any of the given tags.
    ///
    /// True only when at least one matching entry existed and was removed;
    /// clearing tags with no members reports false.
    pub fn clear_by_tags(&self, tags: &[&str]) -> Result<bool> {
        let tags: Vec<String> = tags.iter().map(|tag| tag.to_string()).collect();
        Ok(self.pool().clean(&tags)?)
    }
}
