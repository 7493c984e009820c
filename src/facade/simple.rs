//! Simple Cache Facade
//!
//! Key/value contract on top of an abstract item pool: get, set, delete,
//! existence check and clear, each with a bulk variant. The facade owns key
//! validation and TTL normalization; everything else is translated into
//! item-pool calls and aggregated back into a simple outcome.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;
use crate::pool::{ItemPool, Ttl};
use crate::validate;

// == Simple Cache ==
/// Cache facade over an item pool.
///
/// Every operation validates its keys before touching the pool, so a
/// validation failure never leaves partial state behind. Hit or miss is the
/// only distinction surfaced on reads: a stored null is a hit and comes back
/// as null, indistinguishable from a null default.
#[derive(Debug)]
pub struct SimpleCache<P: ItemPool> {
    pool: P,
}

impl<P: ItemPool> SimpleCache<P> {
    /// Wraps an already-constructed item pool.
    pub fn new(pool: P) -> Self {
        Self { pool }
    }

    /// The underlying item pool.
    pub fn pool(&self) -> &P {
        &self.pool
    }

    // == Get ==
    /// Returns the stored value, or `Value::Null` on a miss.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.get_or(key, Value::Null)
    }

    /// Returns the stored value, or `default` unmodified on a miss.
    ///
    /// An expired entry is a miss even if the pool has not physically
    /// purged it yet.
    pub fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        validate::validate_key(key)?;
        let item = self.pool.get_item(key)?;
        Ok(if item.is_hit() {
            item.into_value()
        } else {
            default
        })
    }

    // == Get Multiple ==
    /// Bulk [`get`](Self::get), with `Value::Null` standing in for misses.
    pub fn get_multiple(&self, keys: &[&str]) -> Result<IndexMap<String, Value>> {
        self.get_multiple_or(keys, Value::Null)
    }

    /// Bulk [`get_or`](Self::get_or).
    ///
    /// The result maps every requested key to its value or to `default`,
    /// in request order. A key requested twice appears once.
    pub fn get_multiple_or(&self, keys: &[&str], default: Value) -> Result<IndexMap<String, Value>> {
        let keys = validate::validate_keys(keys.iter().copied())?;
        let items = self.pool.get_items(&keys)?;

        let mut out = IndexMap::with_capacity(items.len());
        for item in items {
            let key = item.key().to_string();
            let value = if item.is_hit() {
                item.into_value()
            } else {
                default.clone()
            };
            out.insert(key, value);
        }
        Ok(out)
    }

    // == Has ==
    /// Whether a live entry exists, without materializing the value.
    pub fn has(&self, key: &str) -> Result<bool> {
        validate::validate_key(key)?;
        Ok(self.pool.has_item(key)?)
    }

    // == Set ==
    /// Writes value and TTL as one item and persists it immediately.
    pub fn set(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        validate::validate_key(key)?;
        self.write(key, value, ttl, None)
    }

    // == Set Multiple ==
    /// Writes a batch of entries sharing one TTL.
    ///
    /// Every key is validated before the first write is issued. The entries
    /// are then staged through the pool's deferred path and flushed in one
    /// commit; the result is true only if every staged write and the final
    /// commit succeeded. Once a staged write reports failure, the remaining
    /// entries are not staged and the commit is skipped.
    pub fn set_multiple(&self, values: &[(&str, Value)], ttl: Ttl) -> Result<bool> {
        self.write_many(values, ttl, None)
    }

    // == Delete ==
    /// Removes an entry. Deleting an absent key is a success, the
    /// post-condition already holds.
    pub fn delete(&self, key: &str) -> Result<bool> {
        validate::validate_key(key)?;
        Ok(self.pool.delete_item(key)?)
    }

    /// Bulk delete. The whole key collection is validated before any
    /// removal is requested.
    pub fn delete_multiple(&self, keys: &[&str]) -> Result<bool> {
        let keys = validate::validate_keys(keys.iter().copied())?;
        Ok(self.pool.delete_items(&keys)?)
    }

    // == Clear ==
    /// Wipes the whole pool.
    pub fn clear(&self) -> Result<bool> {
        Ok(self.pool.clear()?)
    }

    // == Shared Write Paths ==
    /// Single-item write path. Value, expiry and (optionally) tags land on
    /// the item before the one `save` call, so they become visible together.
    pub(crate) fn write(
        &self,
        key: &str,
        value: Value,
        ttl: Ttl,
        tags: Option<&[String]>,
    ) -> Result<bool> {
        let mut item = self.pool.get_item(key)?;
        item.set(value).expires_after(ttl);
        if let Some(tags) = tags {
            item.set_tags(tags.to_vec());
        }
        Ok(self.pool.save(item)?)
    }

    /// Batch write path shared with the tagged facade.
    pub(crate) fn write_many(
        &self,
        values: &[(&str, Value)],
        ttl: Ttl,
        tags: Option<&[String]>,
    ) -> Result<bool> {
        let keys = validate::validate_keys(values.iter().map(|(key, _)| *key))?;
        let items = self.pool.get_items(&keys)?;

        let mut success = true;
        for (mut item, (_, value)) in items.into_iter().zip(values.iter()) {
            item.set(value.clone()).expires_after(ttl);
            if let Some(tags) = tags {
                item.set_tags(tags.to_vec());
            }
            success = success && self.pool.save_deferred(item)?;
        }

        Ok(success && self.pool.commit()?)
    }
}
