//! Item Pool Module
//!
//! The abstract store contract the facades are built on, plus the bundled
//! in-memory implementation.
//!
//! A pool hands out [`PoolItem`]s that report hit or miss, accepts immediate
//! saves as well as the stage-then-flush pattern (`save_deferred` followed
//! by `commit`), and deletes by key. A [`TaggableItemPool`] additionally
//! maintains a tag index that can be queried and evicted by tag.

mod item;
mod memory;
mod recency;
mod stats;

use std::sync::Arc;

use crate::error::PoolResult;

// Re-export public types
pub use item::{PoolItem, Ttl};
pub use memory::{MemoryPool, INTERNAL_KEY_PREFIX};
pub use stats::PoolStats;

// == Item Pool Contract ==
/// Minimal per-item store operations a facade needs.
///
/// Implementations own all concurrency control. Every method takes `&self`
/// so one pool instance can be shared behind an `Arc`.
pub trait ItemPool {
    /// Fetches the item for a key. An expired or absent entry yields a miss
    /// item, never an error.
    fn get_item(&self, key: &str) -> PoolResult<PoolItem>;

    /// Fetches one item per requested key, in request order.
    fn get_items(&self, keys: &[String]) -> PoolResult<Vec<PoolItem>>;

    /// Whether a live entry exists, without materializing the value.
    fn has_item(&self, key: &str) -> PoolResult<bool>;

    /// Persists one item immediately.
    fn save(&self, item: PoolItem) -> PoolResult<bool>;

    /// Stages an item for the next [`commit`](ItemPool::commit).
    fn save_deferred(&self, item: PoolItem) -> PoolResult<bool>;

    /// Flushes every staged item. Items applied before a mid-flush failure
    /// stay applied; the return value reports whether all of them landed.
    fn commit(&self) -> PoolResult<bool>;

    /// Removes one entry. Removing an absent key is a success.
    fn delete_item(&self, key: &str) -> PoolResult<bool>;

    /// Removes a set of entries, reporting whether the whole set is gone.
    fn delete_items(&self, keys: &[String]) -> PoolResult<bool>;

    /// Wipes the whole pool.
    fn clear(&self) -> PoolResult<bool>;
}

// == Taggable Pool Contract ==
/// Tag-index operations on top of the base pool contract.
pub trait TaggableItemPool: ItemPool {
    /// Storage-internal keys currently tagged `tag`.
    fn load_tag(&self, tag: &str) -> PoolResult<Vec<String>>;

    /// Evicts every entry carrying any of the given tags. True only when at
    /// least one live entry was removed.
    fn clean(&self, tags: &[String]) -> PoolResult<bool>;

    /// Translates a storage-internal key back to the caller-facing key.
    fn strip_internal_key(&self, raw: &str) -> String {
        raw.to_string()
    }
}

// == Shared-Pool Forwarding ==
// Lets a facade and a background task share one pool via Arc.
impl<P: ItemPool + ?Sized> ItemPool for Arc<P> {
    fn get_item(&self, key: &str) -> PoolResult<PoolItem> {
        (**self).get_item(key)
    }

    fn get_items(&self, keys: &[String]) -> PoolResult<Vec<PoolItem>> {
        (**self).get_items(keys)
    }

    fn has_item(&self, key: &str) -> PoolResult<bool> {
        (**self).has_item(key)
    }

    fn save(&self, item: PoolItem) -> PoolResult<bool> {
        (**self).save(item)
    }

    fn save_deferred(&self, item: PoolItem) -> PoolResult<bool> {
        (**self).save_deferred(item)
    }

    fn commit(&self) -> PoolResult<bool> {
        (**self).commit()
    }

    fn delete_item(&self, key: &str) -> PoolResult<bool> {
        (**self).delete_item(key)
    }

    fn delete_items(&self, keys: &[String]) -> PoolResult<bool> {
        (**self).delete_items(keys)
    }

    fn clear(&self) -> PoolResult<bool> {
        (**self).clear()
    }
}

impl<P: TaggableItemPool + ?Sized> TaggableItemPool for Arc<P> {
    fn load_tag(&self, tag: &str) -> PoolResult<Vec<String>> {
        (**self).load_tag(tag)
    }

    fn clean(&self, tags: &[String]) -> PoolResult<bool> {
        (**self).clean(tags)
    }

    fn strip_internal_key(&self, raw: &str) -> String {
        (**self).strip_internal_key(raw)
    }
}
