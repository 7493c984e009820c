//! Tagcache - a key/value cache facade with tag-based invalidation
//!
//! Presents a simple get/set/delete/has/clear contract, with bulk variants,
//! on top of an abstract item-pool store. The tagged facade additionally
//! attaches tags to written entries so they can be read back or evicted by
//! tag in one call.
//!
//! The crate ships [`MemoryPool`], an in-memory pool with lazy expiry,
//! recency eviction and a tag index; any store implementing [`ItemPool`]
//! (and [`TaggableItemPool`] for the tagged facade) plugs in the same way.
//!
//! ```
//! use serde_json::json;
//! use tagcache::{MemoryPool, TaggedCache, Ttl};
//!
//! let mut cache = TaggedCache::new(MemoryPool::new(1024));
//! cache.set_tags(Some(vec!["sessions".to_string()]));
//!
//! cache.set("user.42", json!({"name": "ada"}), Ttl::seconds(300)).unwrap();
//! assert!(cache.has("user.42").unwrap());
//!
//! cache.clear_by_tags(&["sessions"]).unwrap();
//! assert!(!cache.has("user.42").unwrap());
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod pool;
pub mod tasks;
pub mod validate;

pub use config::PoolConfig;
pub use error::{CacheError, PoolError, PoolResult, Result};
pub use facade::{SimpleCache, TaggedCache};
pub use pool::{ItemPool, MemoryPool, PoolItem, PoolStats, TaggableItemPool, Ttl};
pub use tasks::spawn_purge_task;
