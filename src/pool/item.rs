//! Pool Item Module
//!
//! Defines the unit of exchange between a facade and an item pool: a keyed
//! item carrying a value, an optional absolute expiry instant, and the tags
//! to record on the next save. Also defines [`Ttl`], the normalized
//! time-to-live accepted by every write path.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Duration;
use serde_json::Value;

use crate::error::{CacheError, Result};

// == Time To Live ==
/// Normalized time-to-live for a write.
///
/// A non-positive duration means the entry is expired the moment it is
/// written. Such a write is still accepted, but the entry must never be
/// observable as a hit afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The entry never expires.
    Never,
    /// The entry expires this far in the future (or in the past, when the
    /// duration is zero or negative).
    After(Duration),
}

impl Ttl {
    /// Relative TTL in whole seconds. Negative values are allowed and
    /// produce an already-expired write.
    pub fn seconds(secs: i64) -> Self {
        Ttl::After(Duration::seconds(secs))
    }

    // == Loose-Input Parsing ==
    /// Parses a TTL out of dynamic JSON data.
    ///
    /// `null` means no expiry, an integer is a number of seconds. Any other
    /// shape is a malformed TTL and reported as `InvalidArgument` rather
    /// than silently defaulted.
    pub fn from_json(raw: &Value) -> Result<Ttl> {
        match raw {
            Value::Null => Ok(Ttl::Never),
            Value::Number(n) => n.as_i64().map(Ttl::seconds).ok_or_else(|| {
                CacheError::InvalidArgument(format!(
                    "ttl `{n}` is not a whole number of seconds"
                ))
            }),
            other => Err(CacheError::InvalidArgument(format!(
                "ttl must be null or an integer number of seconds, got `{other}`"
            ))),
        }
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::After(duration)
    }
}

// == Pool Item ==
/// A single cache item as seen by the item-pool contract.
///
/// Items are obtained from a pool (hit or miss), mutated through the chained
/// setters, and handed back via `save`/`save_deferred`. Tags are write-only:
/// an item loaded from the pool always starts with an empty tag set, and the
/// tags present at save time fully replace the entry's previous membership.
#[derive(Debug, Clone)]
pub struct PoolItem {
    /// Caller-facing key
    key: String,
    /// The payload, opaque to the facade
    value: Value,
    /// Whether the pool found a live entry for the key
    hit: bool,
    /// Absolute expiry instant (Unix milliseconds), None = no expiry
    expires_at: Option<u64>,
    /// Tags to record on the next save
    tags: Vec<String>,
}

impl PoolItem {
    // == Constructors ==
    /// Creates a miss item for a key with no live entry.
    pub fn miss(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Value::Null,
            hit: false,
            expires_at: None,
            tags: Vec::new(),
        }
    }

    /// Creates a hit item carrying the stored value and its expiry instant.
    pub fn hit(key: impl Into<String>, value: Value, expires_at: Option<u64>) -> Self {
        Self {
            key: key.into(),
            value,
            hit: true,
            expires_at,
            tags: Vec::new(),
        }
    }

    // == Accessors ==
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the pool found a live (non-expired) entry for this key.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the item and returns its value without cloning.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Absolute expiry instant in Unix milliseconds, None = no expiry.
    pub fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    // == Mutators ==
    /// Replaces the item's value.
    pub fn set(&mut self, value: Value) -> &mut Self {
        self.value = value;
        self
    }

    /// Resolves the TTL against the current clock and records the absolute
    /// expiry instant. A non-positive duration lands in the past, so the
    /// saved entry reads as a miss immediately.
    pub fn expires_after(&mut self, ttl: Ttl) -> &mut Self {
        self.expires_at = match ttl {
            Ttl::Never => None,
            Ttl::After(duration) => {
                let at = current_timestamp_ms() as i64 + duration.num_milliseconds();
                Some(at.max(0) as u64)
            }
        };
        self
    }

    /// Replaces the tags to record on the next save.
    pub fn set_tags(&mut self, tags: Vec<String>) -> &mut Self {
        self.tags = tags;
        self
    }

    // == Is Expired ==
    /// An item is expired once the current time reaches its expiry instant.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => current_timestamp_ms() >= at,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub(crate) fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as u64
}
