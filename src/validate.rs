//! Key Validation Module
//!
//! Shared key syntax rules enforced at every facade entry point and by the
//! bundled in-memory pool. A key must be non-empty and must not contain any
//! reserved character.

use crate::error::{CacheError, Result};

// == Reserved Characters ==
/// Characters that must never appear in a cache key.
pub const RESERVED_KEY_CHARS: [char; 8] = ['{', '}', '(', ')', '/', '\\', '@', ':'];

// == Violation Check ==
/// Returns a description of the first syntax rule the key breaks, or `None`
/// for a valid key. Pure, no side effects.
///
/// Pool implementations use this to raise their own invalid-key signal while
/// sharing the exact same rule set as the facade.
pub fn key_violation(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("key must not be empty".to_string());
    }
    if let Some(ch) = key.chars().find(|c| RESERVED_KEY_CHARS.contains(c)) {
        return Some(format!("key `{key}` contains reserved character `{ch}`"));
    }
    None
}

// == Validate Single Key ==
/// Validates one key, raising `InvalidKey` on violation.
pub fn validate_key(key: &str) -> Result<()> {
    match key_violation(key) {
        Some(msg) => Err(CacheError::InvalidKey(msg)),
        None => Ok(()),
    }
}

// == Validate Key Collection ==
/// Validates every key of a collection up front.
///
/// The first invalid key fails the whole call, so callers are guaranteed
/// that no partial work happens on a bad bulk input. On success the keys are
/// returned as owned strings in iteration order.
pub fn validate_keys<'a, I>(keys: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::new();
    for key in keys {
        validate_key(key)?;
        out.push(key.to_string());
    }
    Ok(out)
}
