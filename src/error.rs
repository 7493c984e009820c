//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror. Two layers are involved:
//! the facade raises [`CacheError`], while item-pool implementations raise
//! [`PoolError`]. The facade translates pool-level key/argument signals into
//! its own kinds so callers never have to match on a pool's error type.

use thiserror::Error;

// == Pool Error Enum ==
/// Error raised by an item-pool collaborator.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Key rejected by the pool's own validation
    #[error("invalid pool key: {0}")]
    InvalidKey(String),

    /// Malformed argument handed to the pool
    #[error("invalid pool argument: {0}")]
    InvalidArgument(String),

    /// Opaque backend failure (I/O, commit, connection loss)
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

// == Cache Error Enum ==
/// Unified error type for the cache facade.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or contains a reserved character
    #[error("invalid cache key: {0}")]
    InvalidKey(String),

    /// Malformed argument (bad TTL, unusable collection)
    #[error("invalid cache argument: {0}")]
    InvalidArgument(String),

    /// Failure propagated unchanged from the underlying pool
    #[error("cache store failure: {0}")]
    Store(#[source] PoolError),
}

// == Pool-to-Facade Translation ==
/// Key and argument signals from the pool become the facade's own invalid
/// kinds, carrying the original message. Everything else passes through
/// untouched as a store failure.
impl From<PoolError> for CacheError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::InvalidKey(msg) => CacheError::InvalidKey(msg),
            PoolError::InvalidArgument(msg) => CacheError::InvalidArgument(msg),
            other => CacheError::Store(other),
        }
    }
}

// == Result Type Aliases ==
/// Convenience Result type for facade operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Convenience Result type for item-pool operations.
pub type PoolResult<T> = std::result::Result<T, PoolError>;
