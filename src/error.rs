//! Error types for the cache driver
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache drivers.
///
/// Producer failures from `remember` are not wrapped here: they come back to
/// the caller in the producer's own error type.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A counter operation found a non-integer value at the key
    #[error("invalid value type for counter at key: {key}")]
    InvalidValueType { key: String },

    /// The driver was built outside of a Tokio runtime
    #[error("no Tokio runtime available for expiry timers: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
