//! Memcache Driver - An in-process cache driver
//!
//! Provides a key-value store with per-key TTL expiration, atomic counters,
//! memoization helpers and key-scoped lock handles, behind the `Driver`
//! contract shared by cache backends.

pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod lock;
pub mod tasks;

pub use cache::{CacheStats, Fallback, MemoryDriver, Ttl, Value};
pub use config::{DriverConfig, RememberPolicy};
pub use driver::Driver;
pub use error::{CacheError, Result};
pub use lock::Lock;
