//! Cache Module
//!
//! Provides the in-memory driver and the value, TTL, storage and statistics
//! types it is built from.

mod coerce;
mod memory;
mod stats;
mod store;
mod ttl;
mod value;


// Re-export public types
pub use memory::MemoryDriver;
pub use stats::{CacheStats, StatsRecorder};
pub use store::Store;
pub use ttl::Ttl;
pub use value::{Fallback, Value};
