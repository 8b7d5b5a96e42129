//! Driver Contract
//!
//! The operation surface every cache backend exposes. Backends implement the
//! storage primitives; typed accessors, counters' convenience forms and
//! memoization are composed here on top of them.

use tokio_util::sync::CancellationToken;

use crate::cache::{Fallback, Ttl, Value};
use crate::error::{CacheError, Result};
use crate::lock::Lock;

/// A cache backend.
///
/// Methods that take closures are generic and bounded by `Self: Sized`, so
/// `dyn Driver` stays usable for the primitives.
pub trait Driver: Send + Sync {
    // == Primitives ==

    /// Stores `value` only if `key` is absent. Returns whether it was stored.
    fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool>;

    /// Stores `value`, replacing whatever is at `key`.
    fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()>;

    /// Returns the value at `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    fn has(&self, key: &str) -> bool;

    /// Removes `key`. Reports success even when the key was absent.
    fn forget(&self, key: &str) -> bool;

    /// Removes every key.
    fn flush(&self) -> bool;

    /// Adds `delta` to the integer at `key`, starting from zero if the key is
    /// absent, and returns the new value.
    ///
    /// Fails with [`CacheError::InvalidValueType`] when the key holds
    /// anything but an integer; the value is left untouched.
    fn increment_by(&self, key: &str, delta: i64) -> Result<i64>;

    /// Builds a lock handle for `key` bound to this driver.
    fn lock(&self, key: &str, ttl: Ttl) -> Lock;

    /// Binds a cancellation context to the driver and returns it.
    fn with_context(self, ctx: CancellationToken) -> Self
    where
        Self: Sized;

    /// The bound cancellation context, if one was set.
    fn context(&self) -> Option<&CancellationToken>;

    // == Writes ==

    /// Stores `value` with no expiration. Returns whether the write succeeded.
    fn forever(&self, key: &str, value: Value) -> bool {
        self.put(key, value, Ttl::Forever).is_ok()
    }

    // == Reads ==

    /// Returns the value at `key`, or resolves `fallback` on a miss.
    fn get_or(&self, key: &str, fallback: Fallback<'_>) -> Value {
        match self.get(key) {
            Some(value) => value,
            None => fallback.resolve(),
        }
    }

    /// Returns and removes the value at `key`.
    ///
    /// The read and the removal are separate steps: a write landing between
    /// them is removed too.
    fn pull(&self, key: &str) -> Option<Value> {
        let value = self.get(key);
        self.forget(key);
        value
    }

    /// Like [`Driver::pull`], resolving `fallback` on a miss.
    fn pull_or(&self, key: &str, fallback: Fallback<'_>) -> Value {
        let value = self.get_or(key, fallback);
        self.forget(key);
        value
    }

    // == Typed Accessors ==

    fn get_bool(&self, key: &str) -> bool {
        self.get_bool_or(key, false)
    }

    /// `default` is returned only on a miss; a present but unusable value
    /// yields `false`.
    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, |v| v.to_bool())
    }

    /// Platform-width integer; zero when the value does not fit.
    fn get_int(&self, key: &str) -> isize {
        self.get_int_or(key, 0)
    }

    fn get_int_or(&self, key: &str, default: isize) -> isize {
        self.get(key).map_or(default, |v| v.to_isize())
    }

    fn get_int64(&self, key: &str) -> i64 {
        self.get_int64_or(key, 0)
    }

    fn get_int64_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).map_or(default, |v| v.to_i64())
    }

    fn get_string(&self, key: &str) -> String {
        self.get_string_or(key, "")
    }

    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .map_or_else(|| default.to_string(), |v| v.to_string_lossy())
    }

    // == Counters ==

    fn increment(&self, key: &str) -> Result<i64> {
        self.increment_by(key, 1)
    }

    fn decrement(&self, key: &str) -> Result<i64> {
        self.decrement_by(key, 1)
    }

    fn decrement_by(&self, key: &str, delta: i64) -> Result<i64> {
        self.increment_by(key, delta.wrapping_neg())
    }

    // == Memoization ==

    /// Returns the cached value at `key`, or runs `producer`, stores its
    /// result for `ttl` and returns it.
    ///
    /// A failing producer's error is returned as is and nothing is stored.
    /// Concurrent misses may each run their own producer.
    ///
    /// `E` must also be able to carry a [`CacheError`], since storing the
    /// result can fail on backends other than memory. Producers failing with
    /// a foreign error such as `std::io::Error` need a wrapper enum with a
    /// `From<CacheError>` impl, or `anyhow::Error`.
    fn remember<F, E>(&self, key: &str, ttl: Ttl, producer: F) -> std::result::Result<Value, E>
    where
        Self: Sized,
        F: FnOnce() -> std::result::Result<Value, E>,
        E: From<CacheError>,
    {
        read_through(self, key, ttl, producer)
    }

    /// [`Driver::remember`] with no expiration.
    fn remember_forever<F, E>(&self, key: &str, producer: F) -> std::result::Result<Value, E>
    where
        Self: Sized,
        F: FnOnce() -> std::result::Result<Value, E>,
        E: From<CacheError>,
    {
        self.remember(key, Ttl::Forever, producer)
    }
}

/// Read-through memoization shared by every `remember` implementation:
/// a hit returns the cached value, a miss runs `producer` and stores its
/// result.
pub(crate) fn read_through<D, F, E>(
    driver: &D,
    key: &str,
    ttl: Ttl,
    producer: F,
) -> std::result::Result<Value, E>
where
    D: Driver + ?Sized,
    F: FnOnce() -> std::result::Result<Value, E>,
    E: From<CacheError>,
{
    if let Some(value) = driver.get(key) {
        return Ok(value);
    }

    let value = producer()?;
    driver.put(key, value.clone(), ttl)?;
    Ok(value)
}
