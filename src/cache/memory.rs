//! Memory Driver Module
//!
//! In-process `Driver` backed by the concurrent `Store`, with per-key expiry
//! timers running on a Tokio runtime.

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::cache::{CacheStats, StatsRecorder, Store, Ttl, Value};
use crate::config::{DriverConfig, RememberPolicy};
use crate::driver::{read_through, Driver};
use crate::error::{CacheError, Result};
use crate::lock::Lock;
use crate::tasks::spawn_expiry;

/// State shared by every clone of a driver.
struct Inner {
    store: Store,
    stats: StatsRecorder,
    config: DriverConfig,
    runtime: Handle,
    /// Per-key gates for single-flight `remember`
    flights: DashMap<String, Arc<Mutex<()>>>,
}

// == Memory Driver ==
/// Cache driver keeping everything in process memory.
///
/// Cloning is cheap and clones share the same entries. A finite TTL arms a
/// one-shot timer that later deletes whatever is stored at the key at that
/// moment; timers are never cancelled, so overwriting a key does not extend
/// its life.
///
/// # Example
///
/// ```rust,no_run
/// use memcache_driver::{Driver, MemoryDriver, Ttl, Value};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = MemoryDriver::new().unwrap();
///
///     cache.put("greeting", Value::from("hello"), Ttl::from(Duration::from_secs(60))).unwrap();
///     assert_eq!(cache.get_string("greeting"), "hello");
///
///     assert_eq!(cache.increment("visits").unwrap(), 1);
/// }
/// ```
#[derive(Clone)]
pub struct MemoryDriver {
    inner: Arc<Inner>,
    ctx: Option<CancellationToken>,
}

impl MemoryDriver {
    // == Constructors ==
    /// Creates a driver with default configuration on the current runtime.
    ///
    /// Fails with [`CacheError::NoRuntime`] outside of a Tokio runtime.
    pub fn new() -> Result<Self> {
        Self::with_config(DriverConfig::default())
    }

    /// Creates a driver with custom configuration on the current runtime.
    pub fn with_config(config: DriverConfig) -> Result<Self> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_handle(config, runtime))
    }

    /// Creates a driver whose timers run on `runtime`.
    pub fn with_handle(config: DriverConfig, runtime: Handle) -> Self {
        debug!(
            remember_policy = %config.remember_policy,
            arm_ttl_on_failed_add = config.arm_ttl_on_failed_add,
            "memory cache driver created"
        );
        Self {
            inner: Arc::new(Inner {
                store: Store::new(),
                stats: StatsRecorder::new(),
                config,
                runtime,
                flights: DashMap::new(),
            }),
            ctx: None,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.inner.config
    }

    // == Stats ==
    /// Returns current driver statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot(self.inner.store.len())
    }

    pub fn len(&self) -> usize {
        self.inner.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.is_empty()
    }

    // == Expiry ==
    /// Arms a timer that deletes `key` after `ttl`.
    fn schedule_expiry(&self, key: &str, ttl: Duration) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let key = key.to_string();

        self.inner.stats.timer_armed();
        spawn_expiry(&self.inner.runtime, ttl, move || {
            // Driver dropped: nothing left to expire
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let removed = inner.store.remove(&key);
            inner.stats.timer_fired(removed);
            if removed {
                debug!(key = %key, "entry expired");
            }
        });
    }

    // == Single Flight ==
    fn remember_single_flight<F, E>(
        &self,
        key: &str,
        ttl: Ttl,
        producer: F,
    ) -> std::result::Result<Value, E>
    where
        F: FnOnce() -> std::result::Result<Value, E>,
        E: From<CacheError>,
    {
        let gate = Arc::clone(self.inner.flights.entry(key.to_string()).or_default().value());

        let result = {
            let _guard = gate.lock();
            match self.get(key) {
                Some(value) => Ok(value),
                None => producer().and_then(|value| {
                    self.put(key, value.clone(), ttl)?;
                    Ok(value)
                }),
            }
        };

        // Drop the gate once no other caller is waiting on it
        drop(gate);
        self.inner
            .flights
            .remove_if(key, |_, gate| Arc::strong_count(gate) == 1);

        result
    }
}

impl Driver for MemoryDriver {
    // == Add ==
    fn add(&self, key: &str, value: Value, ttl: Ttl) -> Result<bool> {
        let inserted = self.inner.store.insert_if_absent(key, value);

        if let Some(ttl) = ttl.duration() {
            if inserted || self.inner.config.arm_ttl_on_failed_add {
                self.schedule_expiry(key, ttl);
            }
        }

        Ok(inserted)
    }

    // == Put ==
    fn put(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        self.inner.store.insert(key, value);

        if let Some(ttl) = ttl.duration() {
            self.schedule_expiry(key, ttl);
        }

        Ok(())
    }

    // == Get ==
    fn get(&self, key: &str) -> Option<Value> {
        let value = self.inner.store.get(key);
        if value.is_some() {
            self.inner.stats.record_hit();
            trace!(key, "cache hit");
        } else {
            self.inner.stats.record_miss();
            trace!(key, "cache miss");
        }
        value
    }

    fn has(&self, key: &str) -> bool {
        self.inner.store.contains(key)
    }

    fn forget(&self, key: &str) -> bool {
        self.inner.store.remove(key);
        true
    }

    // == Flush ==
    fn flush(&self) -> bool {
        let dropped = self.inner.store.swap_empty();
        self.inner.stats.record_flush();
        debug!(dropped, "cache flushed");
        true
    }

    // == Counters ==
    fn increment_by(&self, key: &str, delta: i64) -> Result<i64> {
        self.inner.store.update_or_init(
            key,
            || Value::Int(0),
            |cell| {
                // JSON integers become plain integer cells on first use
                let json_int = match cell {
                    Value::Json(serde_json::Value::Number(num)) => num.as_i64(),
                    _ => None,
                };
                if let Some(n) = json_int {
                    *cell = Value::Int(n);
                }
                match cell {
                    Value::Int(n) => {
                        *n = n.wrapping_add(delta);
                        Ok(*n)
                    }
                    _ => {
                        warn!(key, "counter operation on non-integer value");
                        Err(CacheError::InvalidValueType {
                            key: key.to_string(),
                        })
                    }
                }
            },
        )
    }

    // == Lock ==
    fn lock(&self, key: &str, ttl: Ttl) -> Lock {
        Lock::new(Arc::new(self.clone()), key, ttl)
    }

    // == Context ==
    fn with_context(mut self, ctx: CancellationToken) -> Self {
        self.ctx = Some(ctx);
        self
    }

    fn context(&self) -> Option<&CancellationToken> {
        self.ctx.as_ref()
    }

    // == Remember ==
    fn remember<F, E>(&self, key: &str, ttl: Ttl, producer: F) -> std::result::Result<Value, E>
    where
        F: FnOnce() -> std::result::Result<Value, E>,
        E: From<CacheError>,
    {
        match self.inner.config.remember_policy {
            RememberPolicy::SingleFlight => self.remember_single_flight(key, ttl, producer),
            RememberPolicy::Independent => read_through(self, key, ttl, producer),
        }
    }
}
