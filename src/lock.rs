//! Lock Handle
//!
//! Key-scoped mutual exclusion built on a driver's `add`/`forget`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cache::{Ttl, Value};
use crate::driver::Driver;
use crate::error::Result;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

// == Lock ==
/// A lock on one key of a driver.
///
/// The lock is held while the key stores this handle's owner token. A
/// finite TTL lets a lock whose holder disappeared lapse on its own.
pub struct Lock {
    driver: Arc<dyn Driver>,
    key: String,
    ttl: Ttl,
    owner: String,
}

impl Lock {
    pub fn new(driver: Arc<dyn Driver>, key: &str, ttl: Ttl) -> Self {
        let owner = format!("lock-owner-{}", NEXT_OWNER.fetch_add(1, Ordering::Relaxed));
        Self {
            driver,
            key: key.to_string(),
            ttl,
            owner,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Token stored at the key while this handle holds the lock.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Tries once to take the lock. Returns whether it was taken.
    pub fn try_acquire(&self) -> Result<bool> {
        self.driver
            .add(&self.key, Value::from(self.owner.as_str()), self.ttl)
    }

    /// Releases the lock if this handle holds it.
    pub fn release(&self) -> bool {
        let held = self
            .driver
            .get(&self.key)
            .is_some_and(|v| v.as_str() == Some(self.owner.as_str()));
        held && self.driver.forget(&self.key)
    }

    /// Releases the lock whoever holds it.
    pub fn force_release(&self) -> bool {
        self.driver.forget(&self.key)
    }
}

impl fmt::Debug for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
