//! TTL Module
//!
//! Lifetime given to an entry when it is written.

use std::time::Duration;

// == Ttl ==
/// Time-to-live attached to a write.
///
/// A zero duration means no expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    #[default]
    Forever,
    After(Duration),
}

impl Ttl {
    /// Returns the finite duration, if any.
    pub fn duration(self) -> Option<Duration> {
        match self {
            Ttl::Forever => None,
            Ttl::After(d) => Some(d),
        }
    }

    pub fn is_forever(self) -> bool {
        matches!(self, Ttl::Forever)
    }
}

impl From<Duration> for Ttl {
    fn from(d: Duration) -> Self {
        if d.is_zero() {
            Ttl::Forever
        } else {
            Ttl::After(d)
        }
    }
}

impl From<Option<Duration>> for Ttl {
    fn from(d: Option<Duration>) -> Self {
        d.map_or(Ttl::Forever, Ttl::from)
    }
}
