//! Expiry Task
//!
//! One-shot timers that run a deletion callback once a TTL has elapsed.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

/// Spawns a task on `runtime` that sleeps for `ttl` and then runs `on_fire`.
///
/// The driver never keeps the returned handle, so once armed the callback
/// runs unless the runtime shuts down first.
///
/// # Arguments
/// * `runtime` - Handle of the runtime that owns the timer
/// * `ttl` - Delay before firing
/// * `on_fire` - Callback run exactly once when the timer fires
///
/// # Example
/// ```ignore
/// let handle = spawn_expiry(&Handle::current(), Duration::from_secs(5), move || {
///     store.remove(&key);
/// });
/// ```
pub fn spawn_expiry<F>(runtime: &Handle, ttl: Duration, on_fire: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    runtime.spawn(async move {
        tokio::time::sleep(ttl).await;
        trace!(?ttl, "expiry timer fired");
        on_fire();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_expiry_fires_once_after_ttl() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        let handle = spawn_expiry(&Handle::current(), Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(fired.load(Ordering::SeqCst), 0, "Timer should not fire early");

        handle.await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_waits_for_ttl() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        let handle = spawn_expiry(&Handle::current(), Duration::from_millis(300), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!handle.is_finished());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }
}
