//! Cache Statistics Module
//!
//! Tracks driver activity: hits, misses, fired expirations and flushes.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of driver metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of reads that found a value
    pub hits: u64,
    /// Number of reads that found nothing
    pub misses: u64,
    /// Number of expiry timers that removed an entry
    pub expirations: u64,
    /// Expiry timers armed but not yet fired
    pub pending_timers: u64,
    /// Number of whole-store flushes
    pub flushes: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by every clone of a driver.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    pending_timers: AtomicU64,
    flushes: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    /// A timer was armed.
    pub fn timer_armed(&self) {
        self.pending_timers.fetch_add(1, Ordering::Relaxed);
    }

    /// A timer fired; `removed` tells whether it deleted anything.
    pub fn timer_fired(&self, removed: bool) {
        self.pending_timers.fetch_sub(1, Ordering::Relaxed);
        if removed {
            self.expirations.fetch_add(1, Ordering::Relaxed);
        }
    }

    // == Snapshot ==
    /// Copies the counters into a `CacheStats`.
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            pending_timers: self.pending_timers.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StatsRecorder::new().snapshot(0);
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::new();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        assert_eq!(recorder.snapshot(0).hit_rate(), 0.75);
    }

    #[test]
    fn test_timer_accounting() {
        let recorder = StatsRecorder::new();
        recorder.timer_armed();
        recorder.timer_armed();
        recorder.timer_fired(true);

        let stats = recorder.snapshot(3);
        assert_eq!(stats.pending_timers, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 3);

        recorder.timer_fired(false);
        let stats = recorder.snapshot(3);
        assert_eq!(stats.pending_timers, 0);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_record_flush() {
        let recorder = StatsRecorder::new();
        recorder.record_flush();
        assert_eq!(recorder.snapshot(0).flushes, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let recorder = StatsRecorder::new();
        recorder.record_miss();
        let json = serde_json::to_value(recorder.snapshot(2)).unwrap();
        assert_eq!(json["misses"], 1);
        assert_eq!(json["total_entries"], 2);
    }
}
