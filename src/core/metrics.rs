//! Logger metrics for observability
//!
//! Counters for the producer side (enqueued, dropped, truncated) and the
//! consumer side (flushes, written records, sink failures).

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use dm_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_written(1);
///
/// assert_eq!(metrics.records_enqueued(), 1);
/// assert_eq!(metrics.records_written(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records pushed onto the queue
    records_enqueued: AtomicU64,

    /// Records dropped before reaching the queue (formatting failures)
    records_dropped: AtomicU64,

    /// Records cut at the maximum length
    records_truncated: AtomicU64,

    /// Records drained and handed to the sinks
    records_written: AtomicU64,

    /// Completed flush passes
    flushes: AtomicU64,

    /// Out-of-band wake-ups requested by error records
    immediate_wakes: AtomicU64,

    /// Sink write or flush failures (counted once per sink per flush)
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_enqueued: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            records_truncated: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            immediate_wakes: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_enqueued(&self) -> u64 {
        self.records_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_dropped(&self) -> u64 {
        self.records_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_truncated(&self) -> u64 {
        self.records_truncated.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn immediate_wakes(&self) -> u64 {
        self.immediate_wakes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Record an enqueued record, returning the previous count
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.records_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.records_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_truncated(&self) -> u64 {
        self.records_truncated.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self, count: u64) -> u64 {
        self.records_written.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_immediate_wake(&self) -> u64 {
        self.immediate_wakes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Records enqueued but not yet handed to the sinks
    pub fn backlog(&self) -> u64 {
        self.records_enqueued().saturating_sub(self.records_written())
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_enqueued.store(0, Ordering::Relaxed);
        self.records_dropped.store(0, Ordering::Relaxed);
        self.records_truncated.store(0, Ordering::Relaxed);
        self.records_written.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
        self.immediate_wakes.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_enqueued: AtomicU64::new(self.records_enqueued()),
            records_dropped: AtomicU64::new(self.records_dropped()),
            records_truncated: AtomicU64::new(self.records_truncated()),
            records_written: AtomicU64::new(self.records_written()),
            flushes: AtomicU64::new(self.flushes()),
            immediate_wakes: AtomicU64::new(self.immediate_wakes()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_enqueued(), 0);
        assert_eq!(metrics.records_dropped(), 0);
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.flushes(), 0);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_metrics_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_dropped(), 0);
        assert_eq!(metrics.records_dropped(), 1);
        assert_eq!(metrics.record_written(5), 0);
        assert_eq!(metrics.record_written(2), 5);
        assert_eq!(metrics.records_written(), 7);
    }

    #[test]
    fn test_backlog() {
        let metrics = LoggerMetrics::new();
        for _ in 0..10 {
            metrics.record_enqueued();
        }
        metrics.record_written(4);
        assert_eq!(metrics.backlog(), 6);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_enqueued();
        metrics.record_flush();
        metrics.record_immediate_wake();

        metrics.reset();

        assert_eq!(metrics.records_enqueued(), 0);
        assert_eq!(metrics.flushes(), 0);
        assert_eq!(metrics.immediate_wakes(), 0);
    }

    #[test]
    fn test_metrics_clone() {
        let metrics = LoggerMetrics::new();
        metrics.record_dropped();
        metrics.record_enqueued();
        metrics.record_enqueued();

        let snapshot = metrics.clone();
        assert_eq!(snapshot.records_dropped(), 1);
        assert_eq!(snapshot.records_enqueued(), 2);

        // Original and clone are independent
        metrics.record_dropped();
        assert_eq!(metrics.records_dropped(), 2);
        assert_eq!(snapshot.records_dropped(), 1);
    }
}
