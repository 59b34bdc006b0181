//! Logger metrics for observability
//!
//! Logging calls never return errors, so write failures surface here (and on
//! stderr) instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing how a logger's writes went
///
/// # Example
///
/// ```
/// use rust_logger_facade::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_failed_write();
///
/// assert_eq!(metrics.total_written(), 1);
/// assert_eq!(metrics.failed_write_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Core writes that completed
    total_written: AtomicU64,

    /// Core writes that returned an error or panicked
    failed_writes: AtomicU64,

    /// Flushes that returned an error or panicked
    failed_flushes: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_written: AtomicU64::new(0),
            failed_writes: AtomicU64::new(0),
            failed_flushes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_written(&self) -> u64 {
        self.total_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_write_count(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_flush_count(&self) -> u64 {
        self.failed_flushes.load(Ordering::Relaxed)
    }

    /// Record a completed write, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.total_written.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed write, returning the previous count
    #[inline]
    pub fn record_failed_write(&self) -> u64 {
        self.failed_writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed_flush(&self) -> u64 {
        self.failed_flushes.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes as a percentage of attempted writes (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_write_count() as f64;
        let total = self.total_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.total_written.store(0, Ordering::Relaxed);
        self.failed_writes.store(0, Ordering::Relaxed);
        self.failed_flushes.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            total_written: AtomicU64::new(self.total_written()),
            failed_writes: AtomicU64::new(self.failed_write_count()),
            failed_flushes: AtomicU64::new(self.failed_flush_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_written(), 0);
        assert_eq!(metrics.failed_write_count(), 0);
        assert_eq!(metrics.failed_flush_count(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_failed_write(), 0);
        assert_eq!(metrics.record_failed_write(), 1);
        assert_eq!(metrics.failed_write_count(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_failed_write();
        }
        let rate = metrics.failure_rate();
        assert!((rate - 10.0).abs() < f64::EPSILON, "Failure rate was {}", rate);
    }

    #[test]
    fn test_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_written();
        metrics.record_failed_flush();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.total_written(), 0);
        assert_eq!(snapshot.total_written(), 1);
        assert_eq!(snapshot.failed_flush_count(), 1);
    }
}
