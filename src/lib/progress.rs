//! Progress logging for long record scans.
//!
//! [`ProgressTracker`] keeps a running count of processed records and emits an `info` line each
//! time the count crosses a multiple of its interval.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of records between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// # Example
/// ```
/// use fgstats_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Processed records").with_interval(100);
///
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // Logs at 100, 200
/// }
/// tracker.log_final(); // Logs "Processed records 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: AtomicU64,
}

impl ProgressTracker {
    /// Create a tracker that logs every [`DEFAULT_PROGRESS_INTERVAL`] items.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            interval: DEFAULT_PROGRESS_INTERVAL,
            message: message.into(),
            count: AtomicU64::new(0),
        }
    }

    /// Set the logging interval. An interval of zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// The logging interval.
    #[must_use]
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Add `additional` to the count, logging once for every interval boundary crossed.
    ///
    /// Returns `true` if the new count lies exactly on an interval boundary.
    ///
    /// ```
    /// use fgstats_lib::progress::ProgressTracker;
    ///
    /// let tracker = ProgressTracker::new("Items").with_interval(100);
    /// assert!(!tracker.log_if_needed(50)); // count=50, no log
    /// assert!(!tracker.log_if_needed(60)); // count=110, logs "Items 100"
    /// assert!(tracker.log_if_needed(90)); // count=200, logs "Items 200"
    /// ```
    pub fn log_if_needed(&self, additional: u64) -> bool {
        if additional == 0 {
            let count = self.count.load(Ordering::Relaxed);
            return count > 0 && count.is_multiple_of(self.interval);
        }

        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        for i in (prev / self.interval + 1)..=(new_count / self.interval) {
            info!("{} {}", self.message, i * self.interval);
        }

        new_count.is_multiple_of(self.interval)
    }

    /// Log the final count unless the last update already landed on a boundary.
    pub fn log_final(&self) {
        if !self.log_if_needed(0) {
            let count = self.count.load(Ordering::Relaxed);
            if count > 0 {
                info!("{} {} (complete)", self.message, count);
            }
        }
    }

    /// Number of items recorded so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
