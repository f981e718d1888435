//! Formatting helpers and run summaries for log output.

use std::time::{Duration, Instant};

use crate::collector::CollectionSummary;
use crate::metrics::bas::BasMetric;

/// Formats a count with thousands separators.
///
/// ```
/// use fgstats_lib::logging::format_count;
///
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(123), "123");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a fraction (0.0-1.0) as a percentage with `decimals` decimal places.
///
/// ```
/// use fgstats_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration as e.g. `45s`, `2m 15s` or `1h 30m`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a processing rate in records per second, or per minute when below one per second.
#[must_use]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} records/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} records/s", format_count(rate as u64))
    } else {
        format!("{:.1} records/min", count as f64 / (secs / 60.0))
    }
}

/// Logs how many records were read and how they were classified.
pub fn log_collection_summary(summary: &CollectionSummary) {
    log::info!("Record Summary:");
    log::info!("  Records read: {}", format_count(summary.records_read));
    log::info!("  Excluded (secondary/supplementary/QC-fail): {}", format_count(summary.excluded));
    log::info!("  Unmapped: {}", format_count(summary.unmapped));
    log::info!("  Mapped: {}", format_count(summary.mapped));
}

/// Logs one line per reported read group.
pub fn log_bas_summary(rows: &[BasMetric]) {
    log::info!("Read Group Summary ({} reported):", rows.len());
    for row in rows {
        let mapped = if row.total_reads > 0 {
            format_percent(row.mapped_reads as f64 / row.total_reads as f64, 2)
        } else {
            format_percent(0.0, 2)
        };
        log::info!(
            "  {}: {} reads, {} mapped, {} properly paired, mean insert {:.1}",
            row.readgroup,
            format_count(row.total_reads),
            mapped,
            format_count(row.mapped_reads_properly_paired),
            row.mean_insert_size
        );
    }
}

/// Logs the start of an operation and, on request, its completion with timing and throughput.
///
/// ```no_run
/// use fgstats_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Collecting read group statistics");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Time since the timer was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} records in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
