//! Sparse insert size histogram and the mean / standard deviation / median estimator.
//!
//! Insert sizes from proper pairs are accumulated as `magnitude -> count` bins so memory grows
//! with the number of distinct insert sizes rather than with the number of pairs. The
//! statistics are computed once, directly from the bins, when the scan is complete.

use ahash::AHashMap;
use log::debug;

use crate::errors::{Result, StatsError};

/// Summary statistics of an insert size distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InsertSizeStats {
    /// Arithmetic mean of all observations
    pub mean: f64,
    /// Population standard deviation of all observations
    pub sd: f64,
    /// Median, averaged across two bins when the middle ranks are split between them
    pub median: f64,
}

/// Frequency map from insert size magnitude to number of observations.
#[derive(Debug, Clone, Default)]
pub struct InsertSizeHistogram {
    bins: AHashMap<u64, u64>,
}

impl InsertSizeHistogram {
    /// Creates an empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation of `magnitude`.
    pub fn add(&mut self, magnitude: u64) {
        *self.bins.entry(magnitude).or_insert(0) += 1;
    }

    /// Records `count` observations of `magnitude`.
    pub fn add_count(&mut self, magnitude: u64, count: u64) {
        if count > 0 {
            *self.bins.entry(magnitude).or_insert(0) += count;
        }
    }

    /// Number of observations recorded for `magnitude`.
    #[must_use]
    pub fn count(&self, magnitude: u64) -> u64 {
        self.bins.get(&magnitude).copied().unwrap_or(0)
    }

    /// Total number of observations across all bins.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.values().sum()
    }

    /// Number of distinct magnitudes observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Computes mean, standard deviation and median, consuming the histogram.
    ///
    /// The median walks the bins in ascending order of magnitude until the cumulative count
    /// reaches rank `total / 2 + 1`. When the total is even and the lower middle rank
    /// (`total / 2`) falls in the preceding bin, the median is the average of the two bins'
    /// magnitudes; otherwise it is the magnitude of the bin that was reached.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptyHistogram`] if nothing was recorded.
    ///
    /// # Example
    ///
    /// ```
    /// use fgstats_lib::insert_size::InsertSizeHistogram;
    ///
    /// let mut histogram = InsertSizeHistogram::new();
    /// histogram.add_count(200, 50);
    /// histogram.add_count(100, 50);
    ///
    /// let stats = histogram.compute_statistics().unwrap();
    /// assert_eq!(stats.mean, 150.0);
    /// assert_eq!(stats.sd, 50.0);
    /// assert_eq!(stats.median, 150.0);
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn compute_statistics(self) -> Result<InsertSizeStats> {
        let (total, weighted_sum) = self
            .bins
            .iter()
            .fold((0u64, 0u64), |(total, sum), (&key, &count)| (total + count, sum + key * count));
        if total == 0 {
            return Err(StatsError::EmptyHistogram);
        }

        let mean = weighted_sum as f64 / total as f64;

        let mut keys: Vec<u64> = self.bins.keys().copied().collect();
        keys.sort_unstable();

        let lower_middle = total / 2;
        let midpoint = lower_middle + 1;
        let mut insert = 0;
        let mut prev_insert = 0;
        let mut running_total = 0;
        let mut current_bin_count = 0;
        for &key in &keys {
            let count = self.bins[&key];
            insert = key;
            running_total += count;
            current_bin_count = count;
            if running_total >= midpoint {
                break;
            }
            prev_insert = key;
        }

        let median = if total % 2 == 0 && running_total - lower_middle >= current_bin_count {
            (insert as f64 + prev_insert as f64) / 2.0
        } else {
            insert as f64
        };

        let squared_deviations: f64 = self
            .bins
            .iter()
            .map(|(&key, &count)| {
                let diff = key as f64 - mean;
                diff * diff * count as f64
            })
            .sum();
        let variance = squared_deviations / total as f64;
        let sd = variance.abs().sqrt();

        Ok(InsertSizeStats { mean, sd, median })
    }

    /// Computes the statistics, reporting an empty histogram as all zeros.
    #[must_use]
    pub fn summarize(self) -> InsertSizeStats {
        match self.compute_statistics() {
            Ok(stats) => stats,
            Err(e) => {
                debug!("{e}; reporting zero insert size statistics");
                InsertSizeStats::default()
            }
        }
    }
}

impl FromIterator<u64> for InsertSizeHistogram {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for magnitude in iter {
            histogram.add(magnitude);
        }
        histogram
    }
}
