//! Single pass driver: records in, `.bas` rows out.
//!
//! The read group table is built from the header, every record is classified once in stream
//! order, and the finished [`StatsTable`] is turned into [`BasMetric`] rows. The first fatal
//! error stops the pass; no partial output is produced.

use std::io::{self, Read};

use anyhow::{Context, Result};
use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::classify::{Classification, ClassifierOptions, RecordClassifier};
use crate::metrics::bas::{BasMetric, build_bas_metrics};
use crate::progress::ProgressTracker;
use crate::read_group::ReadGroupTable;
use crate::stats::StatsTable;

/// Record counts from one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Records read from the input
    pub records_read: u64,
    /// Secondary, supplementary or QC-failed records that were skipped
    pub excluded: u64,
    /// Counted records flagged unmapped
    pub unmapped: u64,
    /// Counted records that were mapped
    pub mapped: u64,
}

impl CollectionSummary {
    /// Records that reached the statistics table.
    #[must_use]
    pub fn classified(&self) -> u64 {
        self.unmapped + self.mapped
    }

    fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Excluded => self.excluded += 1,
            Classification::Unmapped => self.unmapped += 1,
            Classification::Mapped => self.mapped += 1,
        }
    }
}

/// Classifies every record into a fresh [`StatsTable`] sized for `read_groups`.
///
/// # Errors
///
/// Returns an error if a record cannot be read or names an undeclared read group. The error
/// context carries the 1-based index of the offending record.
pub fn collect_stats<I>(
    records: I,
    read_groups: &ReadGroupTable,
    options: ClassifierOptions,
    progress: &ProgressTracker,
) -> Result<(CollectionSummary, StatsTable)>
where
    I: IntoIterator<Item = io::Result<RecordBuf>>,
{
    let classifier = RecordClassifier::new(options);
    let mut stats = StatsTable::new(read_groups.len());
    let mut summary = CollectionSummary::default();

    for result in records {
        let index = summary.records_read + 1;
        let record = result.with_context(|| format!("Failed to read record #{index}"))?;
        summary.records_read = index;

        let classification = classifier
            .classify(&record, read_groups, &mut stats)
            .with_context(|| format!("Failed to classify record #{index}"))?;
        summary.record(classification);
        progress.log_if_needed(1);
    }
    progress.log_final();

    Ok((summary, stats))
}

/// Reads every record from a BAM reader and builds one `.bas` row per populated read group.
///
/// # Errors
///
/// Returns an error if the header declares malformed read groups, a record cannot be decoded,
/// or a record names an undeclared read group.
pub fn collect_bam_stats<R: Read>(
    reader: &mut noodles::bam::io::Reader<R>,
    header: &Header,
    options: ClassifierOptions,
    bam_filename: &str,
    progress: &ProgressTracker,
) -> Result<(CollectionSummary, Vec<BasMetric>)> {
    let read_groups =
        ReadGroupTable::from_header(header).context("Failed to read @RG lines from header")?;
    log::debug!("Found {} read group(s) in header", read_groups.len());

    let records = reader.record_bufs(header);
    let (summary, stats) = collect_stats(records, &read_groups, options, progress)?;
    let rows = build_bas_metrics(&read_groups, stats, bam_filename);
    Ok((summary, rows))
}
