//! The `.bas` table: one row of alignment statistics per read group.
//!
//! Rows are built from a finished [`StatsTable`] in read group declaration order. Groups that
//! received no records are omitted. Groups in which every record was unmapped report only read
//! lengths, read totals and GC counts; all mapping dependent columns are zero.

use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{Metric, serialize_float};
use crate::bam_io::create_text_writer;
use crate::insert_size::InsertSizeStats;
use crate::read_group::{ReadGroupInfo, ReadGroupTable};
use crate::stats::{StatsRow, StatsTable};

/// Column names of the `.bas` table, in output order.
pub const BAS_HEADER: [&str; 29] = [
    "bam_filename",
    "sample",
    "platform",
    "platform_unit",
    "library",
    "readgroup",
    "read_length_r1",
    "read_length_r2",
    "#_mapped_bases",
    "#_mapped_bases_r1",
    "#_mapped_bases_r2",
    "#_divergent_bases",
    "#_divergent_bases_r1",
    "#_divergent_bases_r2",
    "#_total_reads",
    "#_total_reads_r1",
    "#_total_reads_r2",
    "#_mapped_reads",
    "#_mapped_reads_r1",
    "#_mapped_reads_r2",
    "#_mapped_reads_properly_paired",
    "#_gc_bases_r1",
    "#_gc_bases_r2",
    "mean_insert_size",
    "insert_size_sd",
    "median_insert_size",
    "#_duplicate_reads",
    "#_mapped_pairs",
    "#_inter_chr_pairs",
];

/// Alignment statistics for one read group.
///
/// `_r1` columns describe first-of-pair records, `_r2` columns every other record. Pair counts
/// and insert size statistics come from first-of-pair records only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasMetric {
    /// File name (without directories) of the input BAM
    pub bam_filename: String,
    pub sample: String,
    pub platform: String,
    pub platform_unit: String,
    pub library: String,
    /// Read group identifier
    pub readgroup: String,
    pub read_length_r1: u64,
    pub read_length_r2: u64,
    #[serde(rename = "#_mapped_bases")]
    pub mapped_bases: u64,
    #[serde(rename = "#_mapped_bases_r1")]
    pub mapped_bases_r1: u64,
    #[serde(rename = "#_mapped_bases_r2")]
    pub mapped_bases_r2: u64,
    #[serde(rename = "#_divergent_bases")]
    pub divergent_bases: u64,
    #[serde(rename = "#_divergent_bases_r1")]
    pub divergent_bases_r1: u64,
    #[serde(rename = "#_divergent_bases_r2")]
    pub divergent_bases_r2: u64,
    #[serde(rename = "#_total_reads")]
    pub total_reads: u64,
    #[serde(rename = "#_total_reads_r1")]
    pub total_reads_r1: u64,
    #[serde(rename = "#_total_reads_r2")]
    pub total_reads_r2: u64,
    #[serde(rename = "#_mapped_reads")]
    pub mapped_reads: u64,
    #[serde(rename = "#_mapped_reads_r1")]
    pub mapped_reads_r1: u64,
    #[serde(rename = "#_mapped_reads_r2")]
    pub mapped_reads_r2: u64,
    #[serde(rename = "#_mapped_reads_properly_paired")]
    pub mapped_reads_properly_paired: u64,
    #[serde(rename = "#_gc_bases_r1")]
    pub gc_bases_r1: u64,
    #[serde(rename = "#_gc_bases_r2")]
    pub gc_bases_r2: u64,
    #[serde(serialize_with = "serialize_float")]
    pub mean_insert_size: f64,
    #[serde(serialize_with = "serialize_float")]
    pub insert_size_sd: f64,
    #[serde(serialize_with = "serialize_float")]
    pub median_insert_size: f64,
    #[serde(rename = "#_duplicate_reads")]
    pub duplicate_reads: u64,
    #[serde(rename = "#_mapped_pairs")]
    pub mapped_pairs: u64,
    #[serde(rename = "#_inter_chr_pairs")]
    pub inter_chr_pairs: u64,
}

impl Metric for BasMetric {
    fn metric_name() -> &'static str {
        "bas"
    }
}

impl BasMetric {
    /// Builds the row for one read group from its first- and second-end accumulators.
    #[must_use]
    pub fn from_group(info: &ReadGroupInfo, rows: [StatsRow; 2], bam_filename: &str) -> Self {
        let [r1, r2] = rows;
        let total_reads = r1.total_count + r2.total_count;
        let mapped_reads = total_reads - (r1.unmapped_count + r2.unmapped_count);

        let mut metric = Self {
            bam_filename: bam_filename.to_string(),
            sample: info.sample.clone(),
            platform: info.platform.clone(),
            platform_unit: info.platform_unit.clone(),
            library: info.library.clone(),
            readgroup: info.id.clone(),
            read_length_r1: r1.read_length,
            read_length_r2: r2.read_length,
            total_reads,
            total_reads_r1: r1.total_count,
            total_reads_r2: r2.total_count,
            mapped_reads,
            gc_bases_r1: r1.gc_base_count,
            gc_bases_r2: r2.gc_base_count,
            ..Self::default()
        };

        if mapped_reads == 0 {
            debug!("Read group {} has no mapped reads", info.id);
            return metric;
        }

        metric.mapped_reads_r1 = r1.mapped_count();
        metric.mapped_reads_r2 = r2.mapped_count();
        metric.mapped_bases_r1 = r1.mapped_base_count;
        metric.mapped_bases_r2 = r2.mapped_base_count;
        metric.mapped_bases = r1.mapped_base_count + r2.mapped_base_count;
        metric.divergent_bases_r1 = r1.divergent_base_count;
        metric.divergent_bases_r2 = r2.divergent_base_count;
        metric.divergent_bases = r1.divergent_base_count + r2.divergent_base_count;
        metric.mapped_reads_properly_paired = r1.proper_pair_count;
        metric.mapped_pairs = r1.mapped_pair_count;
        metric.inter_chr_pairs = r1.inter_chromosome_pair_count;
        metric.duplicate_reads = r1.duplicate_count + r2.duplicate_count;

        let InsertSizeStats { mean, sd, median } = r1.insert_sizes.summarize();
        metric.mean_insert_size = mean;
        metric.insert_size_sd = sd;
        metric.median_insert_size = median;
        metric
    }
}

/// Builds `.bas` rows for every read group that received at least one record.
#[must_use]
pub fn build_bas_metrics(
    read_groups: &ReadGroupTable,
    stats: StatsTable,
    bam_filename: &str,
) -> Vec<BasMetric> {
    let totals: Vec<u64> =
        (0..stats.num_groups()).filter_map(|group| stats.group_total_records(group)).collect();
    read_groups
        .iter()
        .zip(totals)
        .zip(stats.into_groups())
        .filter_map(|((info, total), rows)| {
            if total == 0 {
                debug!("Read group {} has no records; omitting from output", info.id);
                None
            } else {
                Some(BasMetric::from_group(info, rows, bam_filename))
            }
        })
        .collect()
}

/// File name component of `path`, as written to the `bam_filename` column.
#[must_use]
pub fn bam_filename(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Writes the header line and one tab-separated line per row.
///
/// The header is written even when `rows` is empty. `-` writes to standard output.
///
/// # Errors
/// Returns an error if the output cannot be created or written to
pub fn write_bas<P: AsRef<Path>>(path: P, rows: &[BasMetric]) -> Result<()> {
    let path_ref = path.as_ref();
    let output = create_text_writer(path_ref)?;
    let mut writer =
        csv::WriterBuilder::new().delimiter(b'\t').has_headers(false).from_writer(output);

    let context = || {
        format!("Failed to write {} metrics: {}", BasMetric::metric_name(), path_ref.display())
    };
    writer.write_record(BAS_HEADER).with_context(context)?;
    for row in rows {
        writer.serialize(row).with_context(context)?;
    }
    writer.flush().with_context(context)?;
    Ok(())
}

/// Reads a `.bas` file written by [`write_bas`].
///
/// # Errors
/// Returns an error if the file cannot be read or a row does not parse
pub fn read_bas<P: AsRef<Path>>(path: P) -> Result<Vec<BasMetric>> {
    let path_ref = path.as_ref();
    DelimFile::default().read_tsv(&path_ref).with_context(|| {
        format!("Failed to read {} metrics: {}", BasMetric::metric_name(), path_ref.display())
    })
}
