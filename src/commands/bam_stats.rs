//! Per read group alignment statistics.
//!
//! Streams a BAM once, tallies counts per read group and mate end, and writes one `.bas` row
//! per read group that had at least one counted record.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use fgstats_lib::bam_io::create_bam_reader;
use fgstats_lib::classify::ClassifierOptions;
use fgstats_lib::collector::collect_bam_stats;
use fgstats_lib::logging::{OperationTimer, log_bas_summary, log_collection_summary};
use fgstats_lib::metrics::bas::{bam_filename, write_bas};
use fgstats_lib::progress::{DEFAULT_PROGRESS_INTERVAL, ProgressTracker};
use fgstats_lib::validation::validate_positive;

use crate::commands::command::Command;
use crate::commands::common::{BamIoOptions, ThreadingOptions};

/// Collects per read group statistics from a BAM file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bam-stats",
    author,
    version,
    about = "\x1b[38;5;30m[QC]\x1b[0m \x1b[36mCollect per read group statistics into a .bas file\x1b[0m",
    long_about = r#"
Collects alignment statistics for every read group declared in the BAM header and writes them
as a tab-separated `.bas` table.

Secondary, supplementary and QC-failed records are skipped. With `--rna`, secondary
alignments are kept so that spliced reads reported as several alignments are all counted.

Records without an `RG` tag are attributed to a single synthetic read group when the header
declares none. A record whose `RG` value is not declared in the header is an error.

The output has one header line followed by one line per read group with at least one counted
record, in header order. Columns:

  bam_filename, sample, platform, platform_unit, library, readgroup,
  read_length_r1, read_length_r2,
  #_mapped_bases, #_mapped_bases_r1, #_mapped_bases_r2,
  #_divergent_bases, #_divergent_bases_r1, #_divergent_bases_r2,
  #_total_reads, #_total_reads_r1, #_total_reads_r2,
  #_mapped_reads, #_mapped_reads_r1, #_mapped_reads_r2,
  #_mapped_reads_properly_paired, #_gc_bases_r1, #_gc_bases_r2,
  mean_insert_size, insert_size_sd, median_insert_size,
  #_duplicate_reads, #_mapped_pairs, #_inter_chr_pairs

Insert size statistics come from properly paired first-of-pair reads. Use `-o -` to write the
table to standard output.
"#
)]
pub struct BamStats {
    /// Input and output options.
    #[command(flatten)]
    pub io: BamIoOptions,

    /// Keep secondary alignments (RNA mode).
    #[arg(long = "rna", default_value = "false")]
    pub rna: bool,

    /// Threading options.
    #[command(flatten)]
    pub threading: ThreadingOptions,

    /// Log progress every this many records.
    #[arg(long = "progress-interval", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,
}

impl Command for BamStats {
    fn execute(&self, _command_line: &str) -> Result<()> {
        self.validate()?;

        info!("Starting BamStats");
        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        info!("RNA mode: {}", if self.rna { "enabled" } else { "disabled" });
        info!("Threads: {}", self.threading.num_threads());

        let timer = OperationTimer::new("Collecting read group statistics");

        let (mut reader, header) =
            create_bam_reader(&self.io.input, self.threading.num_threads())?;
        let progress =
            ProgressTracker::new("Processed records").with_interval(self.progress_interval);
        let options = ClassifierOptions { rna_mode: self.rna };

        let filename = bam_filename(&self.io.input);
        let (summary, rows) =
            collect_bam_stats(&mut reader, &header, options, &filename, &progress).with_context(
                || format!("Failed to collect statistics from {}", self.io.input.display()),
            )?;

        write_bas(&self.io.output, &rows)?;
        info!("Wrote {} read group row(s) to: {}", rows.len(), self.io.output.display());

        log_collection_summary(&summary);
        log_bas_summary(&rows);
        timer.log_completion(summary.records_read);
        Ok(())
    }
}

impl BamStats {
    fn validate(&self) -> Result<()> {
        self.io.validate()?;
        self.threading.validate()?;
        validate_positive(self.progress_interval, "progress-interval")?;
        Ok(())
    }
}
