//! Common CLI options shared across commands.
//!
//! Argument groups here are composed into command structs with `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use fgstats_lib::validation::{validate_file_exists, validate_positive};

/// Input BAM and output report options.
#[derive(Debug, Clone, Args)]
pub struct BamIoOptions {
    /// Input BAM file (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output `.bas` file (`-` for stdout)
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl BamIoOptions {
    /// Validates that the input file exists (skipped for stdin paths).
    ///
    /// # Errors
    ///
    /// Returns an error if the input file does not exist or is a directory.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;
        Ok(())
    }
}

/// Threading options for BGZF decompression.
#[derive(Debug, Clone, Default, Args)]
pub struct ThreadingOptions {
    /// Number of BGZF decompression threads. Omit or pass 1 for single-threaded decoding.
    #[arg(long = "threads")]
    pub threads: Option<usize>,
}

impl ThreadingOptions {
    /// Worker count handed to the BAM reader.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.threads.unwrap_or(1)
    }

    /// Validates that an explicit thread count is at least one.
    ///
    /// # Errors
    ///
    /// Returns an error if `--threads 0` was given.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(threads) = self.threads {
            validate_positive(threads, "threads")?;
        }
        Ok(())
    }
}
