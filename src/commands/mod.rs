//! CLI command implementations for fgstats.
//!
//! - [`bam_stats`] - Per read group alignment statistics written as a `.bas` table

// Blanket clippy pedantic allows for command implementations.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod bam_stats;
pub mod command;
pub mod common;
