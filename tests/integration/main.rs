//! Integration tests for the fgstats library and binary.
//!
//! These tests write BAM files programmatically and check the `.bas` output end to end.

mod helpers;
mod test_bam_stats_command;
mod test_error_paths;
mod test_streaming_input;
