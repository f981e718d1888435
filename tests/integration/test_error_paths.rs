//! Error path integration tests.
//!
//! These tests verify that bad input aborts the run with a clear message and no output.

use std::fs;
use std::process::Command;

use fgstats_lib::bam_io::create_bam_reader;
use fgstats_lib::errors::StatsError;
use fgstats_lib::read_group::ReadGroupTable;
use fgstats_lib::sam_builder::RecordBuilder;
use tempfile::TempDir;

use crate::helpers::{create_header, create_proper_pair, create_test_bam};

#[test]
fn test_unknown_read_group_aborts_without_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bas = temp_dir.path().join("output.bas");

    let mut records = create_proper_pair("q1", "rg1", 30, 200);
    records.push(RecordBuilder::mapped_read().name("stray").cigar("30M").read_group("rgX").build());
    records.extend(create_proper_pair("q2", "rg1", 30, 200));
    create_test_bam(&input_bam, &create_header(&["rg1"]), &records);

    let output = Command::new(env!("CARGO_BIN_EXE_fgstats"))
        .args(["bam-stats", "-i", input_bam.to_str().unwrap(), "-o", output_bas.to_str().unwrap()])
        .output()
        .expect("Failed to run bam-stats command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rgX"), "stderr should name the read group: {stderr}");
    assert!(stderr.contains("stray"), "stderr should name the record: {stderr}");
    assert!(!output_bas.exists(), "no output should be written on failure");
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output_bas = temp_dir.path().join("output.bas");

    let output = Command::new(env!("CARGO_BIN_EXE_fgstats"))
        .args(["bam-stats", "-i", "/no/such/input.bam", "-o", output_bas.to_str().unwrap()])
        .output()
        .expect("Failed to run bam-stats command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("File does not exist"));
}

#[test]
fn test_invalid_option_values() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bas = temp_dir.path().join("output.bas");
    create_test_bam(&input_bam, &create_header(&["rg1"]), &[]);

    for extra in [["--threads", "0"], ["--progress-interval", "0"]] {
        let output = Command::new(env!("CARGO_BIN_EXE_fgstats"))
            .args(["bam-stats", "-i", input_bam.to_str().unwrap()])
            .args(["-o", output_bas.to_str().unwrap()])
            .args(extra)
            .output()
            .expect("Failed to run bam-stats command");
        assert!(!output.status.success(), "{extra:?} should be rejected");
        assert!(String::from_utf8_lossy(&output.stderr).contains("Must be >= 1"));
    }
}

#[test]
fn test_input_is_not_bam() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("not_a.bam");
    fs::write(&input, "@HD\tVN:1.6\nthis is plain text\n").unwrap();

    assert!(create_bam_reader(&input, 1).is_err());
}

#[test]
fn test_duplicate_read_group_ids() {
    let err = ReadGroupTable::from_header_text("@RG\tID:rg1\tSM:a\n@RG\tID:rg1\tSM:b\n")
        .unwrap_err();
    assert!(matches!(err, StatsError::MalformedHeader { .. }));
}

#[test]
fn test_read_group_without_id() {
    let err = ReadGroupTable::from_header_text("@RG\tSM:a\tPL:ILLUMINA\n").unwrap_err();
    assert!(err.to_string().contains("Malformed @RG header line"));
}
