//! Integration tests for streaming input support (stdin/pipes).

use std::fs::{self, File};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use crate::helpers::{create_header, create_proper_pair, create_test_bam, create_unmapped_pair};

/// Reading the BAM from stdin gives the same table as reading it from a file.
#[test]
fn test_bam_stats_with_piped_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_from_file = temp_dir.path().join("from_file.bas");
    let output_from_pipe = temp_dir.path().join("from_pipe.bas");

    let mut records = create_proper_pair("q1", "rg1", 60, 310);
    records.extend(create_proper_pair("q2", "rg2", 60, 290));
    records.extend(create_unmapped_pair("q3", "rg2", "NNNNGGGG"));
    create_test_bam(&input_bam, &create_header(&["rg1", "rg2"]), &records);

    let status = Command::new(env!("CARGO_BIN_EXE_fgstats"))
        .args([
            "bam-stats",
            "--input",
            input_bam.to_str().unwrap(),
            "--output",
            output_from_file.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to run bam-stats command");
    assert!(status.success(), "bam-stats with file input failed");

    let status = Command::new(env!("CARGO_BIN_EXE_fgstats"))
        .args(["bam-stats", "--input", "-", "--output", output_from_pipe.to_str().unwrap()])
        .stdin(Stdio::from(File::open(&input_bam).unwrap()))
        .status()
        .expect("Failed to run bam-stats command");
    assert!(status.success(), "bam-stats with piped input failed");

    let from_file = fs::read_to_string(&output_from_file).unwrap();
    let from_pipe = fs::read_to_string(&output_from_pipe).unwrap();
    // Only the bam_filename column differs: the base name of the input path.
    let strip = |text: &str| -> Vec<String> {
        text.lines().skip(1).map(|line| line.split_once('\t').unwrap().1.to_string()).collect()
    };
    assert_eq!(strip(&from_file), strip(&from_pipe));
    assert_eq!(from_pipe.lines().nth(1).unwrap().split('\t').next(), Some("-"));
}
