//! Integration tests for the bam-stats command.

use std::fs;
use std::path::Path;
use std::process::Command;

use fgstats_lib::sam_builder::RecordBuilder;
use tempfile::TempDir;

use crate::helpers::{
    assert_close, create_header, create_inter_chromosome_pair, create_proper_pair,
    create_test_bam, create_unmapped_pair, read_bas_checked, row_for,
};

fn run_bam_stats(input: &Path, output: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fgstats"))
        .args(["bam-stats", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .args(extra)
        .output()
        .expect("Failed to run bam-stats command")
}

/// Two read groups with pairs, unmapped reads and duplicates.
#[test]
fn test_bam_stats_multiple_read_groups() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("sample.bam");
    let output_bas = temp_dir.path().join("sample.bas");

    let header = create_header(&["rgA", "rgB", "rgC"]);
    let mut records = Vec::new();
    records.extend(create_proper_pair("a1", "rgA", 50, 100));
    records.extend(create_proper_pair("a2", "rgA", 50, 200));
    records.extend(create_inter_chromosome_pair("a3", "rgA", 50));
    records.extend(create_unmapped_pair("a4", "rgA", "GGCCAATT"));
    records.extend(create_proper_pair("b1", "rgB", 75, 300));
    records.push(
        RecordBuilder::mapped_read()
            .name("b2")
            .cigar("75M")
            .duplicate(true)
            .read_group("rgB")
            .build(),
    );
    create_test_bam(&input_bam, &header, &records);

    let output = run_bam_stats(&input_bam, &output_bas, &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "bam-stats failed: {stderr}");

    let rows = read_bas_checked(&output_bas);
    let groups: Vec<&str> = rows.iter().map(|row| row.readgroup.as_str()).collect();
    assert_eq!(groups, vec!["rgA", "rgB"], "rgC has no records and must be omitted");

    let a = row_for(&rows, "rgA");
    assert_eq!(a.bam_filename, "sample.bam");
    assert_eq!(a.sample, "sample_rgA");
    assert_eq!(a.platform, "ILLUMINA");
    assert_eq!(a.platform_unit, "unit_rgA");
    assert_eq!(a.library, "lib_rgA");
    assert_eq!((a.read_length_r1, a.read_length_r2), (50, 50));
    assert_eq!((a.total_reads, a.total_reads_r1, a.total_reads_r2), (8, 4, 4));
    assert_eq!((a.mapped_reads, a.mapped_reads_r1, a.mapped_reads_r2), (6, 3, 3));
    assert_eq!((a.mapped_bases, a.mapped_bases_r1, a.mapped_bases_r2), (300, 150, 150));
    assert_eq!(a.divergent_bases, 0);
    assert_eq!(a.mapped_reads_properly_paired, 2);
    assert_eq!(a.mapped_pairs, 3);
    assert_eq!(a.inter_chr_pairs, 1);
    // Generated 50bp reads cycle ACGT (25 G/C each); the unmapped reads add 4 each.
    assert_eq!((a.gc_bases_r1, a.gc_bases_r2), (79, 79));
    assert_close(a.mean_insert_size, 150.0);
    assert_close(a.insert_size_sd, 50.0);
    assert_close(a.median_insert_size, 150.0);

    let b = row_for(&rows, "rgB");
    assert_eq!(b.total_reads, 3);
    assert_eq!(b.duplicate_reads, 1);
    assert_eq!(b.read_length_r1, 75);
    assert_eq!(b.mapped_reads_properly_paired, 1);
    assert_close(b.mean_insert_size, 300.0);
    assert_close(b.insert_size_sd, 0.0);
}

/// Float columns are written with exactly three decimal places.
#[test]
fn test_bam_stats_float_formatting() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bas = temp_dir.path().join("output.bas");

    let header = create_header(&["rg1"]);
    let mut records = create_proper_pair("q1", "rg1", 20, 100);
    records.extend(create_proper_pair("q2", "rg1", 20, 101));
    records.extend(create_proper_pair("q3", "rg1", 20, 103));
    create_test_bam(&input_bam, &header, &records);

    let output = run_bam_stats(&input_bam, &output_bas, &[]);
    assert!(output.status.success());

    let text = fs::read_to_string(&output_bas).unwrap();
    let fields: Vec<&str> = text.lines().nth(1).unwrap().split('\t').collect();
    assert_eq!(&fields[23..26], &["101.333", "1.247", "101.000"]);
}

/// A header-only BAM produces a header-only `.bas`.
#[test]
fn test_bam_stats_no_records() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("empty.bam");
    let output_bas = temp_dir.path().join("empty.bas");

    create_test_bam(&input_bam, &create_header(&["rg1", "rg2"]), &[]);

    let output = run_bam_stats(&input_bam, &output_bas, &[]);
    assert!(output.status.success());

    let rows = read_bas_checked(&output_bas);
    assert!(rows.is_empty());
    assert_eq!(fs::read_to_string(&output_bas).unwrap().lines().count(), 1);
}

/// Secondary alignments are counted only with `--rna`.
#[test]
fn test_bam_stats_rna_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let dna_bas = temp_dir.path().join("dna.bas");
    let rna_bas = temp_dir.path().join("rna.bas");

    let header = create_header(&["rg1"]);
    let mut records = create_proper_pair("q1", "rg1", 30, 250);
    records.push(
        RecordBuilder::mapped_read()
            .name("q1")
            .cigar("10M500N20M")
            .first_segment(true)
            .secondary(true)
            .read_group("rg1")
            .build(),
    );
    records.push(
        RecordBuilder::mapped_read()
            .name("q1")
            .cigar("30M")
            .first_segment(false)
            .supplementary(true)
            .read_group("rg1")
            .build(),
    );
    create_test_bam(&input_bam, &header, &records);

    assert!(run_bam_stats(&input_bam, &dna_bas, &[]).status.success());
    assert!(run_bam_stats(&input_bam, &rna_bas, &["--rna"]).status.success());

    let dna = read_bas_checked(&dna_bas);
    let rna = read_bas_checked(&rna_bas);
    assert_eq!(dna[0].total_reads, 2);
    assert_eq!(rna[0].total_reads, 3);
    assert_eq!(rna[0].total_reads_r1, 2);
    assert_eq!(rna[0].mapped_bases, 90);
}

/// Multi-threaded decompression gives the same table as single-threaded.
#[test]
fn test_bam_stats_threads_match_single_threaded() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let single_bas = temp_dir.path().join("single.bas");
    let multi_bas = temp_dir.path().join("multi.bas");

    let header = create_header(&["rg1", "rg2"]);
    let records: Vec<_> = (0..500)
        .flat_map(|i| {
            let rg = if i % 3 == 0 { "rg2" } else { "rg1" };
            create_proper_pair(&format!("q{i}"), rg, 100, 200 + i)
        })
        .collect();
    create_test_bam(&input_bam, &header, &records);

    assert!(run_bam_stats(&input_bam, &single_bas, &[]).status.success());
    assert!(run_bam_stats(&input_bam, &multi_bas, &["--threads", "4"]).status.success());

    assert_eq!(fs::read_to_string(&single_bas).unwrap(), fs::read_to_string(&multi_bas).unwrap());
}

/// `-o -` writes the table to standard output.
#[test]
fn test_bam_stats_stdout_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input_bam = temp_dir.path().join("input.bam");
    let output_bas = temp_dir.path().join("output.bas");

    let header = create_header(&["rg1"]);
    create_test_bam(&input_bam, &header, &create_proper_pair("q1", "rg1", 40, 180));

    let to_file = run_bam_stats(&input_bam, &output_bas, &[]);
    assert!(to_file.status.success());
    let to_stdout = run_bam_stats(&input_bam, Path::new("-"), &[]);
    assert!(to_stdout.status.success());

    let expected = fs::read_to_string(&output_bas).unwrap();
    assert_eq!(String::from_utf8(to_stdout.stdout).unwrap(), expected);
}
