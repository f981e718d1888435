//! Utilities for generating test BAM data programmatically.

#![allow(dead_code)]

use std::path::Path;

use fgstats_lib::sam_builder::{HeaderBuilder, RecordBuilder, write_bam};
use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;

/// Length of every reference sequence in generated headers.
pub const REFERENCE_LENGTH: usize = 100_000;

/// Creates a header with two references (`chr1`, `chr2`) and the given read groups.
///
/// Each read group gets `SM`, `PL`, `PU` and `LB` values derived from its ID.
pub fn create_header(read_groups: &[&str]) -> Header {
    let mut builder = HeaderBuilder::new()
        .reference_sequence("chr1", REFERENCE_LENGTH)
        .reference_sequence("chr2", REFERENCE_LENGTH);
    for id in read_groups {
        let sample = format!("sample_{id}");
        let unit = format!("unit_{id}");
        let library = format!("lib_{id}");
        builder = builder.read_group(
            id,
            &[("SM", &sample), ("PL", "ILLUMINA"), ("PU", &unit), ("LB", &library)],
        );
    }
    builder.build()
}

/// Creates a properly paired, mapped read pair on `chr1`.
///
/// The first-of-pair record carries `+tlen`, the second `-tlen`. Both reads are `length`
/// bases long with an all-match CIGAR.
pub fn create_proper_pair(
    name: &str,
    read_group: &str,
    length: usize,
    tlen: i32,
) -> Vec<RecordBuf> {
    let cigar = format!("{length}M");
    [(true, tlen), (false, -tlen)]
        .into_iter()
        .map(|(is_first, template_length)| {
            RecordBuilder::mapped_read()
                .name(name)
                .cigar(&cigar)
                .first_segment(is_first)
                .properly_paired(true)
                .alignment_start(1_000)
                .mate_reference_sequence_id(0)
                .mate_alignment_start(1_200)
                .template_length(template_length)
                .read_group(read_group)
                .build()
        })
        .collect()
}

/// Creates a mapped pair whose mates sit on different references (`chr1` and `chr2`).
pub fn create_inter_chromosome_pair(name: &str, read_group: &str, length: usize) -> Vec<RecordBuf> {
    let cigar = format!("{length}M");
    [(true, 0, 1), (false, 1, 0)]
        .into_iter()
        .map(|(is_first, reference, mate_reference)| {
            RecordBuilder::mapped_read()
                .name(name)
                .cigar(&cigar)
                .first_segment(is_first)
                .reference_sequence_id(reference)
                .mate_reference_sequence_id(mate_reference)
                .mate_alignment_start(500)
                .read_group(read_group)
                .build()
        })
        .collect()
}

/// Creates an unmapped pair.
pub fn create_unmapped_pair(name: &str, read_group: &str, sequence: &str) -> Vec<RecordBuf> {
    [true, false]
        .into_iter()
        .map(|is_first| {
            RecordBuilder::unmapped_read()
                .name(name)
                .sequence(sequence)
                .first_segment(is_first)
                .mate_unmapped(true)
                .read_group(read_group)
                .build()
        })
        .collect()
}

/// Writes `records` to `path` as a BAM with `header`.
///
/// # Panics
///
/// Panics if the BAM cannot be written.
pub fn create_test_bam(path: &Path, header: &Header, records: &[RecordBuf]) {
    write_bam(path, header, records).expect("Failed to write test BAM");
}
