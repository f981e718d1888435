//! Per-record classification into the read group statistics table.
//!
//! [`RecordClassifier::classify`] applies the inclusion rules to one alignment record and updates
//! the [`StatsRow`](crate::stats::StatsRow) for the record's read group and mate end. Only the
//! record's own flags and tags are consulted, so records may arrive in any order and mates need
//! not be adjacent.

use bstr::ByteSlice;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::alignment::record_buf::data::field::Value;

use crate::errors::{Result, StatsError};
use crate::read_group::{MISSING_VALUE, ReadGroupTable};
use crate::stats::{MateEnd, StatsTable};

/// Options controlling which records are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Retain secondary alignments, as is usual for spliced RNA alignments
    pub rna_mode: bool,
}

/// How a record was counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Secondary, supplementary or QC-failed; no counters were touched
    Excluded,
    /// Counted as a read but not as mapped
    Unmapped,
    /// Counted as a mapped read
    Mapped,
}

/// Sum of the query bases aligned to the reference: `M`, `I`, `=` and `X` operations.
///
/// ```
/// use fgstats_lib::classify::mapped_base_count_from_cigar;
/// use fgstats_lib::sam_builder::parse_cigar;
///
/// assert_eq!(mapped_base_count_from_cigar(&parse_cigar("5S10M2I3D5=1X5S")), 18);
/// ```
#[must_use]
pub fn mapped_base_count_from_cigar(ops: &[Op]) -> u64 {
    ops.iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match | Kind::Insertion | Kind::SequenceMatch | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len() as u64)
        .sum()
}

/// Reference bases covered by the alignment: `M`, `D`, `N`, `=` and `X` operations.
#[must_use]
pub fn reference_span(ops: &[Op]) -> u64 {
    ops.iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match
                    | Kind::Deletion
                    | Kind::Skip
                    | Kind::SequenceMatch
                    | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len() as u64)
        .sum()
}

/// Mapped bases credited to a read with no edits.
///
/// This is the distance from the 0-based start to the exclusive alignment end, plus one. An
/// alignment that consumes no reference bases is treated as spanning one base.
#[must_use]
pub fn edit_free_mapped_base_count(ops: &[Op]) -> u64 {
    reference_span(ops).max(1) + 1
}

/// Number of `G` and `C` bases, in either case.
#[must_use]
pub fn gc_base_count(bases: &[u8]) -> u64 {
    bases.iter().filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C')).count() as u64
}

/// Counts alignment records into a [`StatsTable`].
#[derive(Debug, Clone, Default)]
pub struct RecordClassifier {
    options: ClassifierOptions,
}

impl RecordClassifier {
    #[must_use]
    pub fn new(options: ClassifierOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// True if the record is skipped without touching any counter.
    #[must_use]
    pub fn is_excluded(&self, record: &RecordBuf) -> bool {
        let flags = record.flags();
        (flags.is_secondary() && !self.options.rna_mode)
            || flags.is_qc_fail()
            || flags.is_supplementary()
    }

    /// Classifies one record and updates the row for its read group and mate end.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::UnknownReadGroup`] if the record's `RG` tag (or `.` when the tag is
    /// absent) names no group in `read_groups`.
    pub fn classify(
        &self,
        record: &RecordBuf,
        read_groups: &ReadGroupTable,
        stats: &mut StatsTable,
    ) -> Result<Classification> {
        if self.is_excluded(record) {
            return Ok(Classification::Excluded);
        }

        let flags = record.flags();
        let end = if flags.is_first_segment() { MateEnd::First } else { MateEnd::Second };
        let group = resolve_read_group(record, read_groups)?;
        let row = stats.row_mut(group, end).ok_or_else(|| unknown_read_group(record, group))?;

        let bases = record.sequence().as_ref();
        if row.read_length == 0 {
            row.read_length = bases.len() as u64;
        }
        row.total_count += 1;
        if flags.is_duplicate() {
            row.duplicate_count += 1;
        }
        row.gc_base_count += gc_base_count(bases);

        if flags.is_unmapped() {
            row.unmapped_count += 1;
            return Ok(Classification::Unmapped);
        }

        let ops = record.cigar().as_ref();
        match edit_distance(record) {
            Some(nm) if nm > 0 => {
                row.divergent_base_count += nm;
                row.mapped_base_count += mapped_base_count_from_cigar(ops);
            }
            Some(_) => row.mapped_base_count += edit_free_mapped_base_count(ops),
            None => row.mapped_base_count += mapped_base_count_from_cigar(ops),
        }

        if end == MateEnd::First && !flags.is_mate_unmapped() {
            row.mapped_pair_count += 1;
            if flags.is_properly_segmented() {
                row.proper_pair_count += 1;
                row.insert_sizes.add(u64::from(record.template_length().unsigned_abs()));
            } else if record.reference_sequence_id() != record.mate_reference_sequence_id() {
                row.inter_chromosome_pair_count += 1;
            }
        }

        Ok(Classification::Mapped)
    }
}

/// Non-negative `NM` value; negative or non-integer values are treated as absent.
fn edit_distance(record: &RecordBuf) -> Option<u64> {
    record
        .data()
        .get(&Tag::EDIT_DISTANCE)
        .and_then(Value::as_int)
        .and_then(|nm| u64::try_from(nm).ok())
}

fn resolve_read_group(record: &RecordBuf, read_groups: &ReadGroupTable) -> Result<usize> {
    let id = match record.data().get(&Tag::READ_GROUP) {
        None => MISSING_VALUE.to_string(),
        Some(Value::String(s)) if s.is_empty() => MISSING_VALUE.to_string(),
        Some(Value::String(s)) => s.to_str_lossy().into_owned(),
        Some(other) => format!("{other:?}"),
    };
    read_groups.index_of(&id).ok_or_else(|| StatsError::UnknownReadGroup {
        read_group: id,
        record: record_name(record),
    })
}

fn unknown_read_group(record: &RecordBuf, group: usize) -> StatsError {
    StatsError::UnknownReadGroup { read_group: format!("#{group}"), record: record_name(record) }
}

fn record_name(record: &RecordBuf) -> String {
    record.name().map_or_else(|| "*".to_string(), |name| name.to_str_lossy().into_owned())
}
