//! Per read group, per mate end accumulators.
//!
//! [`StatsTable`] holds two [`StatsRow`]s (first and second mate end) for every group in a
//! [`ReadGroupTable`](crate::read_group::ReadGroupTable), addressed by the group's index.

use crate::insert_size::InsertSizeHistogram;

/// Which end of a template a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MateEnd {
    /// Records flagged as the first segment
    First,
    /// Every other record, including single-end reads
    Second,
}

impl MateEnd {
    /// Position of this end within a group's pair of rows.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            MateEnd::First => 0,
            MateEnd::Second => 1,
        }
    }
}

/// Counters accumulated for one read group and one mate end.
#[derive(Debug, Clone, Default)]
pub struct StatsRow {
    /// Sequence length of the first record seen for this row; 0 until then
    pub read_length: u64,
    pub total_count: u64,
    pub duplicate_count: u64,
    pub gc_base_count: u64,
    pub unmapped_count: u64,
    pub divergent_base_count: u64,
    pub mapped_base_count: u64,
    pub proper_pair_count: u64,
    pub mapped_pair_count: u64,
    pub inter_chromosome_pair_count: u64,
    /// Absolute template lengths of proper pairs, recorded on the first end only
    pub insert_sizes: InsertSizeHistogram,
}

impl StatsRow {
    /// Records that are not unmapped.
    #[must_use]
    pub fn mapped_count(&self) -> u64 {
        self.total_count - self.unmapped_count
    }
}

/// Accumulators for every read group, two rows per group.
#[derive(Debug, Clone)]
pub struct StatsTable {
    rows: Vec<[StatsRow; 2]>,
}

impl StatsTable {
    /// Creates zeroed rows for `num_groups` read groups.
    #[must_use]
    pub fn new(num_groups: usize) -> Self {
        Self { rows: (0..num_groups).map(|_| Default::default()).collect() }
    }

    /// Number of read groups tracked.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.rows.len()
    }

    /// Both rows for a group; `None` if the index is out of range.
    #[must_use]
    pub fn group(&self, group: usize) -> Option<&[StatsRow; 2]> {
        self.rows.get(group)
    }

    /// The row for a group and end.
    #[must_use]
    pub fn row(&self, group: usize, end: MateEnd) -> Option<&StatsRow> {
        self.rows.get(group).map(|rows| &rows[end.index()])
    }

    /// The mutable row for a group and end.
    pub fn row_mut(&mut self, group: usize, end: MateEnd) -> Option<&mut StatsRow> {
        self.rows.get_mut(group).map(|rows| &mut rows[end.index()])
    }

    /// Records counted for one group across both ends; `None` if the index is out of range.
    #[must_use]
    pub fn group_total_records(&self, group: usize) -> Option<u64> {
        self.rows.get(group).map(|[r1, r2]| r1.total_count + r2.total_count)
    }

    /// Records accumulated across every group and end.
    #[must_use]
    pub fn total_records(&self) -> u64 {
        self.rows.iter().flatten().map(|row| row.total_count).sum()
    }

    /// Iterates groups in index order.
    pub fn iter(&self) -> impl Iterator<Item = &[StatsRow; 2]> {
        self.rows.iter()
    }

    /// Consumes the table, yielding each group's rows in index order.
    #[must_use]
    pub fn into_groups(self) -> Vec<[StatsRow; 2]> {
        self.rows
    }
}
