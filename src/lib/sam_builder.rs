//! Builders for SAM headers and alignment records used by tests and benchmarks.
//!
//! ```rust
//! use fgstats_lib::sam_builder::{HeaderBuilder, RecordBuilder};
//!
//! let header = HeaderBuilder::new()
//!     .reference_sequence("chr1", 10_000)
//!     .read_group("rg1", &[("SM", "sample1"), ("PL", "ILLUMINA")])
//!     .build();
//! assert_eq!(header.read_groups().len(), 1);
//!
//! let record = RecordBuilder::mapped_read()
//!     .name("read1")
//!     .sequence("ACGTACGT")
//!     .first_segment(true)
//!     .alignment_start(100)
//!     .read_group("rg1")
//!     .build();
//! assert_eq!(record.cigar().as_ref().len(), 1);
//! ```

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use noodles::core::Position;
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
use noodles::sam::alignment::record_buf::{QualityScores, RecordBuf, Sequence};

/// Base quality used when a builder generates qualities.
pub const DEFAULT_BASE_QUALITY: u8 = 30;

/// Parses a CIGAR string such as `5S10M2I3M` into operations.
///
/// # Panics
///
/// Panics if the string contains an unknown operation or an operation without a length.
#[must_use]
pub fn parse_cigar(cigar_str: &str) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut num_str = String::new();

    for c in cigar_str.chars() {
        if c.is_ascii_digit() {
            num_str.push(c);
            continue;
        }
        let len: usize = num_str.parse().expect("Invalid CIGAR: expected number");
        let kind = match c {
            'M' => Kind::Match,
            'I' => Kind::Insertion,
            'D' => Kind::Deletion,
            'N' => Kind::Skip,
            'S' => Kind::SoftClip,
            'H' => Kind::HardClip,
            'P' => Kind::Pad,
            '=' => Kind::SequenceMatch,
            'X' => Kind::SequenceMismatch,
            _ => panic!("Unknown CIGAR operation: {c}"),
        };
        ops.push(Op::new(kind, len));
        num_str.clear();
    }

    ops
}

/// Number of query bases a CIGAR string describes.
fn cigar_query_len(cigar: &str) -> usize {
    parse_cigar(cigar)
        .iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match
                    | Kind::Insertion
                    | Kind::SoftClip
                    | Kind::SequenceMatch
                    | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len())
        .sum()
}

/// Builds a SAM header from reference sequences and `@RG` lines.
///
/// The header is assembled as SAM text and parsed, so read groups keep their declaration order.
#[derive(Debug, Default)]
pub struct HeaderBuilder {
    reference_sequences: Vec<(String, usize)>,
    read_groups: Vec<String>,
}

impl HeaderBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an `@SQ` line.
    #[must_use]
    pub fn reference_sequence(mut self, name: &str, length: usize) -> Self {
        self.reference_sequences.push((name.to_string(), length));
        self
    }

    /// Adds an `@RG` line with the given `ID` and additional `(code, value)` fields.
    #[must_use]
    pub fn read_group(mut self, id: &str, fields: &[(&str, &str)]) -> Self {
        let mut line = format!("@RG\tID:{id}");
        for (code, value) in fields {
            line.push_str(&format!("\t{code}:{value}"));
        }
        self.read_groups.push(line);
        self
    }

    /// Renders the header as SAM text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::from("@HD\tVN:1.6\tSO:unsorted\n");
        for (name, length) in &self.reference_sequences {
            text.push_str(&format!("@SQ\tSN:{name}\tLN:{length}\n"));
        }
        for line in &self.read_groups {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    /// Parses the rendered text into a header.
    ///
    /// # Panics
    ///
    /// Panics if the accumulated lines do not form a valid SAM header.
    #[must_use]
    pub fn build(&self) -> Header {
        self.to_text().parse().expect("builder produced an invalid SAM header")
    }
}

/// Fluent builder for a single [`RecordBuf`].
#[derive(Debug)]
pub struct RecordBuilder {
    name: Option<Vec<u8>>,
    flags: Flags,
    reference_sequence_id: Option<usize>,
    alignment_start: Option<usize>,
    cigar: Option<String>,
    sequence: Vec<u8>,
    tags: Vec<(Tag, BufValue)>,
    mate_reference_sequence_id: Option<usize>,
    mate_alignment_start: Option<usize>,
    template_length: Option<i32>,
}

impl RecordBuilder {
    /// Creates a builder for an unplaced record with no flags set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            flags: Flags::empty(),
            reference_sequence_id: None,
            alignment_start: None,
            cigar: None,
            sequence: Vec::new(),
            tags: Vec::new(),
            mate_reference_sequence_id: None,
            mate_alignment_start: None,
            template_length: None,
        }
    }

    /// Creates a builder placed on reference 0 at position 1; the CIGAR defaults to `{len}M`.
    #[must_use]
    pub fn mapped_read() -> Self {
        Self { reference_sequence_id: Some(0), alignment_start: Some(1), ..Self::new() }
    }

    /// Creates a builder for an unmapped record.
    #[must_use]
    pub fn unmapped_read() -> Self {
        Self::new().unmapped(true)
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.as_bytes().to_vec());
        self
    }

    #[must_use]
    pub fn sequence(mut self, seq: &str) -> Self {
        self.sequence = seq.as_bytes().to_vec();
        self
    }

    /// Replaces all flags.
    #[must_use]
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the first segment flag, or the last segment flag when `is_first` is false.
    /// Either implies paired.
    #[must_use]
    pub fn first_segment(mut self, is_first: bool) -> Self {
        self.flags.set(Flags::SEGMENTED, true);
        self.flags.set(Flags::FIRST_SEGMENT, is_first);
        self.flags.set(Flags::LAST_SEGMENT, !is_first);
        self
    }

    /// Sets the properly paired flag. Implies paired.
    #[must_use]
    pub fn properly_paired(mut self, properly_paired: bool) -> Self {
        if properly_paired {
            self.flags.set(Flags::SEGMENTED, true);
        }
        self.flags.set(Flags::PROPERLY_SEGMENTED, properly_paired);
        self
    }

    #[must_use]
    pub fn unmapped(mut self, unmapped: bool) -> Self {
        self.flags.set(Flags::UNMAPPED, unmapped);
        self
    }

    #[must_use]
    pub fn mate_unmapped(mut self, unmapped: bool) -> Self {
        self.flags.set(Flags::MATE_UNMAPPED, unmapped);
        self
    }

    #[must_use]
    pub fn secondary(mut self, secondary: bool) -> Self {
        self.flags.set(Flags::SECONDARY, secondary);
        self
    }

    #[must_use]
    pub fn supplementary(mut self, supplementary: bool) -> Self {
        self.flags.set(Flags::SUPPLEMENTARY, supplementary);
        self
    }

    #[must_use]
    pub fn qc_fail(mut self, qc_fail: bool) -> Self {
        self.flags.set(Flags::QC_FAIL, qc_fail);
        self
    }

    #[must_use]
    pub fn duplicate(mut self, duplicate: bool) -> Self {
        self.flags.set(Flags::DUPLICATE, duplicate);
        self
    }

    /// Sets the reference sequence ID (0-based).
    #[must_use]
    pub fn reference_sequence_id(mut self, id: usize) -> Self {
        self.reference_sequence_id = Some(id);
        self
    }

    /// Sets the alignment start position (1-based).
    #[must_use]
    pub fn alignment_start(mut self, pos: usize) -> Self {
        self.alignment_start = Some(pos);
        self
    }

    #[must_use]
    pub fn cigar(mut self, cigar: &str) -> Self {
        self.cigar = Some(cigar.to_string());
        self
    }

    /// Sets the mate reference sequence ID (0-based).
    #[must_use]
    pub fn mate_reference_sequence_id(mut self, id: usize) -> Self {
        self.mate_reference_sequence_id = Some(id);
        self
    }

    /// Sets the mate alignment start position (1-based).
    #[must_use]
    pub fn mate_alignment_start(mut self, pos: usize) -> Self {
        self.mate_alignment_start = Some(pos);
        self
    }

    /// Sets the template length (insert size).
    #[must_use]
    pub fn template_length(mut self, tlen: i32) -> Self {
        self.template_length = Some(tlen);
        self
    }

    /// Adds an `RG` tag.
    #[must_use]
    pub fn read_group(self, id: &str) -> Self {
        self.tag("RG", id)
    }

    /// Adds an `NM` tag.
    #[must_use]
    pub fn edit_distance(self, nm: i32) -> Self {
        self.tag("NM", nm)
    }

    /// Adds an arbitrary two-character tag; other lengths are ignored.
    #[must_use]
    pub fn tag<V: Into<BufValue>>(mut self, tag: &str, value: V) -> Self {
        if let [a, b] = tag.as_bytes() {
            self.tags.push((Tag::from([*a, *b]), value.into()));
        }
        self
    }

    /// Builds the record.
    ///
    /// A missing sequence is generated from the CIGAR; a missing CIGAR on a placed record is
    /// generated as `{len}M`.
    ///
    /// # Panics
    ///
    /// Panics if a position is 0 or the CIGAR string is invalid.
    #[must_use]
    pub fn build(self) -> RecordBuf {
        let mut record = RecordBuf::default();

        if let Some(name) = self.name {
            *record.name_mut() = Some(name.into());
        }
        *record.flags_mut() = self.flags;

        *record.reference_sequence_id_mut() = self.reference_sequence_id;
        if let Some(pos) = self.alignment_start {
            *record.alignment_start_mut() =
                Some(Position::try_from(pos).expect("alignment_start must be >= 1"));
        }
        *record.mate_reference_sequence_id_mut() = self.mate_reference_sequence_id;
        if let Some(pos) = self.mate_alignment_start {
            *record.mate_alignment_start_mut() =
                Some(Position::try_from(pos).expect("mate_alignment_start must be >= 1"));
        }
        if let Some(tlen) = self.template_length {
            *record.template_length_mut() = tlen;
        }

        let placed = self.reference_sequence_id.is_some() && !self.flags.is_unmapped();
        let (cigar, sequence) = match (self.cigar, self.sequence.is_empty()) {
            (Some(cigar), true) => {
                let generated = b"ACGT".iter().copied().cycle().take(cigar_query_len(&cigar));
                let sequence = generated.collect();
                (Some(cigar), sequence)
            }
            (Some(cigar), false) => (Some(cigar), self.sequence),
            (None, false) if placed => (Some(format!("{}M", self.sequence.len())), self.sequence),
            (None, _) => (None, self.sequence),
        };

        if let Some(cigar) = cigar {
            *record.cigar_mut() = parse_cigar(&cigar).into_iter().collect();
        }
        let qualities = vec![DEFAULT_BASE_QUALITY; sequence.len()];
        *record.sequence_mut() = Sequence::from(sequence);
        *record.quality_scores_mut() = QualityScores::from(qualities);

        for (tag, value) in self.tags {
            record.data_mut().insert(tag, value);
        }

        record
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `records` to a BAM file at `path` with the given header.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_bam(path: &Path, header: &Header, records: &[RecordBuf]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create BAM: {}", path.display()))?;
    let mut writer = noodles::bam::io::Writer::new(file);
    writer.write_header(header)?;
    for record in records {
        writer.write_alignment_record(header, record)?;
    }
    writer.finish(header)?;
    Ok(())
}
