//! Read group metadata and the identifier to index lookup used during classification.
//!
//! Read groups are taken from the `@RG` lines of the SAM header in declaration order. Each
//! group receives a stable index (its position in the header) which addresses its row in the
//! [`StatsTable`](crate::stats::StatsTable) and fixes its position in the `.bas` output.
//!
//! A header without any `@RG` line yields a single synthetic group whose fields are all `.`,
//! which is also the value substituted for records that carry no `RG` tag.

use std::collections::HashMap;

use anyhow::Context;
use noodles::sam::Header;

use crate::errors::{Result, StatsError};

/// Value reported for read group fields that are absent from the header.
pub const MISSING_VALUE: &str = ".";

/// The `@RG` field codes read from the header.
pub const ID_TAG: &str = "ID";
pub const SAMPLE_TAG: &str = "SM";
pub const PLATFORM_TAG: &str = "PL";
pub const PLATFORM_UNIT_TAG: &str = "PU";
pub const LIBRARY_TAG: &str = "LB";

/// The fields of a single `@RG` header line, keyed by two-letter field code.
pub type TagRecord = HashMap<String, String>;

/// Metadata for one declared read group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadGroupInfo {
    /// Read group identifier (`ID`), unique within a table
    pub id: String,
    /// Sample name (`SM`)
    pub sample: String,
    /// Sequencing platform (`PL`)
    pub platform: String,
    /// Platform unit (`PU`)
    pub platform_unit: String,
    /// Library (`LB`)
    pub library: String,
}

impl ReadGroupInfo {
    /// The group used when the header declares no read groups at all.
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            id: MISSING_VALUE.to_string(),
            sample: MISSING_VALUE.to_string(),
            platform: MISSING_VALUE.to_string(),
            platform_unit: MISSING_VALUE.to_string(),
            library: MISSING_VALUE.to_string(),
        }
    }

    /// Builds the metadata from the fields of one `@RG` line.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::MalformedHeader`] if `ID` is absent or blank.
    pub fn from_tags(tags: &TagRecord) -> Result<Self> {
        let id = match tags.get(ID_TAG) {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => {
                return Err(StatsError::MalformedHeader {
                    reason: format!("read group is missing a non-empty {ID_TAG} field"),
                });
            }
        };

        Ok(Self {
            id,
            sample: field_or_missing(tags, SAMPLE_TAG),
            platform: field_or_missing(tags, PLATFORM_TAG),
            platform_unit: field_or_missing(tags, PLATFORM_UNIT_TAG),
            library: field_or_missing(tags, LIBRARY_TAG),
        })
    }
}

fn field_or_missing(tags: &TagRecord, code: &str) -> String {
    match tags.get(code) {
        Some(value) if !value.trim().is_empty() => value.clone(),
        _ => MISSING_VALUE.to_string(),
    }
}

/// Parses one header line into its `@RG` fields.
///
/// Returns `None` for lines that are not `@RG` lines. Fields are tab separated `XX:value`
/// pairs; a field without a `:` or whose code is not two characters long is skipped. When a
/// code repeats, the later value wins.
///
/// # Example
///
/// ```
/// use fgstats_lib::read_group::parse_read_group_line;
///
/// let tags = parse_read_group_line("@RG\tID:29976\tSM:PD1234a\tPL:GAII").unwrap();
/// assert_eq!(tags["ID"], "29976");
/// assert_eq!(tags["PL"], "GAII");
/// assert!(parse_read_group_line("@SQ\tSN:1\tLN:100").is_none());
/// ```
#[must_use]
pub fn parse_read_group_line(line: &str) -> Option<TagRecord> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
    if fields.next() != Some("@RG") {
        return None;
    }

    let mut tags = TagRecord::new();
    for field in fields {
        if let Some((code, value)) = field.split_once(':') {
            if code.len() == 2 {
                tags.insert(code.to_string(), value.to_string());
            }
        }
    }
    Some(tags)
}

/// Collects the fields of every `@RG` line in SAM header text, in order.
#[must_use]
pub fn read_group_tags_from_text(text: &str) -> Vec<TagRecord> {
    text.lines().filter_map(parse_read_group_line).collect()
}

/// Ordered read group metadata with an identifier to index lookup.
#[derive(Debug, Clone)]
pub struct ReadGroupTable {
    groups: Vec<ReadGroupInfo>,
    index: HashMap<String, usize>,
}

impl ReadGroupTable {
    /// Builds a table from `@RG` field records, preserving their order.
    ///
    /// An empty input yields a table holding only the synthetic `.` group.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::MalformedHeader`] if any record lacks an `ID`, or if two records
    /// share the same `ID`.
    pub fn build(header_tags: &[TagRecord]) -> Result<Self> {
        if header_tags.is_empty() {
            return Ok(Self::from_groups(vec![ReadGroupInfo::synthetic()]));
        }

        let mut groups = Vec::with_capacity(header_tags.len());
        let mut index = HashMap::with_capacity(header_tags.len());
        for tags in header_tags {
            let info = ReadGroupInfo::from_tags(tags)?;
            if index.insert(info.id.clone(), groups.len()).is_some() {
                return Err(StatsError::MalformedHeader {
                    reason: format!("read group ID '{}' is declared more than once", info.id),
                });
            }
            groups.push(info);
        }

        Ok(Self { groups, index })
    }

    /// Builds a table from the `@RG` lines of SAM header text.
    ///
    /// # Errors
    ///
    /// See [`ReadGroupTable::build`].
    pub fn from_header_text(text: &str) -> Result<Self> {
        Self::build(&read_group_tags_from_text(text))
    }

    /// Builds a table from a parsed SAM header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be rendered or a read group is malformed.
    pub fn from_header(header: &Header) -> anyhow::Result<Self> {
        let mut writer = noodles::sam::io::Writer::new(Vec::new());
        writer.write_header(header).context("Failed to render SAM header text")?;
        let text = String::from_utf8_lossy(writer.get_ref());
        Ok(Self::from_header_text(&text)?)
    }

    fn from_groups(groups: Vec<ReadGroupInfo>) -> Self {
        let index = groups.iter().enumerate().map(|(i, g)| (g.id.clone(), i)).collect();
        Self { groups, index }
    }

    /// Returns the index of the group whose identifier equals `id` exactly.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the group at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ReadGroupInfo> {
        self.groups.get(index)
    }

    /// Number of groups (at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no groups are held. Tables built from a header hold at least one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates groups in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ReadGroupInfo> {
        self.groups.iter()
    }
}
