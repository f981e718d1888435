//! Custom error types for fgstats operations.

use thiserror::Error;

/// Result type alias for fgstats operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Error type for fgstats operations
#[derive(Error, Debug)]
pub enum StatsError {
    /// A read group declared in the header cannot be used
    #[error("Malformed @RG header line: {reason}")]
    MalformedHeader {
        /// Explanation of what is wrong with the read group
        reason: String,
    },

    /// A record carries a read group that the header does not declare
    #[error("Read group '{read_group}' of record '{record}' is not declared in the header")]
    UnknownReadGroup {
        /// The read group value found on the record
        read_group: String,
        /// The record name, or `*` when the record is unnamed
        record: String,
    },

    /// Insert size statistics were requested from a histogram with no observations
    #[error("Cannot compute insert size statistics from an empty histogram")]
    EmptyHistogram,

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM", "BAS")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },
}
