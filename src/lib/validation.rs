//! Input validation utilities
//!
//! Validation of command-line parameters and input paths with consistent error messages built
//! from [`crate::errors::StatsError`].

use crate::bam_io::is_stdin_path;
use crate::errors::{Result, StatsError};
use std::fmt::Display;
use std::path::Path;

/// Validate that an input file exists.
///
/// Standard input paths (`-`, `/dev/stdin`) are always accepted.
///
/// # Errors
/// Returns [`StatsError::InvalidFileFormat`] if the file does not exist or is a directory
///
/// # Example
/// ```
/// use fgstats_lib::validation::validate_file_exists;
///
/// assert!(validate_file_exists("/nonexistent/file.bam", "Input BAM").is_err());
/// assert!(validate_file_exists("-", "Input BAM").is_ok());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if is_stdin_path(path_ref) {
        return Ok(());
    }
    let reason = if !path_ref.exists() {
        "File does not exist"
    } else if path_ref.is_dir() {
        "Path is a directory"
    } else {
        return Ok(());
    };
    Err(StatsError::InvalidFileFormat {
        file_type: description.to_string(),
        path: path_ref.display().to_string(),
        reason: reason.to_string(),
    })
}

/// Validate that a value is strictly positive.
///
/// # Errors
/// Returns [`StatsError::InvalidParameter`] if `value` is not greater than its default (zero)
///
/// # Example
/// ```
/// use fgstats_lib::validation::validate_positive;
///
/// assert!(validate_positive(4usize, "threads").is_ok());
/// assert!(validate_positive(0usize, "threads").is_err());
/// ```
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(StatsError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be >= 1, got: {value}"),
        });
    }
    Ok(())
}
