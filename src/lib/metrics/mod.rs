//! Metrics reported by fgstats.
//!
//! - [`bas`] - the per read group `.bas` table
//!
//! Every metric row type implements [`Metric`], which ties it to serde for TSV output and
//! gives it a name for log and error messages.

pub mod bas;

use serde::{Deserialize, Serialize, Serializer};

/// Number of decimal places used for float columns in `.bas` output.
pub const FLOAT_PRECISION: usize = 3;

/// Formats a float with [`FLOAT_PRECISION`] decimal places.
///
/// ```
/// use fgstats_lib::metrics::format_float;
///
/// assert_eq!(format_float(150.0), "150.000");
/// assert_eq!(format_float(0.12345), "0.123");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    format!("{value:.FLOAT_PRECISION$}")
}

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type.
    fn metric_name() -> &'static str;
}

/// Serializes a float with [`FLOAT_PRECISION`] decimal places.
pub(crate) fn serialize_float<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_float(*value))
}
