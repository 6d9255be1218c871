//! Error types for burst-plan
//!
//! Two failure kinds matter to callers and are kept apart:
//! [`FormatError`] for frame listings and mask files whose content cannot be
//! trusted, and [`ValidationError`] for parameters outside their documented
//! domain. [`Error`] wraps both for composite operations (configuration,
//! file helpers, JSON hand-off).

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// A frame listing or mask listing entry that does not follow its naming convention.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// File name has fewer than two `-` separated trailing fields
    #[error("Frame file name format is not correct: {path}\nExpected <...>-<gps_start>-<duration>.<ext>")]
    MissingTimeFields {
        /// Offending path
        path: String,
    },

    /// One of the trailing fields is not an integer
    #[error("Frame file name format is not correct: {path}\nField '{token}' is not an integer")]
    NonIntegerField {
        /// Offending path
        path: String,
        /// Field that failed to parse
        token: String,
    },

    /// GPS start precedes the configured epoch floor
    #[error("Frame file name format is not correct: {path}\nGPS start {gps_start} is before {floor}")]
    BeforeEpoch {
        /// Offending path
        path: String,
        /// Parsed GPS start
        gps_start: i64,
        /// Configured floor
        floor: i64,
    },

    /// Duration is smaller than one second
    #[error("Frame file name format is not correct: {path}\nDuration {duration} must be >= 1")]
    NonPositiveDuration {
        /// Offending path
        path: String,
        /// Parsed duration
        duration: i64,
    },

    /// Sky mask listing line is not `<sky_index> <value>`
    #[error("Malformed sky mask line {line} in {source_name}: '{content}'\nExpected two columns: sky_index value")]
    MalformedMaskLine {
        /// Name of the listing (usually its path)
        source_name: String,
        /// 1-based line number
        line: usize,
        /// Raw line content
        content: String,
    },
}

impl FormatError {
    /// Path or listing name the error refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingTimeFields { path }
            | Self::NonIntegerField { path, .. }
            | Self::BeforeEpoch { path, .. }
            | Self::NonPositiveDuration { path, .. } => path,
            Self::MalformedMaskLine { source_name, .. } => source_name,
        }
    }
}

/// A parameter outside its documented domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// NaN or infinite value
    #[error("Invalid {parameter}: {value} is not a finite number")]
    NonFinite {
        /// Parameter name
        parameter: &'static str,
        /// Offending value
        value: f64,
    },

    /// Value outside its allowed range
    #[error("Invalid {parameter}: {value}\n{parameter} must be {constraint}")]
    OutOfRange {
        /// Parameter name
        parameter: &'static str,
        /// Offending value
        value: f64,
        /// Human readable constraint, e.g. "in the range [-90,90]"
        constraint: &'static str,
    },

    /// Sky grid has no pixels
    #[error("Invalid sky grid: size must be > 0")]
    EmptyGrid,

    /// Coordinate mode is not earth-fixed or celestial
    #[error("Invalid coordinate mode '{0}'\nMust be 'e'/'earth_fixed' or 'c'/'celestial'")]
    UnknownCoordinateMode(String),

    /// Mask options string is missing a required option
    #[error("Missing sky mask option --{0}\nOptions must be: --theta THETA --phi PHI --radius RADIUS")]
    MissingOption(&'static str),

    /// Mask option value is not a number
    #[error("Invalid value '{value}' for sky mask option --{option}")]
    InvalidOption {
        /// Option name without dashes
        option: String,
        /// Raw value
        value: String,
    },

    /// Segment bounds are not strictly increasing
    #[error("Invalid segment bounds: start {start} must be < end {end}")]
    InvalidSegmentBounds {
        /// Segment start
        start: f64,
        /// Segment end
        end: f64,
    },

    /// Vector length does not match detector count
    #[error("Invalid {field} length: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Field name
        field: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Header field of a lag vector carries an unexpected value
    #[error("Invalid {field}: expected {expected}, got {actual}")]
    HeaderMismatch {
        /// Field name
        field: &'static str,
        /// Expected value
        expected: i64,
        /// Actual value
        actual: i64,
    },

    /// Sky index beyond the grid size
    #[error("Sky index {index} out of bounds (grid has {len} pixels)")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Grid size
        len: usize,
    },
}

/// Crate-wide error
#[derive(Error, Debug)]
pub enum Error {
    /// Listing content error
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Parameter domain error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
