//! Frame files: discovery and segment assignment
//!
//! A frame is one data file covering a fixed span of time for one detector.
//!
//! ```text
//! listing text ──parse──> DetectorCatalog ──select(segment ± edge)──> frames for one segment
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use burst_plan::frame::{parse_listing, select_frames, CatalogOptions};
//!
//! let listing = "\
//! # produced by gw_data_find
//! framefile=file://localhost/data/H-H1_HOFT-1200000000-128.gwf
//! /data/H-H1_HOFT-1200000128-128.gwf
//! ";
//! let frames = parse_listing(listing, "H1", &CatalogOptions::default())?;
//! assert_eq!(frames.len(), 2);
//!
//! let kept = select_frames(&frames, 1_200_000_130.0, 1_200_000_200.0, 8.0);
//! assert_eq!(kept.len(), 2);
//! # Ok::<(), burst_plan::FormatError>(())
//! ```

mod catalog;
mod select;

pub use catalog::{
    parse_file, parse_listing, CatalogOptions, DetectorCatalog, DEFAULT_FILE_LABEL,
    DEFAULT_STRIP_PREFIXES, EPOCH_FLOOR,
};
pub use select::select_frames;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One physical data file.
///
/// Immutable once constructed; `end_time` is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct FrameRecord {
    #[serde(rename = "ifo", alias = "detector_id")]
    detector_id: String,
    path: String,
    start_time: f64,
    duration: f64,
}

impl FrameRecord {
    /// Create a frame record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `start_time` or `duration` is not finite,
    /// or if `duration <= 0`.
    pub fn new(
        detector_id: impl Into<String>,
        path: impl Into<String>,
        start_time: f64,
        duration: f64,
    ) -> Result<Self, ValidationError> {
        if !start_time.is_finite() {
            return Err(ValidationError::NonFinite {
                parameter: "start_time",
                value: start_time,
            });
        }
        if !duration.is_finite() {
            return Err(ValidationError::NonFinite {
                parameter: "duration",
                value: duration,
            });
        }
        if duration <= 0.0 {
            return Err(ValidationError::OutOfRange {
                parameter: "duration",
                value: duration,
                constraint: "> 0",
            });
        }
        Ok(Self {
            detector_id: detector_id.into(),
            path: path.into(),
            start_time,
            duration,
        })
    }

    /// Detector tag, e.g. `"H1"`.
    #[must_use]
    pub fn detector_id(&self) -> &str {
        &self.detector_id
    }

    /// Path of the file as listed (upstream prefixes removed).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// GPS start time in seconds.
    #[must_use]
    pub const fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Covered span in seconds.
    #[must_use]
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// `start_time + duration`
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Half-open overlap test against `[lo, hi)`.
    #[must_use]
    pub fn overlaps(&self, lo: f64, hi: f64) -> bool {
        self.start_time < hi && self.end_time() > lo
    }
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "ifo", alias = "detector_id")]
    detector_id: String,
    path: String,
    start_time: f64,
    duration: f64,
}

impl TryFrom<RawFrame> for FrameRecord {
    type Error = ValidationError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        Self::new(raw.detector_id, raw.path, raw.start_time, raw.duration)
    }
}
