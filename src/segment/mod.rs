//! Analysis segments and their hand-off shape
//!
//! ## Schema Overview
//!
//! ```text
//! JobPlan (1) ──< SegmentRecord (N) ──< FrameRecord (N) [detector-then-file order]
//!             └─< LagAssignment (N)
//! ```
//!
//! Segment frame lists keep insertion order. They are never sorted by start
//! time here; consumers that need time order must sort themselves.

mod lag;
mod plan;
mod planner;

pub use lag::{LagAssignment, LAG_HEADER_FIELDS};
pub use plan::JobPlan;
pub use planner::{SegmentPlanner, MAX_WINDOWS};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::frame::FrameRecord;

/// One fixed analysis window and the frames it reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SegmentExport", try_from = "SegmentExport")]
pub struct SegmentRecord {
    index: usize,
    start_time: f64,
    end_time: f64,
    frames: Vec<FrameRecord>,
}

impl SegmentRecord {
    /// Create a segment record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a bound is not finite or
    /// `start_time >= end_time`.
    pub fn new(
        index: usize,
        start_time: f64,
        end_time: f64,
        frames: Vec<FrameRecord>,
    ) -> Result<Self, ValidationError> {
        for (parameter, value) in [("start_time", start_time), ("end_time", end_time)] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { parameter, value });
            }
        }
        if start_time >= end_time {
            return Err(ValidationError::InvalidSegmentBounds {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            index,
            start_time,
            end_time,
            frames,
        })
    }

    /// Segment index, unique within a job.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Nominal start (without edge).
    #[must_use]
    pub const fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Nominal end (without edge).
    #[must_use]
    pub const fn end_time(&self) -> f64 {
        self.end_time
    }

    /// `end_time - start_time`
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Frames in insertion order.
    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Frames of a single detector, in insertion order.
    pub fn frames_for<'a>(&'a self, detector_id: &'a str) -> impl Iterator<Item = &'a FrameRecord> {
        self.frames
            .iter()
            .filter(move |frame| frame.detector_id() == detector_id)
    }

    /// Plain-data export of this segment.
    #[must_use]
    pub fn to_export(&self) -> SegmentExport {
        SegmentExport::from(self.clone())
    }
}

/// Plain mapping of a frame: four scalar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameExport {
    /// Detector tag
    #[serde(alias = "detector_id")]
    pub ifo: String,
    /// File path
    pub path: String,
    /// GPS start
    pub start_time: f64,
    /// Span in seconds
    pub duration: f64,
}

/// Plain mapping of a segment, frames flattened to [`FrameExport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentExport {
    /// Segment index
    pub index: usize,
    /// Nominal start
    pub start_time: f64,
    /// Nominal end
    pub end_time: f64,
    /// Frames in insertion order
    pub frames: Vec<FrameExport>,
}

impl From<FrameRecord> for FrameExport {
    fn from(frame: FrameRecord) -> Self {
        Self {
            ifo: frame.detector_id().to_string(),
            path: frame.path().to_string(),
            start_time: frame.start_time(),
            duration: frame.duration(),
        }
    }
}

impl TryFrom<FrameExport> for FrameRecord {
    type Error = ValidationError;

    fn try_from(frame: FrameExport) -> Result<Self, Self::Error> {
        Self::new(frame.ifo, frame.path, frame.start_time, frame.duration)
    }
}

impl From<SegmentRecord> for SegmentExport {
    fn from(segment: SegmentRecord) -> Self {
        Self {
            index: segment.index,
            start_time: segment.start_time,
            end_time: segment.end_time,
            frames: segment.frames.into_iter().map(FrameExport::from).collect(),
        }
    }
}

impl TryFrom<SegmentExport> for SegmentRecord {
    type Error = ValidationError;

    fn try_from(export: SegmentExport) -> Result<Self, Self::Error> {
        let frames = export
            .frames
            .into_iter()
            .map(FrameRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(export.index, export.start_time, export.end_time, frames)
    }
}
