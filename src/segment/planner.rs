//! Segment planner - fixed-length windows and per-detector frame assignment

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{info, warn};

use super::SegmentRecord;
use crate::config::PlannerConfig;
use crate::error::ValidationError;
use crate::frame::{select_frames, DetectorCatalog};

/// Largest number of windows a single interval may be split into.
pub const MAX_WINDOWS: usize = 1_000_000;

/// Splits science intervals into analysis windows and fills each window with
/// the frames of every detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPlanner {
    seg_len: f64,
    seg_mls: f64,
    seg_edge: f64,
}

impl SegmentPlanner {
    /// Create a planner.
    ///
    /// # Arguments
    ///
    /// * `seg_len` - Target window length in seconds
    /// * `seg_mls` - Minimum interval length worth analysing
    /// * `seg_edge` - Padding read on both sides of every window
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `seg_len <= 0`, `seg_mls` is negative or
    /// exceeds `seg_len`, or `seg_edge < 0`.
    pub fn new(seg_len: f64, seg_mls: f64, seg_edge: f64) -> Result<Self, ValidationError> {
        check_finite("seg_len", seg_len)?;
        check_finite("seg_mls", seg_mls)?;
        check_finite("seg_edge", seg_edge)?;
        if seg_len <= 0.0 {
            return Err(ValidationError::OutOfRange {
                parameter: "seg_len",
                value: seg_len,
                constraint: "> 0",
            });
        }
        if seg_mls < 0.0 || seg_mls > seg_len {
            return Err(ValidationError::OutOfRange {
                parameter: "seg_mls",
                value: seg_mls,
                constraint: "in the range [0,seg_len]",
            });
        }
        if seg_edge < 0.0 {
            return Err(ValidationError::OutOfRange {
                parameter: "seg_edge",
                value: seg_edge,
                constraint: ">= 0",
            });
        }
        Ok(Self {
            seg_len,
            seg_mls,
            seg_edge,
        })
    }

    /// Planner with the lengths of a configuration.
    ///
    /// # Errors
    ///
    /// See [`SegmentPlanner::new`].
    pub fn from_config(config: &PlannerConfig) -> Result<Self, ValidationError> {
        Self::new(config.seg_len, config.seg_mls, config.seg_edge)
    }

    /// Edge padding in seconds.
    #[must_use]
    pub const fn edge(&self) -> f64 {
        self.seg_edge
    }

    /// Split `[start, stop)` into equal windows close to `seg_len`.
    ///
    /// The interval is divided into `floor(len / seg_len)` windows (at least
    /// one) of length `len / n`, so the last window ends exactly at `stop`.
    /// Intervals shorter than `seg_mls` yield no windows.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a bound is not finite, `start >= stop`,
    /// or the interval would split into more than [`MAX_WINDOWS`] windows.
    pub fn windows(&self, start: f64, stop: f64) -> Result<Vec<(f64, f64)>, ValidationError> {
        check_finite("start", start)?;
        check_finite("stop", stop)?;
        if start >= stop {
            return Err(ValidationError::InvalidSegmentBounds {
                start,
                end: stop,
            });
        }

        let len = stop - start;
        if len < self.seg_mls {
            warn!(start, stop, seg_mls = self.seg_mls, "Interval shorter than minimum segment length");
            return Ok(Vec::new());
        }

        let ratio = (len / self.seg_len).floor();
        #[allow(clippy::cast_precision_loss)]
        let max_windows = MAX_WINDOWS as f64;
        if ratio > max_windows {
            return Err(ValidationError::OutOfRange {
                parameter: "segment count",
                value: ratio,
                constraint: "at most 1000000 per interval",
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = (ratio as usize).max(1);
        #[allow(clippy::cast_precision_loss)]
        let step = len / count as f64;

        #[allow(clippy::cast_precision_loss)]
        let windows = (0..count)
            .map(|i| {
                let lo = start + i as f64 * step;
                let hi = if i + 1 == count {
                    stop
                } else {
                    start + (i + 1) as f64 * step
                };
                (lo, hi)
            })
            .collect();
        Ok(windows)
    }

    /// Build one segment: frames of every catalog overlapping the padded window,
    /// concatenated in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the window bounds are invalid.
    pub fn segment(
        &self,
        index: usize,
        window: (f64, f64),
        catalogs: &[DetectorCatalog],
    ) -> Result<SegmentRecord, ValidationError> {
        let (start, stop) = window;
        let frames: Vec<_> = catalogs
            .iter()
            .flat_map(|catalog| select_frames(catalog.frames(), start, stop, self.seg_edge))
            .collect();

        for catalog in catalogs {
            if !frames
                .iter()
                .any(|frame| frame.detector_id() == catalog.detector_id())
            {
                warn!(
                    index,
                    detector = catalog.detector_id(),
                    start,
                    stop,
                    "No frames overlap segment"
                );
            }
        }

        SegmentRecord::new(index, start, stop, frames)
    }

    /// Build segments for consecutive windows, indexed from zero.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] raised by [`SegmentPlanner::segment`].
    pub fn plan(
        &self,
        catalogs: &[DetectorCatalog],
        windows: &[(f64, f64)],
    ) -> Result<Vec<SegmentRecord>, ValidationError> {
        #[cfg(feature = "rayon")]
        let segments = windows
            .par_iter()
            .enumerate()
            .map(|(index, window)| self.segment(index, *window, catalogs))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "rayon"))]
        let segments = windows
            .iter()
            .enumerate()
            .map(|(index, window)| self.segment(index, *window, catalogs))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            segments = segments.len(),
            detectors = catalogs.len(),
            edge = self.seg_edge,
            "Planned segments"
        );
        Ok(segments)
    }
}

fn check_finite(parameter: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { parameter, value })
    }
}
