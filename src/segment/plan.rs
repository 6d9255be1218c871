//! Job Plan - segments and lags handed to the search engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LagAssignment, SegmentRecord};

/// Everything one search job needs from planning.
///
/// Serializes segments through their plain [`super::SegmentExport`] shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPlan {
    created_at: DateTime<Utc>,
    detectors: Vec<String>,
    segments: Vec<SegmentRecord>,
    lags: Vec<LagAssignment>,
}

impl JobPlan {
    /// Create a plan stamped with the current time.
    #[must_use]
    pub fn new(detectors: Vec<String>, segments: Vec<SegmentRecord>) -> Self {
        Self {
            created_at: Utc::now(),
            detectors,
            segments,
            lags: Vec::new(),
        }
    }

    /// Attach a lag assignment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidationError`] if the assignment does not match the
    /// plan's detector count.
    pub fn add_lag(&mut self, lag: LagAssignment) -> Result<(), crate::ValidationError> {
        lag.validate(self.detectors.len())?;
        self.lags.push(lag);
        Ok(())
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Detector order used for every segment and lag vector.
    #[must_use]
    pub fn detectors(&self) -> &[String] {
        &self.detectors
    }

    /// Segments in index order.
    #[must_use]
    pub fn segments(&self) -> &[SegmentRecord] {
        &self.segments
    }

    /// Attached lag assignments.
    #[must_use]
    pub fn lags(&self) -> &[LagAssignment] {
        &self.lags
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a plan and re-check every lag against the detector list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] for malformed JSON or invalid segments,
    /// and [`crate::Error::Validation`] for inconsistent lag vectors.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let plan: Self = serde_json::from_str(json)?;
        for lag in &plan.lags {
            lag.validate(plan.detectors.len())?;
        }
        Ok(plan)
    }
}
