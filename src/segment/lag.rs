//! Lag assignment - data contract for time-shift configurations
//!
//! Generation of lag/segment combinations belongs to the search engine; this
//! type only checks the shape of assignments exchanged with it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Header fields preceding the per-detector shifts in a lag vector:
/// `[job_id, header_flag]`.
pub const LAG_HEADER_FIELDS: usize = 2;

/// One job's time-shift configuration.
///
/// `lag_vector` is `[job_id, header_flag, shift_1, .., shift_n]` and
/// `segment_vector` is `[segment_1, .., segment_n]`, one entry per detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagAssignment {
    job_id: i64,
    lag_vector: Vec<i64>,
    segment_vector: Vec<i64>,
}

impl LagAssignment {
    /// Create a lag assignment for a network of `detector_count` detectors.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a vector length does not match the
    /// detector count, if `lag_vector[0] != job_id`, or if the header flag is
    /// not 0 or 1.
    pub fn new(
        job_id: i64,
        lag_vector: Vec<i64>,
        segment_vector: Vec<i64>,
        detector_count: usize,
    ) -> Result<Self, ValidationError> {
        let assignment = Self {
            job_id,
            lag_vector,
            segment_vector,
        };
        assignment.validate(detector_count)?;
        Ok(assignment)
    }

    /// Check the assignment against a detector count.
    ///
    /// # Errors
    ///
    /// See [`LagAssignment::new`].
    pub fn validate(&self, detector_count: usize) -> Result<(), ValidationError> {
        let expected = detector_count + LAG_HEADER_FIELDS;
        if self.lag_vector.len() != expected {
            return Err(ValidationError::LengthMismatch {
                field: "lag_vector",
                expected,
                actual: self.lag_vector.len(),
            });
        }
        if self.segment_vector.len() != detector_count {
            return Err(ValidationError::LengthMismatch {
                field: "segment_vector",
                expected: detector_count,
                actual: self.segment_vector.len(),
            });
        }
        if self.lag_vector[0] != self.job_id {
            return Err(ValidationError::HeaderMismatch {
                field: "lag_vector[0] (job id)",
                expected: self.job_id,
                actual: self.lag_vector[0],
            });
        }
        let flag = self.lag_vector[1];
        if flag != 0 && flag != 1 {
            return Err(ValidationError::HeaderMismatch {
                field: "lag_vector[1] (header flag)",
                expected: 1,
                actual: flag,
            });
        }
        Ok(())
    }

    /// Job identifier.
    #[must_use]
    pub const fn job_id(&self) -> i64 {
        self.job_id
    }

    /// Full lag vector including header fields.
    #[must_use]
    pub fn lag_vector(&self) -> &[i64] {
        &self.lag_vector
    }

    /// Segment index contributed by each detector.
    #[must_use]
    pub fn segment_vector(&self) -> &[i64] {
        &self.segment_vector
    }

    /// Per-detector shifts (lag vector without header).
    #[must_use]
    pub fn shifts(&self) -> &[i64] {
        self.lag_vector.get(LAG_HEADER_FIELDS..).unwrap_or_default()
    }

    /// True for the header (zero-lag) entry.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.lag_vector.get(1) == Some(&1)
    }

    /// Number of detectors this assignment covers.
    #[must_use]
    pub fn detector_count(&self) -> usize {
        self.segment_vector.len()
    }
}
