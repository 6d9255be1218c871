//! Planner configuration
//!
//! Read from JSON; every field except `detectors` has a default.
//!
//! ```rust
//! use burst_plan::config::PlannerConfig;
//!
//! let config = PlannerConfig::from_json_str(r#"{ "detectors": ["H1", "L1"], "seg_edge": 10 }"#)?;
//! assert_eq!(config.seg_len, 600.0);
//! assert_eq!(config.seg_edge, 10.0);
//! # Ok::<(), burst_plan::Error>(())
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frame::{CatalogOptions, DEFAULT_FILE_LABEL, DEFAULT_STRIP_PREFIXES, EPOCH_FLOOR};
use crate::sky::SkyGrid;

/// Planning parameters for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Detector tags, in network order
    pub detectors: Vec<String>,

    /// Segment length [sec]
    #[serde(default = "default_seg_len")]
    pub seg_len: f64,

    /// Minimum segment length [sec]
    #[serde(default = "default_seg_mls")]
    pub seg_mls: f64,

    /// Boundary padding read around each segment [sec]
    #[serde(default = "default_seg_edge")]
    pub seg_edge: f64,

    /// Substring identifying frame files in listings
    #[serde(default = "default_frame_label")]
    pub frame_label: String,

    /// Minimum GPS start accepted in frame names
    #[serde(default = "default_epoch_floor")]
    pub epoch_floor: i64,

    /// Listing prefixes removed before parsing
    #[serde(default = "default_strip_prefixes")]
    pub strip_prefixes: Vec<String>,

    /// HEALPix order; `None` selects the regular grid
    #[serde(default = "default_healpix")]
    pub healpix: Option<u32>,

    /// Regular grid step [deg]
    #[serde(default = "default_sky_angle")]
    pub sky_angle: f64,

    /// Regular grid latitude range [deg]
    #[serde(default = "default_theta_range")]
    pub theta_range: (f64, f64),

    /// Regular grid longitude range [deg]
    #[serde(default = "default_phi_range")]
    pub phi_range: (f64, f64),
}

fn default_seg_len() -> f64 {
    600.0
}

fn default_seg_mls() -> f64 {
    300.0
}

fn default_seg_edge() -> f64 {
    8.0
}

fn default_frame_label() -> String {
    DEFAULT_FILE_LABEL.to_string()
}

const fn default_epoch_floor() -> i64 {
    EPOCH_FLOOR
}

fn default_strip_prefixes() -> Vec<String> {
    DEFAULT_STRIP_PREFIXES.iter().map(ToString::to_string).collect()
}

#[allow(clippy::unnecessary_wraps)]
const fn default_healpix() -> Option<u32> {
    Some(7)
}

fn default_sky_angle() -> f64 {
    0.4
}

fn default_theta_range() -> (f64, f64) {
    (-90.0, 90.0)
}

fn default_phi_range() -> (f64, f64) {
    (0.0, 360.0)
}

impl PlannerConfig {
    /// Defaults for the given detectors.
    #[must_use]
    pub fn new<I, S>(detectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            detectors: detectors.into_iter().map(Into::into).collect(),
            seg_len: default_seg_len(),
            seg_mls: default_seg_mls(),
            seg_edge: default_seg_edge(),
            frame_label: default_frame_label(),
            epoch_floor: default_epoch_floor(),
            strip_prefixes: default_strip_prefixes(),
            healpix: default_healpix(),
            sky_angle: default_sky_angle(),
            theta_range: default_theta_range(),
            phi_range: default_phi_range(),
        }
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON or unknown fields and
    /// [`Error::Config`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise see
    /// [`PlannerConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Check field domains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.detectors.is_empty() {
            return Err(Error::Config("detectors must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for detector in &self.detectors {
            if detector.is_empty() {
                return Err(Error::Config("detector tag must not be empty".to_string()));
            }
            if !seen.insert(detector.as_str()) {
                return Err(Error::Config(format!("duplicate detector '{detector}'")));
            }
        }
        if !(self.seg_len.is_finite() && self.seg_len > 0.0) {
            return Err(Error::Config(format!(
                "seg_len must be > 0, got {}",
                self.seg_len
            )));
        }
        if !(self.seg_mls.is_finite() && (0.0..=self.seg_len).contains(&self.seg_mls)) {
            return Err(Error::Config(format!(
                "seg_mls must be in [0, seg_len], got {}",
                self.seg_mls
            )));
        }
        if !(self.seg_edge.is_finite() && self.seg_edge >= 0.0) {
            return Err(Error::Config(format!(
                "seg_edge must be >= 0, got {}",
                self.seg_edge
            )));
        }
        if self.frame_label.is_empty() {
            return Err(Error::Config("frame_label must not be empty".to_string()));
        }
        if let Some(order) = self.healpix {
            if order > crate::sky::MAX_HEALPIX_ORDER {
                return Err(Error::Config(format!(
                    "healpix must be <= {}, got {order}",
                    crate::sky::MAX_HEALPIX_ORDER
                )));
            }
        } else {
            // regular grid parameters only matter without healpix
            if !(self.sky_angle.is_finite() && self.sky_angle > 0.0 && self.sky_angle <= 180.0) {
                return Err(Error::Config(format!(
                    "sky_angle must be in (0, 180], got {}",
                    self.sky_angle
                )));
            }
            check_ordered("theta_range", self.theta_range, -90.0, 90.0)?;
            check_ordered("phi_range", self.phi_range, 0.0, 360.0)?;
        }
        Ok(())
    }

    /// Catalog parsing options derived from this configuration.
    #[must_use]
    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions::new()
            .file_label(self.frame_label.clone())
            .epoch_floor(self.epoch_floor)
            .strip_prefixes(self.strip_prefixes.iter().cloned())
    }

    /// Generate the configured sky grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the grid parameters are out of domain.
    pub fn sky_grid(&self) -> Result<SkyGrid> {
        let grid = match self.healpix {
            Some(order) => SkyGrid::healpix(order)?,
            None => SkyGrid::regular(self.sky_angle, self.theta_range, self.phi_range)?,
        };
        Ok(grid)
    }
}

fn check_ordered(field: &str, (lo, hi): (f64, f64), min: f64, max: f64) -> Result<()> {
    if lo.is_finite() && hi.is_finite() && min <= lo && lo < hi && hi <= max {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{field} must be an increasing pair inside [{min}, {max}], got ({lo}, {hi})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::new(["H1", "L1"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.healpix, Some(7));
        assert_eq!(config.epoch_floor, 1_104_105_616);
        assert_eq!(config.catalog_options(), CatalogOptions::default());
    }

    #[test]
    fn test_rejects_duplicate_detectors() {
        let config = PlannerConfig::new(["H1", "H1"]);
        assert!(matches!(config.validate(), Err(Error::Config(msg)) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = PlannerConfig::from_json_str(r#"{ "detectors": ["H1"], "segLen": 10 }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_regular_grid_parameters_checked() {
        let mut config = PlannerConfig::new(["H1"]);
        config.healpix = None;
        config.theta_range = (10.0, -10.0);
        assert!(config.validate().is_err());

        config.theta_range = (-10.0, 10.0);
        config.sky_angle = 2.0;
        assert!(config.validate().is_ok());
        assert!(!config.sky_grid().unwrap().is_empty());
    }
}
