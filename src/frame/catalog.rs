//! Frame listing parser
//!
//! Turns the line-oriented output of data-discovery tools into validated
//! [`FrameRecord`]s. File names must follow `<...>-<gps_start>-<duration>.<ext>`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::FrameRecord;
use crate::error::FormatError;

/// Earliest GPS start accepted in a frame file name.
///
/// Names below this are treated as malformed or pre-mission.
pub const EPOCH_FLOOR: i64 = 1_104_105_616;

/// Substring a listed path must contain to be considered a frame.
pub const DEFAULT_FILE_LABEL: &str = ".gwf";

/// Artifacts of upstream data-discovery tools removed from each line.
pub const DEFAULT_STRIP_PREFIXES: [&str; 3] = [
    "framefile=",
    "file://localhost",
    "gsiftp://ldr.aei.uni-hannover.de:15000",
];

/// Parsing options for a frame listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOptions {
    file_label: String,
    epoch_floor: i64,
    strip_prefixes: Vec<String>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            file_label: DEFAULT_FILE_LABEL.to_string(),
            epoch_floor: EPOCH_FLOOR,
            strip_prefixes: DEFAULT_STRIP_PREFIXES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl CatalogOptions {
    /// Default options (`.gwf` label, [`EPOCH_FLOOR`], known prefixes).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file-type label.
    #[must_use]
    pub fn file_label(mut self, label: impl Into<String>) -> Self {
        self.file_label = label.into();
        self
    }

    /// Set the minimum accepted GPS start.
    #[must_use]
    pub const fn epoch_floor(mut self, floor: i64) -> Self {
        self.epoch_floor = floor;
        self
    }

    /// Add a prefix to strip, after the existing ones.
    #[must_use]
    pub fn strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefixes.push(prefix.into());
        self
    }

    /// Replace the whole prefix list.
    #[must_use]
    pub fn strip_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Configured file-type label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.file_label
    }

    /// Configured epoch floor.
    #[must_use]
    pub const fn floor(&self) -> i64 {
        self.epoch_floor
    }

    /// Configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.strip_prefixes
    }

    fn strip<'a>(&self, mut line: &'a str) -> &'a str {
        for prefix in &self.strip_prefixes {
            if let Some(rest) = line.strip_prefix(prefix.as_str()) {
                line = rest;
            }
        }
        line
    }
}

/// Parse a frame listing for one detector.
///
/// Lines starting with `#` and blank lines are ignored. A `#` after leading
/// whitespace does not make a comment. Known prefixes are stripped and lines
/// whose path does not contain the file label are skipped. Output keeps
/// input order and is not deduplicated.
///
/// # Errors
///
/// Returns [`FormatError`] for the first label-matching path whose name does
/// not end in two integer fields, or whose fields fail the epoch floor or
/// `duration >= 1` checks.
pub fn parse_listing(
    listing: &str,
    detector_id: &str,
    options: &CatalogOptions,
) -> Result<Vec<FrameRecord>, FormatError> {
    let mut frames = Vec::new();

    for raw in listing.lines() {
        if raw.starts_with('#') {
            continue;
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let path = options.strip(line);
        if !path.contains(options.file_label.as_str()) {
            continue;
        }

        let (gps_start, duration) = parse_time_fields(path)?;
        if gps_start < options.epoch_floor {
            return Err(FormatError::BeforeEpoch {
                path: path.to_string(),
                gps_start,
                floor: options.epoch_floor,
            });
        }
        if duration < 1 {
            return Err(FormatError::NonPositiveDuration {
                path: path.to_string(),
                duration,
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let frame = FrameRecord {
            detector_id: detector_id.to_string(),
            path: path.to_string(),
            start_time: gps_start as f64,
            duration: duration as f64,
        };
        frames.push(frame);
    }

    debug!(
        detector = detector_id,
        frames = frames.len(),
        label = options.file_label.as_str(),
        "Parsed frame listing"
    );
    Ok(frames)
}

/// Read and parse a frame listing file.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be read, and
/// [`crate::Error::Format`] for a malformed frame name.
pub fn parse_file(
    path: impl AsRef<Path>,
    detector_id: &str,
    options: &CatalogOptions,
) -> crate::Result<DetectorCatalog> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let frames = parse_listing(&text, detector_id, options)?;
    Ok(DetectorCatalog::new(detector_id, frames))
}

/// `(gps_start, duration)` from the last two `-` separated fields of the file stem.
fn parse_time_fields(path: &str) -> Result<(i64, i64), FormatError> {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let mut fields = stem.rsplit('-');
    let (Some(duration), Some(gps_start)) = (fields.next(), fields.next()) else {
        return Err(FormatError::MissingTimeFields {
            path: path.to_string(),
        });
    };

    let parse = |token: &str| {
        token
            .parse::<i64>()
            .map_err(|_| FormatError::NonIntegerField {
                path: path.to_string(),
                token: token.to_string(),
            })
    };
    Ok((parse(gps_start)?, parse(duration)?))
}

/// All frames listed for one detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorCatalog {
    detector_id: String,
    frames: Vec<FrameRecord>,
}

impl DetectorCatalog {
    /// Wrap already-parsed frames.
    #[must_use]
    pub fn new(detector_id: impl Into<String>, frames: Vec<FrameRecord>) -> Self {
        Self {
            detector_id: detector_id.into(),
            frames,
        }
    }

    /// Parse a listing into a catalog.
    ///
    /// # Errors
    ///
    /// See [`parse_listing`].
    pub fn parse(
        listing: &str,
        detector_id: &str,
        options: &CatalogOptions,
    ) -> Result<Self, FormatError> {
        Ok(Self::new(
            detector_id,
            parse_listing(listing, detector_id, options)?,
        ))
    }

    /// Detector tag.
    #[must_use]
    pub fn detector_id(&self) -> &str {
        &self.detector_id
    }

    /// Frames in listing order.
    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frames were listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Earliest start and latest end over all frames.
    #[must_use]
    pub fn span(&self) -> Option<(f64, f64)> {
        self.frames.iter().fold(None, |acc, frame| {
            let (lo, hi) = acc.unwrap_or((frame.start_time(), frame.end_time()));
            Some((lo.min(frame.start_time()), hi.max(frame.end_time())))
        })
    }
}
