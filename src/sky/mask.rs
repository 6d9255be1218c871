//! Sky mask construction
//!
//! A circular mask selects every grid pixel within `radius` degrees of a
//! target direction. Masks can also be read from two-column
//! `sky_index value` listings.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::rotation::{FrameRotation, GeographicRotation};
use super::{angular_separation, unit_vector, SkyGrid, SkyPixel};
use crate::error::{FormatError, ValidationError};

/// Frame the mask target is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateMode {
    /// Geographic (theta, phi); rotated into the grid frame before masking
    EarthFixed,
    /// Celestial (declination, right ascension); used as given
    Celestial,
}

impl FromStr for CoordinateMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "e" | "earth" | "earth_fixed" => Ok(Self::EarthFixed),
            "c" | "celestial" => Ok(Self::Celestial),
            other => Err(ValidationError::UnknownCoordinateMode(other.to_string())),
        }
    }
}

impl fmt::Display for CoordinateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EarthFixed => write!(f, "earth_fixed"),
            Self::Celestial => write!(f, "celestial"),
        }
    }
}

/// Circle on the sky to select.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskRequest {
    /// Latitude-like center angle, `[-90, 90]`
    pub theta: f64,
    /// Longitude-like center angle, `[0, 360]`
    pub phi: f64,
    /// Radius in degrees, `> 0`
    pub radius: f64,
    /// Frame of `theta`/`phi`
    pub mode: CoordinateMode,
}

impl MaskRequest {
    /// Create a request. Values are checked when the mask is built.
    #[must_use]
    pub const fn new(theta: f64, phi: f64, radius: f64, mode: CoordinateMode) -> Self {
        Self {
            theta,
            phi,
            radius,
            mode,
        }
    }

    /// Parse `--theta THETA --phi PHI --radius RADIUS`.
    ///
    /// Unknown options are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingOption`] if one of the three options is
    /// absent and [`ValidationError::InvalidOption`] if its value is not a number.
    pub fn from_options(options: &str, mode: CoordinateMode) -> Result<Self, ValidationError> {
        let (mut theta, mut phi, mut radius) = (None, None, None);

        let mut tokens = options.split_whitespace();
        while let Some(token) = tokens.next() {
            let slot = match token {
                "--theta" => &mut theta,
                "--phi" => &mut phi,
                "--radius" => &mut radius,
                _ => continue,
            };
            let option = token.trim_start_matches('-');
            let raw = tokens.next().unwrap_or_default();
            let value = raw
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidOption {
                    option: option.to_string(),
                    value: raw.to_string(),
                })?;
            *slot = Some(value);
        }

        Ok(Self {
            theta: theta.ok_or(ValidationError::MissingOption("theta"))?,
            phi: phi.ok_or(ValidationError::MissingOption("phi"))?,
            radius: radius.ok_or(ValidationError::MissingOption("radius"))?,
            mode,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (parameter, value) in [
            ("theta", self.theta),
            ("phi", self.phi),
            ("radius", self.radius),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { parameter, value });
            }
        }
        if self.theta.abs() > 90.0 {
            return Err(ValidationError::OutOfRange {
                parameter: "theta",
                value: self.theta,
                constraint: "in the range [-90,90]",
            });
        }
        if !(0.0..=360.0).contains(&self.phi) {
            return Err(ValidationError::OutOfRange {
                parameter: "phi",
                value: self.phi,
                constraint: "in the range [0,360]",
            });
        }
        if self.radius <= 0.0 {
            return Err(ValidationError::OutOfRange {
                parameter: "radius",
                value: self.radius,
                constraint: "> 0",
            });
        }
        Ok(())
    }
}

/// Per-pixel selection values, index aligned with a grid.
///
/// Built masks hold 0/1; masks read from listings may carry weights. A pixel
/// is selected when its value is nonzero.
///
/// Deserialization recomputes the selected count from the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMask")]
pub struct SkyMask {
    values: Vec<f64>,
    selected: usize,
}

#[derive(Deserialize)]
struct RawMask {
    values: Vec<f64>,
}

impl From<RawMask> for SkyMask {
    fn from(raw: RawMask) -> Self {
        Self::from_values(raw.values)
    }
}

impl SkyMask {
    fn from_values(values: Vec<f64>) -> Self {
        let selected = values.iter().filter(|v| **v != 0.0).count();
        Self { values, selected }
    }

    /// Mask selecting every pixel of a grid of `len` pixels.
    #[must_use]
    pub fn all(len: usize) -> Self {
        Self {
            values: vec![1.0; len],
            selected: len,
        }
    }

    /// Read a two-column `sky_index value` listing.
    ///
    /// Blank and `#` lines are skipped; unlisted pixels are 0.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Format`] for a line that is not two numeric
    /// columns, and [`crate::Error::Validation`] for an index `>= grid_len`.
    pub fn from_index_listing(
        listing: &str,
        source_name: &str,
        grid_len: usize,
    ) -> crate::Result<Self> {
        if grid_len == 0 {
            return Err(ValidationError::EmptyGrid.into());
        }
        let mut values = vec![0.0; grid_len];

        for (line_no, raw) in listing.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = || FormatError::MalformedMaskLine {
                source_name: source_name.to_string(),
                line: line_no + 1,
                content: line.to_string(),
            };

            let mut columns = line.split_whitespace();
            let (Some(index), Some(value), None) = (columns.next(), columns.next(), columns.next())
            else {
                return Err(malformed().into());
            };
            let index = index.parse::<usize>().map_err(|_| malformed())?;
            let value = value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(malformed)?;

            let slot = values
                .get_mut(index)
                .ok_or(ValidationError::IndexOutOfRange {
                    index,
                    len: grid_len,
                })?;
            *slot = value;
        }

        let mask = Self::from_values(values);
        debug!(
            source = source_name,
            pixels = mask.len(),
            selected = mask.selected_count(),
            "Read sky mask listing"
        );
        Ok(mask)
    }

    /// Values in grid index order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the mask, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a zero-length mask.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of selected (nonzero) pixels.
    #[must_use]
    pub const fn selected_count(&self) -> usize {
        self.selected
    }

    /// True if pixel `index` is selected.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(|v| *v != 0.0)
    }

    /// Indices of selected pixels, ascending.
    #[must_use]
    pub fn selected_indices(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Two-column `sky_index value` listing of the selected pixels.
    #[must_use]
    pub fn to_index_listing(&self) -> String {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| format!("{i}\t{v}\n"))
            .collect()
    }
}

/// Builds circular masks over a grid.
///
/// Earth-fixed targets go through the injected [`FrameRotation`] first.
#[derive(Debug, Clone, Default)]
pub struct SkyMaskBuilder<R = GeographicRotation> {
    rotation: R,
}

impl SkyMaskBuilder {
    /// Builder using [`GeographicRotation`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: FrameRotation> SkyMaskBuilder<R> {
    /// Builder with a custom frame rotation.
    #[must_use]
    pub const fn with_rotation(rotation: R) -> Self {
        Self { rotation }
    }

    /// Build a 0/1 mask selecting pixels within the request's radius.
    ///
    /// The radius is raised to the grid's resolution floor
    /// ([`super::GridResolution::min_radius`]) so the mask is never finer than
    /// the grid. Every pixel is evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `|theta| > 90`, `phi` is outside
    /// `[0, 360]`, `radius <= 0`, a value is not finite, the grid is empty, or
    /// the grid's resolution descriptor is out of domain.
    pub fn build(&self, grid: &SkyGrid, request: &MaskRequest) -> Result<SkyMask, ValidationError> {
        request.validate()?;
        if grid.is_empty() {
            return Err(ValidationError::EmptyGrid);
        }

        let radius = request.radius.max(grid.resolution().min_radius()?);
        let (phi, theta) = match request.mode {
            CoordinateMode::EarthFixed => self.rotation.rotate(request.phi, request.theta),
            CoordinateMode::Celestial => (request.phi, request.theta),
        };
        let target = unit_vector(theta, phi);

        let inside = |pixel: &SkyPixel| {
            if angular_separation(&target, &pixel.unit_vector()) <= radius {
                1.0
            } else {
                0.0
            }
        };

        #[cfg(feature = "rayon")]
        let values: Vec<f64> = grid.pixels().par_iter().map(inside).collect();
        #[cfg(not(feature = "rayon"))]
        let values: Vec<f64> = grid.pixels().iter().map(inside).collect();

        let mask = SkyMask::from_values(values);
        if mask.selected_count() == 0 {
            warn!(
                theta = request.theta,
                phi = request.phi,
                radius,
                mode = %request.mode,
                "Sky mask selects no pixels"
            );
        } else {
            debug!(
                theta = request.theta,
                phi = request.phi,
                requested_radius = request.radius,
                radius,
                mode = %request.mode,
                pixels = mask.len(),
                selected = mask.selected_count(),
                "Built sky mask"
            );
        }
        Ok(mask)
    }
}

/// Build a circular mask with the default earth-fixed rotation.
///
/// # Errors
///
/// See [`SkyMaskBuilder::build`].
pub fn build_mask(
    grid: &SkyGrid,
    theta: f64,
    phi: f64,
    radius: f64,
    mode: CoordinateMode,
) -> Result<SkyMask, ValidationError> {
    SkyMaskBuilder::new().build(grid, &MaskRequest::new(theta, phi, radius, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::GridResolution;

    fn equator_grid() -> SkyGrid {
        SkyGrid::from_pixels(
            vec![
                SkyPixel::new(0.0, 0.0),
                SkyPixel::new(0.0, 45.0),
                SkyPixel::new(0.0, 180.0),
            ],
            GridResolution::MinHalfWidth(0.1),
        )
    }

    #[test]
    fn test_coordinate_mode_parsing() {
        assert_eq!("e".parse::<CoordinateMode>().unwrap(), CoordinateMode::EarthFixed);
        assert_eq!(
            "celestial".parse::<CoordinateMode>().unwrap(),
            CoordinateMode::Celestial
        );
        assert_eq!(
            "galactic".parse::<CoordinateMode>().unwrap_err(),
            ValidationError::UnknownCoordinateMode("galactic".to_string())
        );
    }

    #[test]
    fn test_options_parsing() {
        let request =
            MaskRequest::from_options("--theta -30 --phi 120.5 --radius 4", CoordinateMode::Celestial)
                .unwrap();
        assert!((request.theta + 30.0).abs() < f64::EPSILON);
        assert!((request.phi - 120.5).abs() < f64::EPSILON);
        assert!((request.radius - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_options_missing_and_invalid() {
        assert_eq!(
            MaskRequest::from_options("--theta 1 --phi 2", CoordinateMode::Celestial).unwrap_err(),
            ValidationError::MissingOption("radius")
        );
        assert!(matches!(
            MaskRequest::from_options("--theta x --phi 2 --radius 3", CoordinateMode::Celestial),
            Err(ValidationError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_rotation_is_applied_only_for_earth_fixed() {
        let grid = equator_grid();
        let flip = |phi: f64, theta: f64| ((phi + 180.0) % 360.0, theta);
        let builder = SkyMaskBuilder::with_rotation(flip);

        let earth = builder
            .build(&grid, &MaskRequest::new(0.0, 0.0, 10.0, CoordinateMode::EarthFixed))
            .unwrap();
        assert_eq!(earth.selected_indices(), vec![2]);

        let celestial = builder
            .build(&grid, &MaskRequest::new(0.0, 0.0, 10.0, CoordinateMode::Celestial))
            .unwrap();
        assert_eq!(celestial.selected_indices(), vec![0]);
    }

    #[test]
    fn test_nan_target_rejected() {
        assert!(matches!(
            build_mask(&equator_grid(), f64::NAN, 0.0, 1.0, CoordinateMode::Celestial),
            Err(ValidationError::NonFinite {
                parameter: "theta",
                ..
            })
        ));
    }

    #[test]
    fn test_index_listing_round_trip() {
        let listing = "# sky_index value\n0 1\n2 0.5\n\n";
        let mask = SkyMask::from_index_listing(listing, "mask.txt", 4).unwrap();
        assert_eq!(mask.values(), &[1.0, 0.0, 0.5, 0.0]);
        assert_eq!(mask.selected_count(), 2);
        assert_eq!(mask.to_index_listing(), "0\t1\n2\t0.5\n");
    }

    #[test]
    fn test_index_listing_errors() {
        let err = SkyMask::from_index_listing("0 1 2\n", "mask.txt", 4).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Format(FormatError::MalformedMaskLine { line: 1, .. })
        ));
        let err = SkyMask::from_index_listing("9 1\n", "mask.txt", 4).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Validation(ValidationError::IndexOutOfRange { index: 9, len: 4 })
        ));
    }
}
