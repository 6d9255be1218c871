//! Sky grids and sky masks
//!
//! A sky grid is an ordered list of pixel centers given as (latitude-like
//! `theta`, longitude-like `phi`) in degrees, plus a resolution descriptor.
//! A sky mask is one value per grid pixel, index aligned with the grid.
//!
//! ## Usage
//!
//! ```rust
//! use burst_plan::sky::{CoordinateMode, MaskRequest, SkyGrid, SkyMaskBuilder};
//!
//! let grid = SkyGrid::healpix(3)?;
//! let request = MaskRequest::new(30.0, 120.0, 20.0, CoordinateMode::Celestial);
//! let mask = SkyMaskBuilder::new().build(&grid, &request)?;
//!
//! assert_eq!(mask.len(), grid.len());
//! assert!(mask.selected_count() > 0);
//! # Ok::<(), burst_plan::ValidationError>(())
//! ```

mod grid;
mod mask;
mod rotation;

pub use grid::MAX_HEALPIX_ORDER;
pub use mask::{build_mask, CoordinateMode, MaskRequest, SkyMask, SkyMaskBuilder};
pub use rotation::{FrameRotation, GeographicRotation, IdentityRotation};

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Solid angle of the full sphere in square degrees.
pub const SPHERE_SOLID_ANGLE_DEG2: f64 = 4.0 * PI * (180.0 / PI) * (180.0 / PI);

/// Pixel center in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPixel {
    /// Latitude-like angle, `[-90, 90]`
    pub theta: f64,
    /// Longitude-like angle, `[0, 360)`
    pub phi: f64,
}

impl SkyPixel {
    /// Create a pixel center.
    #[must_use]
    pub const fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Cartesian unit vector (polar angle `90 - theta`, azimuth `phi`).
    #[must_use]
    pub fn unit_vector(&self) -> [f64; 3] {
        unit_vector(self.theta, self.phi)
    }
}

/// Resolution descriptor of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridResolution {
    /// Hierarchical (HEALPix) grid of `12 * 4^order` pixels
    Hierarchical {
        /// Hierarchy order `k`
        order: u32,
    },
    /// Explicit minimum angular half-width in degrees
    MinHalfWidth(f64),
}

impl GridResolution {
    /// Pixel count implied by a hierarchical order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] if `12 * 4^order` does not fit
    /// in a `u64`.
    pub fn healpix_pixels(order: u32) -> Result<u64, ValidationError> {
        4_u64
            .checked_pow(order)
            .and_then(|n| n.checked_mul(12))
            .ok_or(ValidationError::OutOfRange {
                parameter: "healpix order",
                value: f64::from(order),
                constraint: "small enough that 12 * 4^order fits in 64 bits",
            })
    }

    /// Smallest radius (degrees) the grid can represent.
    ///
    /// For hierarchical grids this is the side of a mean-area pixel,
    /// `sqrt(4π(180/π)² / npix)`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a hierarchical order whose pixel count
    /// overflows, or a half-width that is negative or not finite.
    pub fn min_radius(&self) -> Result<f64, ValidationError> {
        match *self {
            Self::Hierarchical { order } => {
                #[allow(clippy::cast_precision_loss)]
                let npix = Self::healpix_pixels(order)? as f64;
                Ok((SPHERE_SOLID_ANGLE_DEG2 / npix).sqrt())
            }
            Self::MinHalfWidth(width) if !width.is_finite() => Err(ValidationError::NonFinite {
                parameter: "grid half-width",
                value: width,
            }),
            Self::MinHalfWidth(width) if width < 0.0 => Err(ValidationError::OutOfRange {
                parameter: "grid half-width",
                value: width,
                constraint: ">= 0",
            }),
            Self::MinHalfWidth(width) => Ok(width),
        }
    }
}

/// Ordered pixel centers plus resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct SkyGrid {
    pixels: Vec<SkyPixel>,
    resolution: GridResolution,
}

#[derive(Deserialize)]
struct RawGrid {
    pixels: Vec<SkyPixel>,
    resolution: GridResolution,
}

impl TryFrom<RawGrid> for SkyGrid {
    type Error = ValidationError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        raw.resolution.min_radius()?;
        Ok(Self::from_pixels(raw.pixels, raw.resolution))
    }
}

impl SkyGrid {
    /// Wrap externally generated pixel centers.
    #[must_use]
    pub fn from_pixels(pixels: Vec<SkyPixel>, resolution: GridResolution) -> Self {
        Self { pixels, resolution }
    }

    /// Pixel centers in index order.
    #[must_use]
    pub fn pixels(&self) -> &[SkyPixel] {
        &self.pixels
    }

    /// Resolution descriptor.
    #[must_use]
    pub const fn resolution(&self) -> GridResolution {
        self.resolution
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True if the grid has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel center at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<SkyPixel> {
        self.pixels.get(index).copied()
    }
}

/// Unit vector for (latitude `theta`, azimuth `phi`) in degrees.
#[must_use]
pub fn unit_vector(theta: f64, phi: f64) -> [f64; 3] {
    let polar = (90.0 - theta).to_radians();
    let azimuth = phi.to_radians();
    [
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    ]
}

/// Great-circle separation in degrees between two unit vectors.
///
/// The dot product is clamped to `[-1, 1]` before `acos`.
#[must_use]
pub fn angular_separation(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2];
    dot.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_vector_poles() {
        let north = unit_vector(90.0, 0.0);
        assert!((north[2] - 1.0).abs() < 1e-12);
        let equator = unit_vector(0.0, 90.0);
        assert!((equator[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_separation_clamps_overshoot() {
        let v = unit_vector(12.3, 45.6);
        let scaled = [v[0] * 1.000_000_1, v[1] * 1.000_000_1, v[2] * 1.000_000_1];
        assert!(angular_separation(&v, &scaled).is_finite());
        assert!(angular_separation(&v, &scaled).abs() < 1e-6);
    }

    #[test]
    fn test_min_radius_order_zero() {
        let radius = GridResolution::Hierarchical { order: 0 }.min_radius().unwrap();
        assert!((radius - (SPHERE_SOLID_ANGLE_DEG2 / 12.0).sqrt()).abs() < 1e-12);
        assert!((radius - 58.63).abs() < 0.01);
    }

    #[test]
    fn test_min_radius_explicit() {
        let radius = GridResolution::MinHalfWidth(0.4).min_radius().unwrap();
        assert!((radius - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_min_radius_rejects_overflowing_order() {
        assert_eq!(GridResolution::healpix_pixels(30).unwrap(), 12 << 60);
        assert!(GridResolution::healpix_pixels(31).is_err());
        assert!(matches!(
            GridResolution::Hierarchical { order: 32 }.min_radius(),
            Err(ValidationError::OutOfRange {
                parameter: "healpix order",
                ..
            })
        ));
    }

    #[test]
    fn test_min_radius_rejects_bad_half_width() {
        assert!(matches!(
            GridResolution::MinHalfWidth(f64::NAN).min_radius(),
            Err(ValidationError::NonFinite { .. })
        ));
        assert!(matches!(
            GridResolution::MinHalfWidth(-1.0).min_radius(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
