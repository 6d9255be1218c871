//! Sky grid generation
//!
//! Two layouts:
//! - HEALPix ring scheme, `12 * 4^order` equal-area pixels
//! - regular latitude rings with a fixed angular step

use std::f64::consts::PI;

use tracing::debug;

use super::{GridResolution, SkyGrid, SkyPixel};
use crate::error::ValidationError;

/// Largest hierarchical order generated in memory (~12.6M pixels).
pub const MAX_HEALPIX_ORDER: u32 = 10;

impl SkyGrid {
    /// HEALPix ring-scheme grid of the given order.
    ///
    /// Pixel `i` is the ring-ordered pixel `i`, starting at the north pole.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] if `order > MAX_HEALPIX_ORDER`.
    pub fn healpix(order: u32) -> Result<Self, ValidationError> {
        if order > MAX_HEALPIX_ORDER {
            return Err(ValidationError::OutOfRange {
                parameter: "healpix order",
                value: f64::from(order),
                constraint: "in the range [0,10]",
            });
        }

        let nside = 1_u64 << order;
        let npix = GridResolution::healpix_pixels(order)?;
        let pixels = (0..npix)
            .map(|ipix| {
                let (colatitude, phi) = pix2ang_ring(nside, ipix);
                SkyPixel::new(90.0 - colatitude.to_degrees(), phi.to_degrees())
            })
            .collect::<Vec<_>>();

        debug!(order, pixels = pixels.len(), "Generated HEALPix grid");
        Ok(Self::from_pixels(
            pixels,
            GridResolution::Hierarchical { order },
        ))
    }

    /// Regular grid of latitude rings `angle` degrees apart, restricted to
    /// `theta_range` x `phi_range`.
    ///
    /// Each ring holds as many pixels as fit at spacing `angle` along its
    /// circumference. The step is the grid's minimum half-width.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `angle` is outside `(0, 180]` or a range
    /// is empty or outside `[-90, 90]` / `[0, 360]`.
    pub fn regular(
        angle: f64,
        theta_range: (f64, f64),
        phi_range: (f64, f64),
    ) -> Result<Self, ValidationError> {
        if !angle.is_finite() || angle <= 0.0 || angle > 180.0 {
            return Err(ValidationError::OutOfRange {
                parameter: "angle",
                value: angle,
                constraint: "in the range (0,180]",
            });
        }
        check_range("theta_range", theta_range, -90.0, 90.0)?;
        check_range("phi_range", phi_range, 0.0, 360.0)?;

        let (theta1, theta2) = theta_range;
        let (phi1, phi2) = phi_range;

        let rings = ring_count(theta2 - theta1, angle);
        #[allow(clippy::cast_precision_loss)]
        let dtheta = (theta2 - theta1) / rings as f64;

        let mut pixels = Vec::new();
        for i in 0..rings {
            #[allow(clippy::cast_precision_loss)]
            let theta = theta1 + (i as f64 + 0.5) * dtheta;
            let circumference = (phi2 - phi1) * theta.to_radians().cos();
            let count = ring_count(circumference, angle);
            #[allow(clippy::cast_precision_loss)]
            let dphi = (phi2 - phi1) / count as f64;
            #[allow(clippy::cast_precision_loss)]
            pixels.extend((0..count).map(|j| SkyPixel::new(theta, phi1 + (j as f64 + 0.5) * dphi)));
        }

        debug!(angle, pixels = pixels.len(), "Generated regular grid");
        Ok(Self::from_pixels(pixels, GridResolution::MinHalfWidth(angle)))
    }
}

fn check_range(
    parameter: &'static str,
    (lo, hi): (f64, f64),
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    for value in [lo, hi] {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { parameter, value });
        }
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                parameter,
                value,
                constraint: "inside the sphere's coordinate domain",
            });
        }
    }
    if lo >= hi {
        return Err(ValidationError::OutOfRange {
            parameter,
            value: hi,
            constraint: "greater than the range start",
        });
    }
    Ok(())
}

/// `ceil(span / step)`, at least one.
fn ring_count(span: f64, step: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (span / step).ceil().max(1.0) as usize;
    count
}

/// Ring-scheme pixel index to (colatitude, longitude) in radians.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pix2ang_ring(nside: u64, ipix: u64) -> (f64, f64) {
    let npix = 12 * nside * nside;
    let ncap = 2 * nside * (nside - 1);
    let fact2 = 4.0 / npix as f64;

    let (z, phi) = if ipix < ncap {
        // north polar cap
        let iring = (1 + isqrt(1 + 2 * ipix)) >> 1;
        let iphi = ipix + 1 - 2 * iring * (iring - 1);
        let z = 1.0 - (iring * iring) as f64 * fact2;
        let phi = (iphi as f64 - 0.5) * PI / (2 * iring) as f64;
        (z, phi)
    } else if ipix < npix - ncap {
        // equatorial belt
        let fact1 = (2 * nside) as f64 * fact2;
        let ip = ipix - ncap;
        let iring = ip / (4 * nside) + nside;
        let iphi = ip % (4 * nside) + 1;
        let fodd = if (iring + nside) & 1 == 1 { 1.0 } else { 0.5 };
        let z = (2 * nside) as f64 - iring as f64;
        let phi = (iphi as f64 - fodd) * PI / (2 * nside) as f64;
        (z * fact1, phi)
    } else {
        // south polar cap
        let ip = npix - ipix;
        let iring = (1 + isqrt(2 * ip - 1)) >> 1;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        let z = -1.0 + (iring * iring) as f64 * fact2;
        let phi = (iphi as f64 - 0.5) * PI / (2 * iring) as f64;
        (z, phi)
    };

    (z.clamp(-1.0, 1.0).acos(), phi)
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn isqrt(value: u64) -> u64 {
    let mut root = (value as f64).sqrt() as u64;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}
