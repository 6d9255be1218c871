//! Reference frame conversion for earth-fixed mask targets

/// Converts a target direction into the frame the grid was generated in.
///
/// Must be the same transform used when the grid's pixel coordinates were
/// produced, otherwise angular comparisons are meaningless.
pub trait FrameRotation: Send + Sync {
    /// Map `(phi, theta)` in degrees to the internal frame.
    fn rotate(&self, phi: f64, theta: f64) -> (f64, f64);
}

/// Geographic to internal frame: longitude wrapped into `(-180, 180]`,
/// latitude unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeographicRotation;

impl FrameRotation for GeographicRotation {
    fn rotate(&self, phi: f64, theta: f64) -> (f64, f64) {
        let phi = if phi > 180.0 { phi - 360.0 } else { phi };
        (phi, theta)
    }
}

/// Leaves angles untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityRotation;

impl FrameRotation for IdentityRotation {
    fn rotate(&self, phi: f64, theta: f64) -> (f64, f64) {
        (phi, theta)
    }
}

impl<F> FrameRotation for F
where
    F: Fn(f64, f64) -> (f64, f64) + Send + Sync,
{
    fn rotate(&self, phi: f64, theta: f64) -> (f64, f64) {
        self(phi, theta)
    }
}
