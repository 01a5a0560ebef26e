// ---------------------------------------------------------------------------
// Throttle saturation
// ---------------------------------------------------------------------------

/// Upper rail of the throttle actuator, percent.
pub const THROTTLE_MAX: f64 = 45.0;

/// A throttle command after clamping, with whether clamping happened.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Saturation {
    pub command: f64,
    pub saturated: bool,
}

/// Clamp a raw throttle command into `[0, THROTTLE_MAX]`.
pub fn saturate(throttle_in: f64) -> Saturation {
    saturate_within(throttle_in, THROTTLE_MAX)
}

/// Clamp a raw throttle command into `[0, max]`.
///
/// Landing exactly on a rail is not saturation. This flag is what gates the
/// regulator's integrator on the next cycle.
pub fn saturate_within(throttle_in: f64, max: f64) -> Saturation {
    if throttle_in > max {
        Saturation { command: max, saturated: true }
    } else if throttle_in < 0.0 {
        Saturation { command: 0.0, saturated: true }
    } else {
        Saturation { command: throttle_in, saturated: false }
    }
}
