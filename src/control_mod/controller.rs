/// Trait for throttle controllers.
///
/// Implement this to drive a custom control law from the replay runner
/// or from an external cruise control state machine.
pub trait ThrottleController {
    /// Compute the throttle command for one control cycle.
    ///
    /// `is_going_on` is true only on the first cycle after entering the
    /// regulating mode.
    fn regulate(&mut self, is_going_on: bool, cruise_speed: f64, vehicle_speed: f64) -> f64;

    /// Whether the command returned by the latest `regulate` call was clamped.
    ///
    /// `None` when the controller does not track saturation.
    fn last_saturated(&self) -> Option<bool> {
        None
    }

    /// Reset controller internal state (e.g. the integrator).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
