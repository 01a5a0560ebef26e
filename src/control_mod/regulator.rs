use log::{debug, trace};

use super::controller::ThrottleController;
use super::saturator::{saturate_within, Saturation, THROTTLE_MAX};

// ---------------------------------------------------------------------------
// Regulator gains
// ---------------------------------------------------------------------------

/// Proportional gain, throttle percent per km/h of error.
pub const KP: f64 = 8.113;
/// Integral gain, applied to the accumulated error when read.
pub const KI: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegulatorConfig {
    pub kp: f64,
    pub ki: f64,
    pub throttle_max: f64,
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        Self {
            kp: KP,
            ki: KI,
            throttle_max: THROTTLE_MAX,
        }
    }
}

// ---------------------------------------------------------------------------
// Integrator state carried between cycles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    /// Sum of raw (ungained) error over non-frozen cycles.
    pub integral: f64,
    /// Whether the previous cycle's command was clamped.
    pub was_saturated: bool,
}

impl Default for ControllerState {
    /// Starts out assuming saturation so the first cycle cannot wind up.
    fn default() -> Self {
        Self {
            integral: 0.0,
            was_saturated: true,
        }
    }
}

// ---------------------------------------------------------------------------
// PI throttle regulator with conditional-integration anti-windup
// ---------------------------------------------------------------------------

/// PI throttle regulator.
///
/// The integrator is held on any cycle that follows a saturated one. The gate
/// uses the previous cycle's flag, so the cycle that first hits a rail still
/// integrates and the one after it is frozen.
#[derive(Debug, Clone)]
pub struct ThrottleRegulator {
    config: RegulatorConfig,
    state: ControllerState,
    last: Saturation,
}

/// Output reported before the first cycle, consistent with the initial state.
const IDLE: Saturation = Saturation { command: 0.0, saturated: true };

impl ThrottleRegulator {
    pub fn new() -> Self {
        Self::with_config(RegulatorConfig::default())
    }

    pub fn with_config(config: RegulatorConfig) -> Self {
        Self {
            config,
            state: ControllerState::default(),
            last: IDLE,
        }
    }

    /// Run one control cycle and return the saturated throttle command.
    pub fn regulate(&mut self, is_going_on: bool, cruise_speed: f64, vehicle_speed: f64) -> f64 {
        if is_going_on {
            debug!(
                "regulator activated: target {:.1} km/h, integral {:.3} cleared",
                cruise_speed, self.state.integral
            );
            self.state = ControllerState::default();
        }

        let error = cruise_speed - vehicle_speed;
        let p = error * self.config.kp;

        // Integral action is held while the command sits on a rail
        let effective = if self.state.was_saturated { 0.0 } else { error };
        self.state.integral += effective;
        let i = self.state.integral * self.config.ki;

        let out = saturate_within(p + i, self.config.throttle_max);
        if out.saturated != self.state.was_saturated {
            trace!(
                "throttle {} rail (raw {:.3}, command {:.3})",
                if out.saturated { "hit" } else { "left" },
                p + i,
                out.command
            );
        }
        self.state.was_saturated = out.saturated;
        self.last = out;

        out.command
    }

    pub fn reset(&mut self) {
        debug!("regulator reset");
        self.state = ControllerState::default();
        self.last = IDLE;
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn config(&self) -> &RegulatorConfig {
        &self.config
    }

    /// Output of the most recent cycle.
    pub fn last_saturation(&self) -> Saturation {
        self.last
    }
}

impl Default for ThrottleRegulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ThrottleController for ThrottleRegulator {
    fn regulate(&mut self, is_going_on: bool, cruise_speed: f64, vehicle_speed: f64) -> f64 {
        ThrottleRegulator::regulate(self, is_going_on, cruise_speed, vehicle_speed)
    }

    fn last_saturated(&self) -> Option<bool> {
        Some(self.last.saturated)
    }

    fn reset(&mut self) {
        ThrottleRegulator::reset(self);
    }

    fn name(&self) -> &str {
        "ThrottleRegulator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_mod::saturator::saturate;

    #[test]
    fn fresh_regulator_holds_integral_on_first_cycle() {
        let mut reg = ThrottleRegulator::new();
        let out = reg.regulate(false, 100.0, 99.0);
        assert!((out - KP).abs() < 1e-12, "Only P should act, got {}", out);
        assert_eq!(reg.state().integral, 0.0);
        assert!(!reg.state().was_saturated);
    }

    #[test]
    fn activation_is_proportional_only() {
        let mut reg = ThrottleRegulator::new();
        reg.regulate(true, 100.0, 99.0);
        for _ in 0..20 {
            reg.regulate(false, 100.0, 99.5);
        }
        assert!(reg.state().integral > 0.0);

        let out = reg.regulate(true, 100.0, 80.0);
        assert_eq!(out, saturate(20.0 * KP).command);
        assert_eq!(out, 45.0);
        assert_eq!(reg.state().integral, 0.0);
    }

    #[test]
    fn activation_with_small_error_skips_integration() {
        let mut reg = ThrottleRegulator::new();
        let out = reg.regulate(true, 100.0, 98.0);
        assert!((out - 2.0 * KP).abs() < 1e-12);
        assert_eq!(reg.state().integral, 0.0);
    }

    #[test]
    fn integral_accumulates_raw_error() {
        let mut reg = ThrottleRegulator::new();
        reg.regulate(true, 100.0, 99.0);
        let second = reg.regulate(false, 100.0, 99.0);
        assert!((second - (KP + KI)).abs() < 1e-12);
        let third = reg.regulate(false, 100.0, 99.0);
        assert!((third - (KP + 2.0 * KI)).abs() < 1e-12);
        assert!((reg.state().integral - 2.0).abs() < 1e-12);
    }

    #[test]
    fn integral_frozen_while_pinned() {
        let mut reg = ThrottleRegulator::new();
        reg.regulate(true, 100.0, 80.0);
        let frozen = reg.state().integral;
        for _ in 0..50 {
            let out = reg.regulate(false, 100.0, 80.0);
            assert_eq!(out, 45.0);
            assert_eq!(reg.state().integral, frozen);
        }

        // Error shrinks: first unsaturated cycle still carries no wound-up integral
        let out = reg.regulate(false, 100.0, 98.0);
        assert!((out - 2.0 * KP).abs() < 1e-12, "No windup kick, got {}", out);
        assert_eq!(reg.state().integral, frozen);

        // One cycle later integration resumes
        let out = reg.regulate(false, 100.0, 98.0);
        assert!((out - (2.0 * KP + 2.0 * KI)).abs() < 1e-12);
    }

    #[test]
    fn integral_held_across_error_reversal() {
        let mut reg = ThrottleRegulator::new();
        reg.regulate(true, 100.0, 99.0);
        for _ in 0..40 {
            reg.regulate(false, 100.0, 99.0);
        }
        assert!((reg.state().integral - 40.0).abs() < 1e-12);

        // Overspeed pins the command at zero; the pinning cycle still integrates
        assert_eq!(reg.regulate(false, 100.0, 105.0), 0.0);
        assert!(reg.last_saturation().saturated);
        let wound = reg.state().integral;
        assert!((wound - 35.0).abs() < 1e-12);

        for _ in 0..20 {
            assert_eq!(reg.regulate(false, 100.0, 105.0), 0.0);
            assert_eq!(reg.state().integral, wound);
        }

        // Error turns positive again: no jump from accumulated negative error
        let out = reg.regulate(false, 100.0, 99.0);
        assert!((out - (KP + wound * KI)).abs() < 1e-12, "got {}", out);
        assert_eq!(reg.state().integral, wound);
        assert!(!reg.last_saturation().saturated);

        let out = reg.regulate(false, 100.0, 99.0);
        assert!((out - (KP + (wound + 1.0) * KI)).abs() < 1e-12);
    }

    #[test]
    fn last_saturation_matches_initial_state() {
        let mut reg = ThrottleRegulator::new();
        assert!(reg.last_saturation().saturated);
        assert_eq!(reg.last_saturation().saturated, reg.state().was_saturated);
        assert_eq!(ThrottleController::last_saturated(&reg), Some(true));

        reg.regulate(true, 100.0, 99.0);
        assert_eq!(ThrottleController::last_saturated(&reg), Some(false));

        reg.reset();
        assert!(reg.last_saturation().saturated);
        assert_eq!(reg.last_saturation().command, 0.0);
        assert!(ThrottleRegulator::default().last_saturation().saturated);
    }

    #[test]
    fn saturation_gate_lags_one_cycle() {
        let mut reg = ThrottleRegulator::new();
        reg.regulate(true, 100.0, 99.0);

        // Previous cycle was unsaturated, so this error is integrated even though it saturates
        let out = reg.regulate(false, 100.0, 90.0);
        assert_eq!(out, 45.0);
        assert!((reg.state().integral - 10.0).abs() < 1e-12);
        assert!(reg.state().was_saturated);

        reg.regulate(false, 100.0, 90.0);
        assert!((reg.state().integral - 10.0).abs() < 1e-12);
    }

    #[test]
    fn overspeed_clamps_to_zero() {
        let mut reg = ThrottleRegulator::new();
        let out = reg.regulate(true, 80.0, 100.0);
        assert_eq!(out, 0.0);
        assert!(reg.last_saturation().saturated);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut reg = ThrottleRegulator::new();
        reg.regulate(true, 100.0, 99.0);
        reg.regulate(false, 100.0, 99.0);
        reg.reset();
        assert_eq!(reg.state(), ControllerState::default());
        assert!(reg.state().was_saturated);
    }

    #[test]
    fn custom_config_changes_rail_and_gains() {
        let config = RegulatorConfig { kp: 1.0, ki: 1.0, throttle_max: 100.0 };
        let mut reg = ThrottleRegulator::with_config(config);
        assert_eq!(reg.regulate(true, 100.0, 40.0), 60.0);
        assert_eq!(reg.regulate(false, 100.0, 40.0), 100.0);
        assert_eq!(reg.config().throttle_max, 100.0);
    }

    #[test]
    fn usable_through_trait_object() {
        let mut reg = ThrottleRegulator::new();
        let ctrl: &mut dyn ThrottleController = &mut reg;
        assert_eq!(ctrl.name(), "ThrottleRegulator");
        assert!((ctrl.regulate(true, 50.0, 49.0) - KP).abs() < 1e-12);
    }
}
