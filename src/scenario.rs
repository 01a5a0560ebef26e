use crate::policy::{adjust_cruise_speed, clamp_to_cruise_range, ControllerMode, SPEED_MIN};

// ---------------------------------------------------------------------------
// One control cycle as seen by the regulator's caller
// ---------------------------------------------------------------------------

/// Inputs for one control cycle: the mode chosen by the state machine plus
/// the target and measured speeds. `accelerator` is pedal travel in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle {
    pub mode: ControllerMode,
    pub cruise_speed: f64,  // km/h
    pub vehicle_speed: f64, // km/h
    pub accelerator: f64,   // %
}

// ---------------------------------------------------------------------------
// Scenario: ordered sequence of cycles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    pub cycles: Vec<Cycle>,
}

impl Scenario {
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Number of cycles spent in the regulating mode.
    pub fn active_cycles(&self) -> usize {
        self.cycles.iter().filter(|c| c.mode.is_on()).count()
    }
}

// ---------------------------------------------------------------------------
// Scenario builder
// ---------------------------------------------------------------------------

/// Builds a scenario step by step.
///
/// Target changes go through the same speed policy the state machine uses,
/// so `engage` clamps and the lever steps snap at the range bounds.
pub struct ScenarioBuilder {
    name: String,
    cycles: Vec<Cycle>,
    mode: ControllerMode,
    cruise_speed: f64,
    vehicle_speed: f64,
    accelerator: f64,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cycles: vec![],
            mode: ControllerMode::Off,
            cruise_speed: SPEED_MIN,
            vehicle_speed: 0.0,
            accelerator: 0.0,
        }
    }

    /// Set the target (clamped into the cruise range) and switch to `On`.
    pub fn engage(mut self, speed: f64) -> Self {
        self.cruise_speed = clamp_to_cruise_range(speed);
        self.mode = ControllerMode::On;
        self
    }

    pub fn mode(mut self, mode: ControllerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn accelerator(mut self, percent: f64) -> Self {
        self.accelerator = percent;
        self
    }

    /// Press the set+ lever `presses` times.
    pub fn lever_up(mut self, presses: usize) -> Self {
        for _ in 0..presses {
            self.cruise_speed = adjust_cruise_speed(self.cruise_speed, true);
        }
        self
    }

    /// Press the set- lever `presses` times.
    pub fn lever_down(mut self, presses: usize) -> Self {
        for _ in 0..presses {
            self.cruise_speed = adjust_cruise_speed(self.cruise_speed, false);
        }
        self
    }

    /// Append `cycles` cycles at a constant vehicle speed.
    pub fn hold(mut self, cycles: usize, vehicle_speed: f64) -> Self {
        self.vehicle_speed = vehicle_speed;
        for _ in 0..cycles {
            self.push();
        }
        self
    }

    /// Append `cycles` cycles with the vehicle speed moving linearly from
    /// `from` to `to`. The last appended cycle sits exactly on `to`.
    pub fn ramp(mut self, cycles: usize, from: f64, to: f64) -> Self {
        for i in 1..=cycles {
            let frac = i as f64 / cycles as f64;
            self.vehicle_speed = from + (to - from) * frac;
            self.push();
        }
        self
    }

    pub fn build(self) -> Scenario {
        Scenario { name: self.name, cycles: self.cycles }
    }

    fn push(&mut self) {
        self.cycles.push(Cycle {
            mode: self.mode,
            cruise_speed: self.cruise_speed,
            vehicle_speed: self.vehicle_speed,
            accelerator: self.accelerator,
        });
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Accelerate by hand, engage at 110 km/h while still slower, settle.
    pub fn highway_engage() -> Scenario {
        ScenarioBuilder::new("Highway Engage")
            .accelerator(40.0)
            .ramp(40, 0.0, 100.0)
            .accelerator(0.0)
            .engage(110.0)
            .ramp(60, 100.0, 110.0)
            .hold(40, 110.0)
            .build()
    }

    /// Hold 90 km/h, lose speed on a grade (throttle pinned), recover.
    pub fn hill_climb() -> Scenario {
        ScenarioBuilder::new("Hill Climb")
            .engage(90.0)
            .hold(20, 90.0)
            .ramp(30, 90.0, 75.0)
            .hold(30, 75.0)
            .ramp(40, 75.0, 90.0)
            .hold(30, 90.0)
            .build()
    }

    /// Step the target with the lever, override with the pedal, resume, switch off.
    pub fn lever_sweep() -> Scenario {
        ScenarioBuilder::new("Lever Sweep")
            .engage(100.0)
            .hold(20, 100.0)
            .lever_up(4)
            .ramp(30, 100.0, 110.0)
            .mode(ControllerMode::Standby)
            .accelerator(20.0)
            .ramp(10, 110.0, 115.0)
            .mode(ControllerMode::On)
            .accelerator(0.0)
            .lever_down(8)
            .ramp(40, 115.0, 90.0)
            .mode(ControllerMode::Off)
            .ramp(10, 90.0, 80.0)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SPEED_MAX;

    #[test]
    fn engage_clamps_target() {
        let s = ScenarioBuilder::new("t").engage(200.0).hold(1, 100.0).build();
        assert_eq!(s.cycles[0].cruise_speed, SPEED_MAX);
        assert_eq!(s.cycles[0].mode, ControllerMode::On);
    }

    #[test]
    fn lever_snaps_at_bounds() {
        let s = ScenarioBuilder::new("t")
            .engage(145.0)
            .lever_up(5)
            .hold(1, 140.0)
            .lever_down(100)
            .hold(1, 140.0)
            .build();
        assert_eq!(s.cycles[0].cruise_speed, SPEED_MAX);
        assert_eq!(s.cycles[1].cruise_speed, SPEED_MIN);
    }

    #[test]
    fn ramp_ends_on_target() {
        let s = ScenarioBuilder::new("t").ramp(4, 0.0, 100.0).build();
        let speeds: Vec<f64> = s.cycles.iter().map(|c| c.vehicle_speed).collect();
        assert_eq!(speeds, vec![25.0, 50.0, 75.0, 100.0]);
        assert_eq!(s.active_cycles(), 0);
    }

    #[test]
    fn presets_have_active_cycles() {
        for s in [presets::highway_engage(), presets::hill_climb(), presets::lever_sweep()] {
            assert!(!s.is_empty(), "{} is empty", s.name);
            assert!(s.active_cycles() > 0, "{} never engages", s.name);
        }
    }

    #[test]
    fn lever_sweep_targets() {
        let s = presets::lever_sweep();
        assert_eq!(s.cycles[0].cruise_speed, 100.0);
        assert_eq!(s.cycles[20].cruise_speed, 110.0);
        assert_eq!(s.cycles.last().unwrap().cruise_speed, 90.0);
        assert_eq!(s.cycles.last().unwrap().mode, ControllerMode::Off);
    }
}
