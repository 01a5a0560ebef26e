use log::{info, warn};

use crate::control::{ThrottleController, ThrottleRegulator};
use crate::policy::{is_pedal_pressed, is_speed_in_range};
use crate::scenario::Scenario;
use super::record::{CycleRecord, ReplayConfig};

// ---------------------------------------------------------------------------
// Cycle-by-cycle replay
// ---------------------------------------------------------------------------

/// Replay a scenario through a custom controller, one call per cycle.
///
/// The controller only runs on `On` cycles. The first `On` cycle after any
/// other mode is flagged as the activation cycle, and leaving `On` resets
/// the controller.
pub fn replay_with(
    scenario: &Scenario,
    config: &ReplayConfig,
    controller: &mut dyn ThrottleController,
) -> Vec<CycleRecord> {
    info!(
        "replaying '{}' ({} cycles) with {}",
        scenario.name,
        scenario.len(),
        controller.name()
    );

    let mut records = Vec::with_capacity(scenario.len());
    let mut was_on = false;

    for (index, cycle) in scenario.cycles.iter().enumerate() {
        let on = cycle.mode.is_on();

        let (throttle, saturated) = if on {
            if !is_speed_in_range(cycle.cruise_speed) {
                warn!(
                    "cycle {}: cruise target {:.1} km/h outside the cruise range",
                    index, cycle.cruise_speed
                );
            }
            let command = controller.regulate(!was_on, cycle.cruise_speed, cycle.vehicle_speed);
            (Some(command), controller.last_saturated())
        } else {
            if was_on {
                controller.reset();
            }
            (None, None)
        };
        was_on = on;

        records.push(CycleRecord {
            index,
            time: index as f64 * config.cycle_time,
            mode: cycle.mode,
            cruise_speed: cycle.cruise_speed,
            vehicle_speed: cycle.vehicle_speed,
            throttle,
            saturated,
            pedal_pressed: is_pedal_pressed(cycle.accelerator),
            speed_in_range: is_speed_in_range(cycle.vehicle_speed),
        });
    }

    info!(
        "replay of '{}' done: {} of {} cycles regulated",
        scenario.name,
        records.iter().filter(|r| r.is_active()).count(),
        records.len()
    );

    records
}

/// Replay with a fresh default `ThrottleRegulator` (convenience wrapper).
pub fn replay(scenario: &Scenario, config: &ReplayConfig) -> Vec<CycleRecord> {
    let mut regulator = ThrottleRegulator::new();
    replay_with(scenario, config, &mut regulator)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{KP, THROTTLE_MAX};
    use crate::policy::ControllerMode;
    use crate::scenario::{presets, ScenarioBuilder};

    /// Records every call it receives.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(bool, f64, f64)>,
        resets: usize,
    }

    impl ThrottleController for Recorder {
        fn regulate(&mut self, is_going_on: bool, cruise_speed: f64, vehicle_speed: f64) -> f64 {
            self.calls.push((is_going_on, cruise_speed, vehicle_speed));
            1.0
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn one_record_per_cycle() {
        let s = presets::hill_climb();
        let records = replay(&s, &ReplayConfig::default());
        assert_eq!(records.len(), s.len());
        assert!((records[10].time - 1.0).abs() < 1e-12);
    }

    #[test]
    fn activation_flag_only_on_entry() {
        let s = ScenarioBuilder::new("t")
            .hold(2, 50.0)
            .engage(60.0)
            .hold(3, 50.0)
            .mode(ControllerMode::Standby)
            .hold(2, 50.0)
            .mode(ControllerMode::On)
            .hold(2, 50.0)
            .build();

        let mut recorder = Recorder::default();
        let records = replay_with(&s, &ReplayConfig::default(), &mut recorder);

        let flags: Vec<bool> = recorder.calls.iter().map(|c| c.0).collect();
        assert_eq!(flags, vec![true, false, false, true, false]);
        assert_eq!(recorder.resets, 1);
        assert!(records[0].throttle.is_none());
        assert_eq!(records[2].throttle, Some(1.0));
        assert!(records[5].throttle.is_none());
    }

    #[test]
    fn first_cycle_on_counts_as_activation() {
        let s = ScenarioBuilder::new("t").engage(90.0).hold(2, 80.0).build();
        let mut recorder = Recorder::default();
        replay_with(&s, &ReplayConfig::default(), &mut recorder);
        assert_eq!(recorder.calls[0], (true, 90.0, 80.0));
        assert!(!recorder.calls[1].0);
    }

    #[test]
    fn engage_below_target_pins_throttle() {
        let records = replay(&presets::highway_engage(), &ReplayConfig::default());
        let first_active = records.iter().find(|r| r.is_active()).unwrap();
        // 10 km/h short: P action alone exceeds the rail
        assert!(first_active.error() * KP > THROTTLE_MAX);
        assert_eq!(first_active.throttle, Some(THROTTLE_MAX));
    }

    #[test]
    fn throttle_stays_within_rails() {
        for s in [presets::highway_engage(), presets::hill_climb(), presets::lever_sweep()] {
            for r in replay(&s, &ReplayConfig::default()) {
                if let Some(t) = r.throttle {
                    assert!((0.0..=THROTTLE_MAX).contains(&t), "{}: {} at {}", s.name, t, r.index);
                }
            }
        }
    }

    #[test]
    fn saturation_flag_comes_from_controller() {
        let s = presets::hill_climb();
        let records = replay(&s, &ReplayConfig::default());

        let mut reg = ThrottleRegulator::new();
        let mut was_on = false;
        for (cycle, r) in s.cycles.iter().zip(&records) {
            if cycle.mode.is_on() {
                reg.regulate(!was_on, cycle.cruise_speed, cycle.vehicle_speed);
                assert_eq!(r.saturated, Some(reg.last_saturation().saturated), "cycle {}", r.index);
            } else {
                assert_eq!(r.saturated, None);
            }
            was_on = cycle.mode.is_on();
        }

        // Zero-error cycles land on 0.0 without being clamped
        assert_eq!(records[0].throttle, Some(0.0));
        assert!(!records[0].is_saturated());
    }

    #[test]
    fn untracked_saturation_is_none() {
        let s = ScenarioBuilder::new("t").engage(90.0).hold(2, 80.0).build();
        let mut recorder = Recorder::default();
        let records = replay_with(&s, &ReplayConfig::default(), &mut recorder);
        assert!(records.iter().all(|r| r.saturated.is_none()));
    }

    #[test]
    fn pedal_and_range_flags_recorded() {
        let records = replay(&presets::lever_sweep(), &ReplayConfig::default());
        assert!(records.iter().any(|r| r.pedal_pressed && r.mode == ControllerMode::Standby));
        assert!(records.iter().filter(|r| r.is_active()).all(|r| !r.pedal_pressed));
        assert!(records.iter().all(|r| r.speed_in_range));
    }
}
