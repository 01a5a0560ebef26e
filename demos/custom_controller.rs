use cruise_control::io::ReplaySummary;
use cruise_control::scenario::presets;
use cruise_control::sim::{self, ReplayConfig};
use cruise_control::ThrottleController;

/// A proportional-only controller with a wider band, for comparison with the
/// stock PI regulator.
struct ProportionalOnly {
    kp: f64,
    saturated: bool,
}

impl ThrottleController for ProportionalOnly {
    fn regulate(&mut self, _is_going_on: bool, cruise_speed: f64, vehicle_speed: f64) -> f64 {
        let out = cruise_control::saturate((cruise_speed - vehicle_speed) * self.kp);
        self.saturated = out.saturated;
        out.command
    }

    fn last_saturated(&self) -> Option<bool> {
        Some(self.saturated)
    }

    fn name(&self) -> &str {
        "ProportionalOnly"
    }
}

fn main() {
    let scenario = presets::hill_climb();
    let config = ReplayConfig::default();

    let mut controller = ProportionalOnly { kp: 4.0, saturated: false };

    println!("Replaying '{}' with {} controller...", scenario.name, controller.name());
    let custom = sim::replay_with(&scenario, &config, &mut controller);
    let stock = sim::replay(&scenario, &config);

    for (label, records) in [("ProportionalOnly", &custom), ("ThrottleRegulator", &stock)] {
        let s = ReplaySummary::from_records(records);
        println!(
            "{:<18} peak {:>5.1} %  saturated {:>3} cycles  mean |error| {:>5.2} km/h",
            label, s.peak_throttle, s.saturated_cycles, s.mean_abs_error
        );
    }
}
