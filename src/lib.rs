pub mod policy;
mod control_mod;
pub mod scenario;
pub mod sim;
pub mod io;

// The control module: expose control_mod as `control` publicly
pub mod control {
    pub use crate::control_mod::*;
}

// Flat entry points for the cruise control state machine
pub use control::{saturate, ThrottleController, ThrottleRegulator};
pub use policy::{
    adjust_cruise_speed, clamp_to_cruise_range, is_pedal_pressed, is_speed_in_range,
    ControllerMode,
};

pub mod types {
    pub use crate::control::{ControllerState, RegulatorConfig, Saturation};
    pub use crate::scenario::{Cycle, Scenario};
    pub use crate::sim::record::{CycleRecord, ReplayConfig};
}
