pub mod controller;
pub mod saturator;
pub mod regulator;

pub use controller::ThrottleController;
pub use saturator::{saturate, saturate_within, Saturation, THROTTLE_MAX};
pub use regulator::{ControllerState, RegulatorConfig, ThrottleRegulator, KI, KP};
