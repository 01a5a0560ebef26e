pub mod speed;
pub mod mode;

pub use speed::{
    adjust_cruise_speed, clamp_to_cruise_range, is_pedal_pressed, is_speed_in_range,
    PEDAL_THRESHOLD, SPEED_INCREMENT, SPEED_MAX, SPEED_MIN,
};
pub use mode::{ControllerMode, ModeParseError};
