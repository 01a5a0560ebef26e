// ---------------------------------------------------------------------------
// Cruise speed policy
// ---------------------------------------------------------------------------

/// Lowest speed cruise control may hold, km/h.
pub const SPEED_MIN: f64 = 30.0;
/// Highest speed cruise control may hold, km/h.
pub const SPEED_MAX: f64 = 150.0;
/// Step applied by one press of the set+/set- lever, km/h.
pub const SPEED_INCREMENT: f64 = 2.5;
/// Pedal travel (percent) at or below which a pedal counts as released.
pub const PEDAL_THRESHOLD: f64 = 3.0;

/// True if `speed` lies inside the cruise range (both bounds inclusive).
pub fn is_speed_in_range(speed: f64) -> bool {
    (SPEED_MIN..=SPEED_MAX).contains(&speed)
}

/// True if the pedal is pressed past the threshold. The threshold itself is released.
pub fn is_pedal_pressed(pedal_percentage: f64) -> bool {
    pedal_percentage > PEDAL_THRESHOLD
}

/// Clamp a requested cruise speed into the cruise range.
///
/// In-range values (bounds included) pass through untouched.
pub fn clamp_to_cruise_range(speed: f64) -> f64 {
    if is_speed_in_range(speed) {
        speed
    } else if speed < SPEED_MIN {
        SPEED_MIN
    } else {
        SPEED_MAX
    }
}

/// Step the cruise target up or down by [`SPEED_INCREMENT`].
///
/// A step that would reach or cross a bound snaps to that bound instead of
/// overshooting. So `147.5 + 2.5` snaps to `SPEED_MAX` through the snap branch,
/// not through the add. The result always goes through [`clamp_to_cruise_range`].
pub fn adjust_cruise_speed(speed: f64, increase: bool) -> f64 {
    let adjusted = if increase {
        if speed + SPEED_INCREMENT < SPEED_MAX {
            speed + SPEED_INCREMENT
        } else {
            SPEED_MAX
        }
    } else if speed - SPEED_INCREMENT > SPEED_MIN {
        speed - SPEED_INCREMENT
    } else {
        SPEED_MIN
    };

    clamp_to_cruise_range(adjusted)
}
