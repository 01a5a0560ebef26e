use crate::policy::ControllerMode;

// ---------------------------------------------------------------------------
// Replay config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplayConfig {
    /// Nominal cycle period, s. Only labels the time axis of the records.
    pub cycle_time: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { cycle_time: 0.1 } // 10 Hz
    }
}

// ---------------------------------------------------------------------------
// Per-cycle replay output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleRecord {
    pub index: usize,
    pub time: f64,
    pub mode: ControllerMode,
    pub cruise_speed: f64,
    pub vehicle_speed: f64,
    pub throttle: Option<f64>, // None when the regulator is not in charge
    pub saturated: Option<bool>, // clamp flag reported by the controller, if any
    pub pedal_pressed: bool,
    pub speed_in_range: bool,
}

impl CycleRecord {
    /// Tracking error (target minus measured), km/h.
    pub fn error(&self) -> f64 {
        self.cruise_speed - self.vehicle_speed
    }

    pub fn is_active(&self) -> bool {
        self.throttle.is_some()
    }

    /// True only when the controller reported this cycle's command as clamped.
    pub fn is_saturated(&self) -> bool {
        self.saturated == Some(true)
    }
}
