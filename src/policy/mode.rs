use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Cruise controller mode
// ---------------------------------------------------------------------------

/// Mode the cruise control state machine is in.
///
/// Only `On` actively regulates the throttle. The mode travels as a
/// single-character code: `"1"` Off, `"2"` On, `"3"` Standby, `"4"` Disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControllerMode {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "1"))]
    Off,
    #[cfg_attr(feature = "serde", serde(rename = "2"))]
    On,
    #[cfg_attr(feature = "serde", serde(rename = "3"))]
    Standby,
    #[cfg_attr(feature = "serde", serde(rename = "4"))]
    Disable,
}

/// Text that is not one of the four mode codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized controller mode code {0:?}")]
pub struct ModeParseError(pub String);

impl ControllerMode {
    pub const ALL: [ControllerMode; 4] = [
        ControllerMode::Off,
        ControllerMode::On,
        ControllerMode::Standby,
        ControllerMode::Disable,
    ];

    /// Text code of this mode.
    pub fn code(self) -> &'static str {
        match self {
            ControllerMode::Off => "1",
            ControllerMode::On => "2",
            ControllerMode::Standby => "3",
            ControllerMode::Disable => "4",
        }
    }

    /// Decode a mode code, falling back to `Off` for anything unrecognized.
    ///
    /// Use [`ControllerMode::is_valid_code`] first when the fallback must be
    /// told apart from a genuine `"1"`.
    pub fn from_code(text: &str) -> ControllerMode {
        text.parse().unwrap_or_default()
    }

    /// True only for the four exact mode codes.
    pub fn is_valid_code(text: &str) -> bool {
        text.parse::<ControllerMode>().is_ok()
    }

    pub fn is_on(self) -> bool {
        self == ControllerMode::On
    }
}

impl FromStr for ControllerMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(ControllerMode::Off),
            "2" => Ok(ControllerMode::On),
            "3" => Ok(ControllerMode::Standby),
            "4" => Ok(ControllerMode::Disable),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

impl fmt::Display for ControllerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerMode::Off => write!(f, "OFF"),
            ControllerMode::On => write!(f, "ON"),
            ControllerMode::Standby => write!(f, "STANDBY"),
            ControllerMode::Disable => write!(f, "DISABLE"),
        }
    }
}
