pub mod record;
pub mod runner;
pub mod event;

pub use record::{CycleRecord, ReplayConfig};
pub use runner::{replay, replay_with};
pub use event::{detect_events, ReplayEvent};
