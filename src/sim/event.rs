use crate::policy::ControllerMode;
use super::record::CycleRecord;

// ---------------------------------------------------------------------------
// Replay events
// ---------------------------------------------------------------------------

/// Kinds of replay events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Activated { target: f64 },
    Deactivated { to: ControllerMode },
    RailReached { command: f64 },
    RailReleased { command: f64 },
}

/// A discrete event observed at one cycle of a replay.
#[derive(Debug, Clone)]
pub struct ReplayEvent {
    pub index: usize,
    pub time: f64,
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive records and report events.
pub trait EventDetector {
    /// Inspect the first record, which has no predecessor.
    fn start(&mut self, _first: &CycleRecord) -> Option<EventKind> {
        None
    }

    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind>;
}

/// Detects entering and leaving the regulating mode.
///
/// A replay that opens in `On` activates on its first cycle.
pub struct ActivationDetector;

impl EventDetector for ActivationDetector {
    fn start(&mut self, first: &CycleRecord) -> Option<EventKind> {
        first
            .mode
            .is_on()
            .then_some(EventKind::Activated { target: first.cruise_speed })
    }

    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind> {
        match (prev.mode.is_on(), current.mode.is_on()) {
            (false, true) => Some(EventKind::Activated { target: current.cruise_speed }),
            (true, false) => Some(EventKind::Deactivated { to: current.mode }),
            _ => None,
        }
    }
}

/// Detects the controller starting or ending clamping of its command.
///
/// Follows the saturation flag the controller reported, so a command that
/// merely lands on `0` or the upper rail without clamping is not an event.
pub struct RailDetector;

impl EventDetector for RailDetector {
    fn start(&mut self, first: &CycleRecord) -> Option<EventKind> {
        let command = first.throttle?;
        first.is_saturated().then_some(EventKind::RailReached { command })
    }

    fn check(&mut self, prev: &CycleRecord, current: &CycleRecord) -> Option<EventKind> {
        let command = current.throttle?;
        match (prev.is_saturated(), current.is_saturated()) {
            (false, true) => Some(EventKind::RailReached { command }),
            (true, false) => Some(EventKind::RailReleased { command }),
            _ => None,
        }
    }
}

/// Run every detector over the first record and each consecutive pair.
pub fn detect_events(
    records: &[CycleRecord],
    detectors: &mut [Box<dyn EventDetector>],
) -> Vec<ReplayEvent> {
    let mut events = vec![];

    if let Some(first) = records.first() {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.start(first) {
                events.push(ReplayEvent { index: first.index, time: first.time, kind });
            }
        }
    }

    for pair in records.windows(2) {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(ReplayEvent {
                    index: pair[1].index,
                    time: pair[1].time,
                    kind,
                });
            }
        }
    }
    events
}
