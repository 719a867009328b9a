//! Change notifications for UI shells.

use std::fmt;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use serde::Serialize;
use tracing::debug;

/// Changes a [`BookTracker`](super::BookTracker) announces.
///
/// Payloads are JSON strings:
/// - `BookAdded`, `BookUpdated`, `BookDeleted`: `{"id": .., "title": .., "status": ..}`
/// - `GoalChanged`: the current `ReadingGoal`
/// - `GenresChanged`: the vocabulary as an array of names
/// - `YearRolledOver`: the archived `YearlyGoal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerEvent {
    BookAdded,
    BookUpdated,
    BookDeleted,
    GoalChanged,
    GenresChanged,
    YearRolledOver,
}

impl TrackerEvent {
    pub const ALL: [TrackerEvent; 6] = [
        TrackerEvent::BookAdded,
        TrackerEvent::BookUpdated,
        TrackerEvent::BookDeleted,
        TrackerEvent::GoalChanged,
        TrackerEvent::GenresChanged,
        TrackerEvent::YearRolledOver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerEvent::BookAdded => "BookAdded",
            TrackerEvent::BookUpdated => "BookUpdated",
            TrackerEvent::BookDeleted => "BookDeleted",
            TrackerEvent::GoalChanged => "GoalChanged",
            TrackerEvent::GenresChanged => "GenresChanged",
            TrackerEvent::YearRolledOver => "YearRolledOver",
        }
    }
}

impl fmt::Display for TrackerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fans tracker events out to registered listeners.
///
/// Without the `emitter` feature events are only logged.
#[derive(Default)]
pub(crate) struct Notifier {
    #[cfg(feature = "emitter")]
    emitter: EventEmitter,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "emitter")]
    pub(crate) fn on<F>(&mut self, event: TrackerEvent, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(event.as_str(), listener)
    }

    #[cfg(feature = "emitter")]
    pub(crate) fn remove_listener(&mut self, listener_id: &str) -> bool {
        self.emitter.remove_listener(listener_id).is_some()
    }

    pub(crate) fn notify<T: Serialize>(&mut self, event: TrackerEvent, payload: &T) {
        let payload = serde_json::to_string(payload).unwrap_or_default();
        debug!(event = event.as_str(), "tracker event");
        #[cfg(feature = "emitter")]
        self.emitter.emit(event.as_str(), payload);
        #[cfg(not(feature = "emitter"))]
        let _ = payload;
    }
}
