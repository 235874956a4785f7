//! Timestamp source for stamped events.

use chrono::{DateTime, Utc};

/// Issues UTC timestamps that never go backwards.
///
/// Each call returns the current wall-clock time, clamped to the last value
/// handed out. Callers that stamp events one at a time get a sequence that is
/// non-decreasing in call order even if the system clock is adjusted.
#[derive(Debug, Default, Clone)]
pub struct MonotonicClock {
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the current instant.
    pub fn now(&mut self) -> DateTime<Utc> {
        self.stamp(Utc::now())
    }

    /// Stamp `candidate`, clamped to the previously issued timestamp.
    pub fn stamp(&mut self, candidate: DateTime<Utc>) -> DateTime<Utc> {
        let stamped = match self.last {
            Some(last) if last > candidate => last,
            _ => candidate,
        };
        self.last = Some(stamped);
        stamped
    }

    /// The most recently issued timestamp, if any.
    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.last
    }
}
