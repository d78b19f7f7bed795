//! Nullable clock: deterministic time for testing.

use rlp_types::{Clock, Timestamp};
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, and may be set backwards to
/// exercise clock-skew handling.
#[derive(Debug)]
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_micros: u64) -> Self {
        Self {
            current: Cell::new(initial_micros),
        }
    }

    pub fn at_secs(secs: u64) -> Self {
        Self::new(Timestamp::from_secs(secs).as_micros())
    }

    /// Advance time by a number of microseconds.
    pub fn advance(&self, micros: u64) {
        self.current.set(self.current.get().saturating_add(micros));
    }

    /// Set the time to a specific value.
    pub fn set(&self, micros: u64) {
        self.current.set(micros);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.current.get())
    }
}
