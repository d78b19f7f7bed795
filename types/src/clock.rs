//! Clock abstraction, so the session can be driven by a deterministic clock
//! in tests (see `rlp-nullables`).

use crate::time::Timestamp;

/// A source of wall-clock time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
