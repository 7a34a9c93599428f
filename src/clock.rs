// ⏱️ Clock - the wall-clock reader used to stamp significant writes
//
// Read at write time, never cached.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for a timestamp registry
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock (`Utc::now()`)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for deterministic timelines
///
/// Every `now()` call returns the current instant and then advances it by
/// `step`, so successive reads are strictly increasing unless `step` is zero.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    /// Clock starting at `start`, advancing one second per read
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::seconds(1))
    }

    /// Clock starting at `start`, advancing `step` per read
    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        ManualClock {
            current: Cell::new(start),
            step,
        }
    }

    /// The instant the next `now()` will return
    pub fn peek(&self) -> DateTime<Utc> {
        self.current.get()
    }

    /// Move the clock forward without reading it
    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    /// Jump to an arbitrary instant (may go backwards)
    pub fn set(&self, at: DateTime<Utc>) {
        self.current.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }
}

// Lets a caller keep a handle on a clock it has given to a registry
impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
