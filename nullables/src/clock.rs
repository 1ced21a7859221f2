//! Nullable clock: deterministic time for approval deadlines.

use rbpool_types::Timestamp;
use std::cell::Cell;

/// A clock that only advances when told to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    pub fn advance(&self, secs: u64) {
        self.current.set(self.current.get() + secs);
    }

    pub fn set(&self, secs: u64) {
        self.current.set(secs);
    }
}
