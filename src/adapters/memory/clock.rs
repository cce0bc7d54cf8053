//! Fixed clock adapter.

use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// A clock frozen at a chosen instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
