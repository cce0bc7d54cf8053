//! Live adapter for the `Clock` port using the system clock.

use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// System clock.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
