//! Wall clock adapter.

use chrono::{DateTime, Utc};
use plenum_application::ports::Clock;

/// Clock backed by the system time.
#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
