//! Clock port.
//!
//! Every time-dependent command reads `now` through this trait, so tests
//! drive the engine with a fixed or stepped clock.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
