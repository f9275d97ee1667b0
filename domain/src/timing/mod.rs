//! Pause/resume time accounting.
//!
//! One [`Accumulator`] instance is owned by the session and one by each
//! agenda item; the two clocks share the arithmetic but run independently.
//! "Running" is represented by `started_at` being set; elapsed time is the
//! accumulated total plus the live delta since `started_at`.
//!
//! All operations take `now` explicitly so callers (and tests) control the
//! clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A started-at timestamp plus accumulated seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulator {
    started_at: Option<DateTime<Utc>>,
    accumulated_secs: u64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the last resume, if running.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Seconds accumulated over completed run intervals.
    pub fn accumulated_secs(&self) -> u64 {
        self.accumulated_secs
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total elapsed seconds as of `now`. Side-effect free.
    ///
    /// A `now` earlier than `started_at` (clock skew) contributes a zero
    /// delta; the result is never less than the accumulated total.
    pub fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        match self.started_at {
            Some(started) => self.accumulated_secs + clamped_delta(started, now),
            None => self.accumulated_secs,
        }
    }

    /// Start or restart the clock. No-op when already running, so a
    /// double resume cannot discard the live interval.
    pub fn resume(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Fold the live interval into the accumulated total and stop the
    /// clock. No-op when already paused.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.started_at.take() {
            self.accumulated_secs += clamped_delta(started, now);
        }
    }

    /// Pause and return the final total. Used by terminal transitions.
    pub fn stop(&mut self, now: DateTime<Utc>) -> u64 {
        self.pause(now);
        self.accumulated_secs
    }
}

fn clamped_delta(started: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - started).num_seconds().max(0) as u64
}
