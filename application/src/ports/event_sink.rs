//! Event sink port.
//!
//! Every successful mutating command emits one event. Sinks must not
//! block the command path; failures are logged and swallowed by the
//! adapter, never retried by the engine.

use plenum_domain::SessionId;

/// A structured record of one applied command.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub session_id: SessionId,
    /// Machine-readable event name, e.g. `session_begun`, `vote_cast`.
    pub event_type: &'static str,
    pub payload: serde_json::Value,
}

impl SessionEvent {
    pub fn new(
        session_id: SessionId,
        event_type: &'static str,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            session_id,
            event_type,
            payload,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: SessionEvent);
}

/// Sink that discards everything. Useful for tests and tools.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn record(&self, _event: SessionEvent) {}
}
