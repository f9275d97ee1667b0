//! Port definitions (interfaces for external collaborators)
//!
//! Ports define the contracts that infrastructure adapters must implement:
//! the session store, the clock, the proposition and roster collaborators,
//! the template source and the event sink.

pub mod clock;
pub mod event_sink;
pub mod member_roster;
pub mod proposition_store;
pub mod session_repository;
pub mod template_store;

pub use clock::Clock;
pub use event_sink::{EventSink, NullEventSink, SessionEvent};
pub use member_roster::{MemberInfo, MemberRoster};
pub use proposition_store::{PropositionInfo, PropositionStore};
pub use session_repository::{RepositoryError, SessionRepository};
pub use template_store::TemplateStore;
