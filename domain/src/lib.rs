//! Domain layer for plenum
//!
//! Core of the legislative session control engine: the session and agenda
//! item state machines, the pause/resume time accumulator they share,
//! quorum computation and vote tallying. Pure business logic with no
//! dependency on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Session**: one plenary sitting, driven through
//!   scheduled / in-progress / suspended / concluded / cancelled.
//! - **Agenda item**: one matter on the "pauta", grouped into fixed
//!   sections with contiguous sequence numbers; at most one item is active
//!   at a time.
//! - **Accumulator**: the single time-accounting primitive instantiated per
//!   owner (the session and each item carry independent clocks).

pub mod agenda;
pub mod core;
pub mod presence;
pub mod session;
pub mod timing;
pub mod voting;

// Re-export commonly used types
pub use agenda::{
    ActionKind, ItemOutcome, ItemStatus, Section,
    item::AgendaItem,
    orchestrator::{Agenda, MoveDirection, NewItem},
    template::{AgendaTemplate, TemplateItem, TemplateMode},
    transitions::{ItemAction, is_legal, legal_actions},
};
pub use crate::core::{
    error::EngineError,
    ids::{ItemId, MemberId, PropositionId, SessionId, TemplateId},
};
pub use presence::{PresenceRecord, QuorumSummary};
pub use session::{Session, SessionKind, SessionStatus};
pub use timing::Accumulator;
pub use voting::{Ballot, Tally, VoteChoice, VoteRecord};
