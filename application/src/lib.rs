//! Application layer: command and query services over the session engine.
//!
//! Commands serialize per session, run one domain transition, persist the
//! result and emit an event. Ports at the bottom of this crate describe
//! every external collaborator; adapters live in the infrastructure crate.

pub mod error;
pub mod locks;
pub mod ports;
pub mod snapshot;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CommandError;
pub use locks::SessionLocks;
pub use snapshot::{ItemSnapshot, SessionSnapshot};
pub use use_cases::{AgendaCommands, SessionCommands, SessionQueries, VotingCommands};
