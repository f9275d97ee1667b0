//! Use cases: the engine's command and query services.

pub mod agenda;
pub mod queries;
pub mod session_lifecycle;
mod shared;
pub mod voting;

pub use agenda::AgendaCommands;
pub use queries::SessionQueries;
pub use session_lifecycle::SessionCommands;
pub use voting::VotingCommands;
