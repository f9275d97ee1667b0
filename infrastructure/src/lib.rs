//! Infrastructure layer for plenum
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, including configuration file loading.

pub mod clock;
pub mod collaborators;
pub mod config;
pub mod events;
pub mod repository;
pub mod templates;

// Re-export commonly used types
pub use clock::SystemClock;
pub use collaborators::{InMemoryMemberRoster, InMemoryPropositionStore};
pub use config::{ConfigLoader, FileConfig};
pub use events::JsonlEventLog;
pub use repository::InMemorySessionRepository;
pub use templates::TomlTemplateStore;
