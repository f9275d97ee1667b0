//! Session repository adapters.

mod memory;

pub use memory::InMemorySessionRepository;
