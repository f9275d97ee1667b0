//! Newtype identifiers for the engine's entities.
//!
//! All ids are opaque strings. The engine never parses them; sessions
//! allocate item ids from an internal counter, everything else comes from
//! the collaborators at the boundary.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<T: Into<String>> From<T> for $name {
            fn from(s: T) -> Self {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a plenary session.
    SessionId
);

string_id!(
    /// Identifier of an agenda item within a session.
    ItemId
);

string_id!(
    /// Identifier of a chamber member.
    MemberId
);

string_id!(
    /// Weak reference to a proposition (bill) held by the external store.
    PropositionId
);

string_id!(
    /// Identifier of an agenda template.
    TemplateId
);
