//! Proposition store port.
//!
//! Propositions (bills) live outside the engine; agenda items hold only a
//! weak reference. The engine informs the store when an item is withdrawn
//! so the proposition becomes eligible for a future session.

use async_trait::async_trait;
use plenum_domain::PropositionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropositionInfo {
    pub id: PropositionId,
    pub title: String,
    pub kind: String,
}

#[async_trait]
pub trait PropositionStore: Send + Sync {
    async fn get(&self, id: &PropositionId) -> Option<PropositionInfo>;

    /// Mark the proposition free for inclusion in a future session.
    async fn release(&self, id: &PropositionId);
}
