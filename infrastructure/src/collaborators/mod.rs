//! In-memory adapters for the external collaborators.
//!
//! Propositions and the member roster are owned by other systems; these
//! adapters hold the slice of their data the engine needs for one run.

use async_trait::async_trait;
use plenum_application::ports::{MemberInfo, MemberRoster, PropositionInfo, PropositionStore};
use plenum_domain::PropositionId;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::debug;

#[derive(Default)]
pub struct InMemoryPropositionStore {
    propositions: Mutex<HashMap<PropositionId, PropositionInfo>>,
    released: Mutex<HashSet<PropositionId>>,
}

impl InMemoryPropositionStore {
    pub fn new(propositions: Vec<PropositionInfo>) -> Self {
        Self {
            propositions: Mutex::new(
                propositions.into_iter().map(|p| (p.id.clone(), p)).collect(),
            ),
            released: Mutex::new(HashSet::new()),
        }
    }

    /// Propositions released back for future scheduling.
    pub fn released(&self) -> Vec<PropositionId> {
        match self.released.lock() {
            Ok(set) => set.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl PropositionStore for InMemoryPropositionStore {
    async fn get(&self, id: &PropositionId) -> Option<PropositionInfo> {
        match self.propositions.lock() {
            Ok(map) => map.get(id).cloned(),
            Err(_) => None,
        }
    }

    async fn release(&self, id: &PropositionId) {
        debug!(proposition = %id, "proposition released");
        if let Ok(mut set) = self.released.lock() {
            set.insert(id.clone());
        }
    }
}

#[derive(Default)]
pub struct InMemoryMemberRoster {
    members: Vec<MemberInfo>,
}

impl InMemoryMemberRoster {
    pub fn new(members: Vec<MemberInfo>) -> Self {
        Self { members }
    }
}

#[async_trait]
impl MemberRoster for InMemoryMemberRoster {
    async fn members(&self) -> Vec<MemberInfo> {
        self.members.clone()
    }
}
