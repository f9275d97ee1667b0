//! Member roster port (read-only collaborator).

use async_trait::async_trait;
use plenum_domain::MemberId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub id: MemberId,
    pub name: String,
    pub party: String,
}

#[async_trait]
pub trait MemberRoster: Send + Sync {
    async fn members(&self) -> Vec<MemberInfo>;
}
