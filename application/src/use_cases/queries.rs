//! Read-only queries. No locking: each query works from one loaded copy.

use crate::error::CommandError;
use crate::ports::{Clock, SessionRepository};
use crate::snapshot::SessionSnapshot;
use plenum_domain::{ItemId, QuorumSummary, SessionId, Tally};
use std::sync::Arc;

pub struct SessionQueries<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: SessionRepository> SessionQueries<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn snapshot(&self, id: &SessionId) -> Result<SessionSnapshot, CommandError> {
        let session = self.repo.load(id).await?;
        Ok(SessionSnapshot::capture(&session, self.clock.now()))
    }

    pub async fn elapsed_session(&self, id: &SessionId) -> Result<u64, CommandError> {
        let session = self.repo.load(id).await?;
        Ok(session.elapsed(self.clock.now()))
    }

    pub async fn elapsed_item(
        &self,
        id: &SessionId,
        item_id: &ItemId,
    ) -> Result<u64, CommandError> {
        let session = self.repo.load(id).await?;
        Ok(session.elapsed_item(item_id, self.clock.now())?)
    }

    pub async fn quorum(&self, id: &SessionId) -> Result<QuorumSummary, CommandError> {
        let session = self.repo.load(id).await?;
        Ok(session.quorum())
    }

    pub async fn tally(&self, id: &SessionId, item_id: &ItemId) -> Result<Tally, CommandError> {
        let session = self.repo.load(id).await?;
        Ok(session.tally(item_id)?)
    }

    pub async fn list(&self) -> Result<Vec<SessionId>, CommandError> {
        Ok(self.repo.list().await?)
    }
}
