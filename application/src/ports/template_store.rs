//! Agenda template source port.

use async_trait::async_trait;
use plenum_domain::{AgendaTemplate, TemplateId};

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn get(&self, id: &TemplateId) -> Option<AgendaTemplate>;
}
