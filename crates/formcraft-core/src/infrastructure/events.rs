//! Event publisher adapters

use async_trait::async_trait;
use tracing::info;

use crate::domain::DomainEvent;
use crate::ports::outbound::{EventPublisher, RepoResult};

/// Emits one structured log line per domain event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> RepoResult<()> {
        for event in events {
            info!(event = event.name(), form_id = %event.form_id(), "Domain event");
        }
        Ok(())
    }
}
