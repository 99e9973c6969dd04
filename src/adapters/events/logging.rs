//! Event publisher that writes events to the tracing log.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// Publishes events as structured `info` records under the `ahp_engine::events` target.
///
/// Used by the server binary when no broker is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventPublisher;

impl LoggingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            target: "ahp_engine::events",
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            payload = %event.payload,
            "domain event published"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_always_succeeds() {
        let publisher = LoggingEventPublisher::new();
        let event = EventEnvelope::new("ahp.decision_evaluated", "d-1", "Decision", json!({"winner": "a"}));

        assert!(publisher.publish(event).await.is_ok());
    }
}
