//! EventPublisher port - Interface for publishing domain events.
//!
//! The application publishes `DecisionEvaluated` through this port without
//! knowing whether events land in memory, in a log, or on a broker.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (handlers may receive duplicates)
/// - Errors are propagated to the caller
///
/// # Example
///
/// ```ignore
/// let envelope = DecisionEvaluated::from_report(decision_id, &report).to_envelope()?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    ///
    /// Stops at the first failure; events before it stay published.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;
    use std::sync::Mutex;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher) {}

    struct FailingAfter {
        remaining: Mutex<usize>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EventPublisher for FailingAfter {
        async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
            let mut remaining = self.remaining.lock().unwrap();
            if *remaining == 0 {
                return Err(DomainError::new(ErrorCode::EventPublishFailed, "broker down"));
            }
            *remaining -= 1;
            self.seen.lock().unwrap().push(event.event_type);
            Ok(())
        }
    }

    #[tokio::test]
    async fn publish_all_stops_at_first_failure() {
        let publisher = FailingAfter {
            remaining: Mutex::new(1),
            seen: Mutex::new(Vec::new()),
        };
        let events = vec![
            EventEnvelope::new("first", "d-1", "Decision", json!({})),
            EventEnvelope::new("second", "d-1", "Decision", json!({})),
            EventEnvelope::new("third", "d-1", "Decision", json!({})),
        ];

        let result = publisher.publish_all(events).await;

        assert!(result.is_err());
        assert_eq!(*publisher.seen.lock().unwrap(), vec!["first".to_string()]);
    }
}
