//! In-memory event bus implementation.
//!
//! Captures published events in process for assertions and for single-node
//! deployments where nothing subscribes out of process.

use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus.
///
/// Features:
/// - Synchronous capture (deterministic for tests)
/// - Query helpers for assertions
/// - Optional rejection mode to exercise publish failures
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
/// assert!(bus.has_event("ahp.decision_evaluated"));
/// ```
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
    reject: bool,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            reject: false,
        }
    }

    /// Creates a bus whose every publish fails with `EventPublishFailed`.
    pub fn rejecting() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
            reject: true,
        }
    }

    // A poisoned lock still holds a valid Vec; keep using it.
    fn read(&self) -> RwLockReadGuard<'_, Vec<EventEnvelope>> {
        self.published.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<EventEnvelope>> {
        self.published.write().unwrap_or_else(|e| e.into_inner())
    }

    // === Test Helpers ===

    /// Returns all published events.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.read().clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.read()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    /// Clears all published events (for test isolation).
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.read().len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.read().iter().any(|e| e.event_type == event_type)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.reject {
            return Err(
                DomainError::new(ErrorCode::EventPublishFailed, "Event bus rejected the event")
                    .with_detail("event_type", event.event_type),
            );
        }
        self.write().push(event);
        Ok(())
    }
}
