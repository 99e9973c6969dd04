//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, events, and error types
//! that form the vocabulary of the AHP engine.

mod errors;
mod events;
mod ids;
mod percentage;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{AlternativeId, CriterionId, DecisionId, SubCriterionId};
pub use percentage::Percentage;
pub use timestamp::Timestamp;
