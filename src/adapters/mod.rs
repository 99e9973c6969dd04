//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event publisher implementations (in-memory, tracing log)
//! - `http` - REST boundary for the AHP engine

pub mod events;
pub mod http;

pub use events::{InMemoryEventBus, LoggingEventPublisher};
pub use http::api_router;
