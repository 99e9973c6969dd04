//! Event bus adapters.
//!
//! Adapters implement the event publishing port for different environments:
//!
//! - `InMemoryEventBus` - In-process capture, used in tests
//! - `LoggingEventPublisher` - Writes events to the tracing log

mod in_memory;
mod logging;

pub use in_memory::InMemoryEventBus;
pub use logging::LoggingEventPublisher;
