//! HTTP adapter for decision endpoints.
//!
//! Exposes the AHP engine via REST API:
//! - `POST /api/decisions/evaluate` - Evaluate a decision snapshot and rank alternatives

pub mod dto;
pub mod handlers;
mod input;
pub mod routes;

pub use dto::*;
pub use handlers::{DecisionHandlers, CORRELATION_HEADER};
pub use input::ParsedDecision;
pub use routes::decision_routes;
