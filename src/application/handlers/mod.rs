//! Application handlers.
//!
//! Command handlers that orchestrate the AHP engine and event publishing.

mod evaluate_decision;
mod recompute;

pub use evaluate_decision::{
    EvaluateDecisionCommand, EvaluateDecisionError, EvaluateDecisionHandler,
    EvaluateDecisionResult,
};
pub use recompute::{RecomputeOutcome, RecomputeScheduler};
