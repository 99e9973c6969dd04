//! HTTP routes for decision endpoints.

use axum::{routing::post, Router};

use super::handlers::{evaluate_decision, DecisionHandlers};

/// Creates the decision router with all endpoints.
///
/// Suitable for nesting at `/api/decisions`.
pub fn decision_routes(handlers: DecisionHandlers) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_decision))
        .with_state(handlers)
}
