//! HTTP adapters - REST API implementations.

pub mod decision;
mod health;

use axum::{routing::get, Router};

pub use decision::{decision_routes, DecisionHandlers, CORRELATION_HEADER};
pub use health::health;

/// Full API surface: health check plus the decision endpoints.
pub fn api_router(handlers: DecisionHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/decisions", decision_routes(handlers))
}
