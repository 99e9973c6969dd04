//! HTTP handlers for decision endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::application::handlers::{
    EvaluateDecisionCommand, EvaluateDecisionError, EvaluateDecisionHandler,
};
use crate::domain::ahp::RankingError;
use crate::domain::foundation::{DecisionId, ErrorCode};

use super::dto::{ErrorResponse, EvaluateDecisionRequest, EvaluateDecisionResponse};

/// Header whose value is propagated into published event metadata.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DecisionHandlers {
    evaluate_handler: Arc<EvaluateDecisionHandler>,
}

impl DecisionHandlers {
    pub fn new(evaluate_handler: Arc<EvaluateDecisionHandler>) -> Self {
        Self { evaluate_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/decisions/evaluate - Evaluate a decision snapshot
pub async fn evaluate_decision(
    State(handlers): State<DecisionHandlers>,
    headers: HeaderMap,
    Json(mut req): Json<EvaluateDecisionRequest>,
) -> Response {
    let decision_id = match req.decision_id.take() {
        Some(raw) => match raw.parse::<DecisionId>() {
            Ok(id) => id,
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request("Invalid decision ID")),
                )
                    .into_response()
            }
        },
        None => DecisionId::new(),
    };

    let correlation_id = headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let parsed = req.into_state();
    let cmd = EvaluateDecisionCommand {
        decision_id,
        state: parsed.state,
        correlation_id,
    };

    match handlers.evaluate_handler.handle(cmd).await {
        Ok(result) => {
            info!(
                decision_id = %decision_id,
                alternatives = result.report.ranking.len(),
                ignored_inputs = parsed.warnings.len(),
                inconsistent_matrices = result.report.consistency_warnings.len(),
                "Decision evaluated"
            );
            let response = EvaluateDecisionResponse::from_report(
                decision_id.to_string(),
                &result.report,
                parsed.warnings,
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_evaluate_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_evaluate_error(error: EvaluateDecisionError) -> Response {
    match error {
        EvaluateDecisionError::Ranking(RankingError::NoAlternatives) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::unprocessable(
                ErrorCode::NoAlternatives.to_string(),
                RankingError::NoAlternatives.to_string(),
            )),
        )
            .into_response(),
        EvaluateDecisionError::Publish(err) => {
            error!(error = %err, "Failed to publish evaluation event");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::from(&err)),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;

    #[test]
    fn no_alternatives_maps_to_422() {
        let response = handle_evaluate_error(EvaluateDecisionError::Ranking(
            RankingError::NoAlternatives,
        ));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn publish_failure_maps_to_500() {
        let error = DomainError::new(ErrorCode::EventPublishFailed, "bus down");
        let response = handle_evaluate_error(EvaluateDecisionError::Publish(error));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
