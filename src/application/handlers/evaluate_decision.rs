//! EvaluateDecisionHandler - Command handler for evaluating a decision snapshot.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::ahp::{
    DecisionEvaluated, DecisionEvaluator, DecisionReport, DecisionState, EvaluationOptions,
    RankingError,
};
use crate::domain::foundation::{DecisionId, DomainError, SerializableDomainEvent};
use crate::ports::EventPublisher;

/// Command to evaluate a decision.
#[derive(Debug, Clone)]
pub struct EvaluateDecisionCommand {
    pub decision_id: DecisionId,
    pub state: DecisionState,
    /// Propagated into the published event's metadata.
    pub correlation_id: Option<String>,
}

/// Result of a successful evaluation.
#[derive(Debug, Clone)]
pub struct EvaluateDecisionResult {
    pub report: DecisionReport,
    pub event: DecisionEvaluated,
}

/// Errors from evaluating a decision.
#[derive(Debug, Clone, Error)]
pub enum EvaluateDecisionError {
    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error("Failed to publish evaluation event: {0}")]
    Publish(#[from] DomainError),
}

/// Handler for evaluating decisions.
pub struct EvaluateDecisionHandler {
    event_publisher: Arc<dyn EventPublisher>,
    options: EvaluationOptions,
}

impl EvaluateDecisionHandler {
    pub fn new(event_publisher: Arc<dyn EventPublisher>, options: EvaluationOptions) -> Self {
        Self {
            event_publisher,
            options,
        }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub async fn handle(
        &self,
        cmd: EvaluateDecisionCommand,
    ) -> Result<EvaluateDecisionResult, EvaluateDecisionError> {
        // 1. Run the engine
        let report = self.evaluate(&cmd.state)?;

        // 2. Publish the summary event
        let event = self
            .publish(cmd.decision_id, &report, cmd.correlation_id.as_deref())
            .await?;

        Ok(EvaluateDecisionResult { report, event })
    }

    /// Runs the engine without publishing anything.
    pub fn evaluate(&self, state: &DecisionState) -> Result<DecisionReport, RankingError> {
        DecisionEvaluator::evaluate(state, &self.options)
    }

    /// Publishes `DecisionEvaluated` for a finished report.
    pub async fn publish(
        &self,
        decision_id: DecisionId,
        report: &DecisionReport,
        correlation_id: Option<&str>,
    ) -> Result<DecisionEvaluated, DomainError> {
        let event = DecisionEvaluated::from_report(decision_id, report);

        let mut envelope = event.to_envelope()?;
        if let Some(correlation_id) = correlation_id {
            envelope = envelope.with_correlation_id(correlation_id);
        }
        self.event_publisher.publish(envelope).await?;

        debug!(
            decision_id = %decision_id,
            winner = ?event.winner,
            "Published DecisionEvaluated event"
        );

        Ok(event)
    }
}
