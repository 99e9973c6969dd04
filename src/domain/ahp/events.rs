//! AHP domain events.
//!
//! Published after a decision has been evaluated so that other parts of the
//! system (dashboards, audit trails) can react without re-running the engine.

use serde::{Deserialize, Serialize};

use super::DecisionReport;
use crate::domain::foundation::{domain_event, AlternativeId, DecisionId, EventId, Percentage, Timestamp};

/// Final score of one alternative, as carried in events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeScore {
    pub alternative_id: AlternativeId,
    pub score: Percentage,
}

/// Published when a decision's alternatives have been ranked.
///
/// Carries a summary of the report, not the full matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEvaluated {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// The evaluated decision.
    pub decision_id: DecisionId,
    /// Top-ranked alternative (first declared on a tie).
    pub winner: Option<AlternativeId>,
    /// Scores in ranking order.
    pub final_scores: Vec<AlternativeScore>,
    /// Number of matrices with CR at or above the threshold.
    pub inconsistent_matrices: usize,
    /// Number of judgments derived from raw magnitudes.
    pub derived_judgments: usize,
    pub evaluated_at: Timestamp,
}

impl DecisionEvaluated {
    /// Summarizes a report into an event.
    pub fn from_report(decision_id: DecisionId, report: &DecisionReport) -> Self {
        Self {
            event_id: EventId::new(),
            decision_id,
            winner: report.winner().map(|w| w.alternative_id.clone()),
            final_scores: report
                .ranking
                .iter()
                .map(|r| AlternativeScore {
                    alternative_id: r.alternative_id.clone(),
                    score: r.score,
                })
                .collect(),
            inconsistent_matrices: report.consistency_warnings.len(),
            derived_judgments: report.derived_judgments.len(),
            evaluated_at: Timestamp::now(),
        }
    }
}

domain_event!(
    DecisionEvaluated,
    event_type = "ahp.decision_evaluated",
    schema_version = 1,
    aggregate_id = decision_id,
    aggregate_type = "Decision",
    occurred_at = evaluated_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ahp::{DecisionEvaluator, DecisionState, EvaluationOptions};
    use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};

    fn report() -> DecisionReport {
        let state = DecisionState::builder()
            .criterion("price", "Price")
            .alternative("cheap", "Cheap")
            .alternative("pricey", "Pricey")
            .criterion_alternative_judgment("price", "cheap", "pricey", 4.0)
            .build()
            .unwrap();
        DecisionEvaluator::evaluate(&state, &EvaluationOptions::default()).unwrap()
    }

    #[test]
    fn from_report_summarizes_ranking() {
        let event = DecisionEvaluated::from_report(DecisionId::new(), &report());

        assert_eq!(event.winner, Some(AlternativeId::new("cheap").unwrap()));
        assert_eq!(event.final_scores.len(), 2);
        assert!((event.final_scores[0].score.value() - 80.0).abs() < 1e-9);
        assert_eq!(event.inconsistent_matrices, 0);
        assert_eq!(event.derived_judgments, 0);
    }

    #[test]
    fn implements_domain_event() {
        let decision_id = DecisionId::new();
        let event = DecisionEvaluated::from_report(decision_id, &report());

        assert_eq!(event.event_type(), "ahp.decision_evaluated");
        assert_eq!(event.schema_version(), 1);
        assert_eq!(event.aggregate_type(), "Decision");
        assert_eq!(event.aggregate_id(), decision_id.to_string());
    }

    #[test]
    fn envelope_payload_round_trips() {
        let event = DecisionEvaluated::from_report(DecisionId::new(), &report());
        let envelope = event.to_envelope().unwrap();

        let back: DecisionEvaluated = envelope.payload_as().unwrap();
        assert_eq!(back.winner, event.winner);
        assert_eq!(back.final_scores, event.final_scores);
    }
}
