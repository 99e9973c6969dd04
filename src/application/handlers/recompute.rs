//! RecomputeScheduler - debounced re-evaluation of a changing decision.
//!
//! Editors submit a new `DecisionState` on every change. The scheduler waits
//! for a quiet window and evaluates only the latest snapshot; anything
//! superseded in the meantime is dropped (last write wins). A result that
//! completes after a newer submission is never delivered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{EvaluateDecisionError, EvaluateDecisionHandler};
use crate::domain::ahp::{DecisionReport, DecisionState};
use crate::domain::foundation::DecisionId;

/// Result of one completed recomputation.
#[derive(Debug, Clone)]
pub struct RecomputeOutcome {
    /// Submission number that produced this outcome (1-based).
    pub generation: u64,
    pub result: Result<DecisionReport, EvaluateDecisionError>,
}

/// Debounces evaluation requests for one decision.
///
/// Must be used from within a Tokio runtime.
pub struct RecomputeScheduler {
    handler: Arc<EvaluateDecisionHandler>,
    decision_id: DecisionId,
    window: Duration,
    generation: Arc<AtomicU64>,
    outcomes: Arc<watch::Sender<Option<RecomputeOutcome>>>,
}

impl RecomputeScheduler {
    pub fn new(handler: Arc<EvaluateDecisionHandler>, decision_id: DecisionId, window: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            handler,
            decision_id,
            window,
            generation: Arc::new(AtomicU64::new(0)),
            outcomes: Arc::new(sender),
        }
    }

    /// Receiver that observes the latest published outcome.
    pub fn subscribe(&self) -> watch::Receiver<Option<RecomputeOutcome>> {
        self.outcomes.subscribe()
    }

    /// Number of the most recent submission.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Schedules evaluation of `state` after the quiet window.
    ///
    /// Returns the generation assigned to this submission. Only the highest
    /// generation alive when its window elapses is evaluated.
    pub fn submit(&self, state: DecisionState) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let handler = Arc::clone(&self.handler);
        let outcomes = Arc::clone(&self.outcomes);
        let decision_id = self.decision_id;
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "recompute superseded before start");
                return;
            }

            let report = handler.evaluate(&state);
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "discarding stale recompute result");
                return;
            }

            let result = match report {
                Ok(report) => match handler.publish(decision_id, &report, None).await {
                    Ok(_) => Ok(report),
                    Err(err) => {
                        warn!(generation, error = %err, "recompute event not published");
                        Err(EvaluateDecisionError::from(err))
                    }
                },
                Err(err) => Err(EvaluateDecisionError::from(err)),
            };

            // A newer submission may have been made while publishing.
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "discarding recompute result superseded during publish");
                return;
            }

            let outcome = RecomputeOutcome { generation, result };
            outcomes.send_if_modified(|current| {
                if current.as_ref().is_some_and(|seen| seen.generation >= generation) {
                    return false;
                }
                *current = Some(outcome);
                true
            });
        });

        generation
    }
}
