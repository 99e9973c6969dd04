//! Ranking Synthesizer - final scores and ordering of alternatives.

use serde::Serialize;
use thiserror::Error;

use super::{Alternative, WeightedTable};
use crate::domain::foundation::{AlternativeId, Percentage};

/// Failures that make a ranking request meaningless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("No alternatives to rank")]
    NoAlternatives,
}

/// One entry of the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAlternative {
    /// 1-based position.
    pub rank: usize,
    pub alternative_id: AlternativeId,
    pub name: String,
    pub score: Percentage,
    pub formatted_score: String,
}

/// Turns weighted scores into an ordered ranking.
pub struct RankingSynthesizer;

impl RankingSynthesizer {
    /// Final score per alternative (sum over criteria), in declaration order.
    pub fn final_scores(alternatives: &[Alternative], weighted: &WeightedTable) -> Vec<(AlternativeId, f64)> {
        alternatives
            .iter()
            .map(|alternative| (alternative.id.clone(), weighted.row_total(&alternative.id)))
            .collect()
    }

    /// Ranks alternatives by final score, highest first.
    ///
    /// Equal scores keep declaration order, so the first-declared alternative
    /// wins a tie. `formatted_score` shows the percentage with `decimals`
    /// decimal places.
    ///
    /// # Errors
    ///
    /// Returns `NoAlternatives` when there is nothing to rank.
    pub fn rank(
        alternatives: &[Alternative],
        weighted: &WeightedTable,
        decimals: usize,
    ) -> Result<Vec<RankedAlternative>, RankingError> {
        if alternatives.is_empty() {
            return Err(RankingError::NoAlternatives);
        }

        let mut scored: Vec<(&Alternative, f64)> = alternatives
            .iter()
            .map(|alternative| (alternative, weighted.row_total(&alternative.id)))
            .collect();
        // sort_by is stable
        scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(index, (alternative, total))| {
                let score = Percentage::from_fraction(total);
                RankedAlternative {
                    rank: index + 1,
                    alternative_id: alternative.id.clone(),
                    name: alternative.name.clone(),
                    formatted_score: score.format(decimals),
                    score,
                }
            })
            .collect())
    }
}
