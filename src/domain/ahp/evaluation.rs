//! Decision evaluation - aggregation, ranking and consistency warnings in one pass.

use serde::Serialize;

use super::{
    AggregationOptions, AlternativeScope, ConsistencyMetrics, CriterionBranch, DecisionState,
    DerivedJudgment, HierarchyAggregator, MatrixEvaluation, RankedAlternative, RankingError,
    RankingSynthesizer, ScopedEvaluation, WeightedTable, CONSISTENCY_THRESHOLD,
};
use crate::domain::foundation::{AlternativeId, CriterionId, SubCriterionId};

/// Settings for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    pub consistency_threshold: f64,
    pub derive_from_magnitudes: bool,
    /// Decimal places of `formatted_score`.
    pub score_decimals: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            consistency_threshold: CONSISTENCY_THRESHOLD,
            derive_from_magnitudes: true,
            score_decimals: 2,
        }
    }
}

impl EvaluationOptions {
    fn aggregation(&self) -> AggregationOptions {
        AggregationOptions {
            consistency_threshold: self.consistency_threshold,
            derive_from_magnitudes: self.derive_from_magnitudes,
        }
    }
}

/// Identifies one judgment matrix of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "id", rename_all = "snake_case")]
pub enum MatrixScope {
    Criteria,
    SubCriteria(CriterionId),
    Alternatives(AlternativeScope),
}

/// A matrix whose consistency ratio reached the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyWarning {
    pub matrix: MatrixScope,
    pub consistency_ratio: f64,
}

/// Complete outcome of evaluating a decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionReport {
    pub criteria: MatrixEvaluation<CriterionId>,
    pub branches: Vec<CriterionBranch>,
    pub alternative_evaluations: Vec<ScopedEvaluation>,
    pub weighted_table: WeightedTable,
    pub ranking: Vec<RankedAlternative>,
    pub derived_judgments: Vec<DerivedJudgment>,
    pub consistency_warnings: Vec<ConsistencyWarning>,
}

impl DecisionReport {
    /// The top-ranked alternative.
    pub fn winner(&self) -> Option<&RankedAlternative> {
        self.ranking.first()
    }

    /// Final score fraction per alternative, in ranking order.
    pub fn final_scores(&self) -> Vec<(AlternativeId, f64)> {
        self.ranking
            .iter()
            .map(|r| (r.alternative_id.clone(), r.score.as_fraction()))
            .collect()
    }

    pub fn branch(&self, criterion: &CriterionId) -> Option<&CriterionBranch> {
        self.branches.iter().find(|b| &b.criterion_id == criterion)
    }

    pub fn sub_criteria_evaluation(&self, criterion: &CriterionId) -> Option<&MatrixEvaluation<SubCriterionId>> {
        self.branch(criterion).and_then(|b| b.sub_criteria.as_ref())
    }

    pub fn alternative_evaluation(&self, scope: &AlternativeScope) -> Option<&MatrixEvaluation<AlternativeId>> {
        self.alternative_evaluations
            .iter()
            .find(|e| &e.scope == scope)
            .map(|e| &e.evaluation)
    }

    /// Returns true if every solved matrix is below the consistency threshold.
    pub fn is_consistent(&self) -> bool {
        self.consistency_warnings.is_empty()
    }
}

/// Runs the whole engine over a decision snapshot.
pub struct DecisionEvaluator;

impl DecisionEvaluator {
    /// Evaluates the decision and ranks its alternatives.
    ///
    /// Incomplete or inconsistent judgments never fail the evaluation; they
    /// are reported through completeness, warnings and derived judgments.
    ///
    /// # Errors
    ///
    /// Returns `NoAlternatives` when the decision has no alternatives.
    pub fn evaluate(state: &DecisionState, options: &EvaluationOptions) -> Result<DecisionReport, RankingError> {
        if state.alternatives().is_empty() {
            tracing::warn!("evaluation requested for a decision without alternatives");
            return Err(RankingError::NoAlternatives);
        }

        let hierarchy = HierarchyAggregator::aggregate(state, &options.aggregation());
        let ranking = RankingSynthesizer::rank(
            state.alternatives(),
            &hierarchy.weighted_table,
            options.score_decimals,
        )?;

        let consistency_warnings = collect_warnings(
            &hierarchy.criteria.consistency,
            &hierarchy.branches,
            &hierarchy.alternative_evaluations,
        );
        for warning in &consistency_warnings {
            tracing::warn!(
                matrix = ?warning.matrix,
                consistency_ratio = warning.consistency_ratio,
                "judgments are inconsistent"
            );
        }

        tracing::debug!(
            criteria = state.criteria().len(),
            alternatives = state.alternatives().len(),
            derived = hierarchy.derived_judgments.len(),
            "decision evaluated"
        );

        Ok(DecisionReport {
            criteria: hierarchy.criteria,
            branches: hierarchy.branches,
            alternative_evaluations: hierarchy.alternative_evaluations,
            weighted_table: hierarchy.weighted_table,
            ranking,
            derived_judgments: hierarchy.derived_judgments,
            consistency_warnings,
        })
    }
}

fn collect_warnings(
    criteria: &ConsistencyMetrics,
    branches: &[CriterionBranch],
    alternatives: &[ScopedEvaluation],
) -> Vec<ConsistencyWarning> {
    let mut warnings = Vec::new();
    let mut check = |matrix: MatrixScope, metrics: &ConsistencyMetrics| {
        if !metrics.is_consistent {
            warnings.push(ConsistencyWarning {
                matrix,
                consistency_ratio: metrics.consistency_ratio,
            });
        }
    };

    check(MatrixScope::Criteria, criteria);
    for branch in branches {
        if let Some(subs) = &branch.sub_criteria {
            check(MatrixScope::SubCriteria(branch.criterion_id.clone()), &subs.consistency);
        }
    }
    for scoped in alternatives {
        check(MatrixScope::Alternatives(scoped.scope.clone()), &scoped.evaluation.consistency);
    }
    warnings
}
