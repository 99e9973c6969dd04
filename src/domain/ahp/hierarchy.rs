//! Hierarchy Aggregator - composes priorities across criteria, sub-criteria and alternatives.
//!
//! One judgment matrix is solved for the criteria, one per criterion for its
//! sub-criteria and one per alternative scope. Priorities are multiplied down
//! the tree into a weighted table of (alternative, criterion) scores.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::Display;

use super::{
    AlternativeScope, Completeness, ConsistencyEvaluator, ConsistencyMetrics, ConsistencyWorksheet,
    DecisionState, Judgment, JudgmentMatrix, JudgmentTable, PrioritySolver, PriorityVector,
    CONSISTENCY_THRESHOLD,
};
use crate::domain::foundation::{AlternativeId, CriterionId, SubCriterionId};

/// Knobs for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationOptions {
    /// CR at or above which a matrix is flagged inconsistent.
    pub consistency_threshold: f64,
    /// Fill unset alternative judgments from raw magnitudes.
    pub derive_from_magnitudes: bool,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            consistency_threshold: CONSISTENCY_THRESHOLD,
            derive_from_magnitudes: true,
        }
    }
}

/// Priorities and diagnostics of one solved matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixEvaluation<Id> {
    pub priorities: PriorityVector<Id>,
    pub consistency: ConsistencyMetrics,
    /// Tables the consistency figures were computed from.
    pub worksheet: ConsistencyWorksheet,
    /// Explicitly judged pairs out of all pairs.
    pub completeness: Completeness,
}

/// Alternative priorities under one scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopedEvaluation {
    pub scope: AlternativeScope,
    pub evaluation: MatrixEvaluation<AlternativeId>,
}

/// Why a branch fell back to equal alternative weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniformReason {
    TooFewAlternatives,
    TooFewSubCriteria,
}

/// How the alternative weights of a criterion were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompositionMode {
    /// Alternatives compared directly under the criterion.
    Direct,
    /// Sub-criteria priorities times alternative priorities under each sub-criterion.
    SubCriteria,
    /// Equal split, no meaningful comparison possible.
    Uniform { reason: UniformReason },
}

/// Composition result for one top-level criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionBranch {
    pub criterion_id: CriterionId,
    /// The criterion's priority among all criteria.
    pub weight: f64,
    pub mode: CompositionMode,
    /// Present when the criterion has at least two sub-criteria.
    pub sub_criteria: Option<MatrixEvaluation<SubCriterionId>>,
    /// Alternative weights under this criterion; sums to 1.
    pub composed: PriorityVector<AlternativeId>,
}

/// An alternative judgment filled in from raw magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedJudgment {
    pub scope: AlternativeScope,
    pub a: AlternativeId,
    pub b: AlternativeId,
    pub value: f64,
}

/// Weighted scores keyed by (alternative, criterion), in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightedTable {
    alternatives: Vec<AlternativeId>,
    criteria: Vec<CriterionId>,
    values: BTreeMap<(AlternativeId, CriterionId), f64>,
}

impl WeightedTable {
    pub fn new(alternatives: Vec<AlternativeId>, criteria: Vec<CriterionId>) -> Self {
        Self {
            alternatives,
            criteria,
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, alternative: AlternativeId, criterion: CriterionId, value: f64) {
        self.values.insert((alternative, criterion), value);
    }

    /// Weighted score of an alternative under a criterion, zero if absent.
    pub fn get(&self, alternative: &AlternativeId, criterion: &CriterionId) -> f64 {
        self.values
            .get(&(alternative.clone(), criterion.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of an alternative's weighted scores across all criteria.
    pub fn row_total(&self, alternative: &AlternativeId) -> f64 {
        self.criteria
            .iter()
            .map(|criterion| self.get(alternative, criterion))
            .sum()
    }

    pub fn alternatives(&self) -> &[AlternativeId] {
        &self.alternatives
    }

    pub fn criteria(&self) -> &[CriterionId] {
        &self.criteria
    }
}

struct WeightedRow<'a> {
    table: &'a WeightedTable,
    alternative: &'a AlternativeId,
}

impl Serialize for WeightedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.criteria.len()))?;
        for criterion in &self.table.criteria {
            map.serialize_entry(criterion, &self.table.get(self.alternative, criterion))?;
        }
        map.end()
    }
}

impl Serialize for WeightedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.alternatives.len()))?;
        for alternative in &self.alternatives {
            map.serialize_entry(
                alternative,
                &WeightedRow {
                    table: self,
                    alternative,
                },
            )?;
        }
        map.end()
    }
}

/// Everything the aggregator computed for one decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyResult {
    pub criteria: MatrixEvaluation<CriterionId>,
    pub branches: Vec<CriterionBranch>,
    pub alternative_evaluations: Vec<ScopedEvaluation>,
    pub weighted_table: WeightedTable,
    pub derived_judgments: Vec<DerivedJudgment>,
}

impl HierarchyResult {
    pub fn branch(&self, criterion: &CriterionId) -> Option<&CriterionBranch> {
        self.branches.iter().find(|b| &b.criterion_id == criterion)
    }

    pub fn alternative_evaluation(&self, scope: &AlternativeScope) -> Option<&MatrixEvaluation<AlternativeId>> {
        self.alternative_evaluations
            .iter()
            .find(|e| &e.scope == scope)
            .map(|e| &e.evaluation)
    }
}

/// Stateless aggregator over a `DecisionState` snapshot.
pub struct HierarchyAggregator;

impl HierarchyAggregator {
    /// Solves every matrix of the hierarchy and composes the weighted table.
    ///
    /// Never fails: missing judgments default to indifference and degenerate
    /// branches fall back to a uniform split.
    pub fn aggregate(state: &DecisionState, options: &AggregationOptions) -> HierarchyResult {
        let criterion_ids = state.criterion_ids();
        let alternative_ids = state.alternative_ids();

        let (criteria, _) = solve(
            &criterion_ids,
            Some(state.criteria_judgments()),
            |a, b| state.criteria_judgments().get(a, b).map(Judgment::explicit),
            options.consistency_threshold,
        );

        let mut branches = Vec::with_capacity(criterion_ids.len());
        let mut alternative_evaluations = Vec::new();
        let mut derived_judgments = Vec::new();
        let mut weighted_table = WeightedTable::new(alternative_ids.clone(), criterion_ids.clone());

        for criterion_id in &criterion_ids {
            let sub_ids = state.sub_criterion_ids_of(criterion_id);

            let sub_criteria = (sub_ids.len() >= 2).then(|| {
                let table = state.sub_criteria_judgments(criterion_id);
                solve(
                    &sub_ids,
                    table,
                    |a, b| table.and_then(|t| t.get(a, b)).map(Judgment::explicit),
                    options.consistency_threshold,
                )
                .0
            });

            let mut solve_scope = |scope: AlternativeScope| {
                let (evaluation, matrix) = solve_alternatives(state, &scope, &alternative_ids, options);
                derived_judgments.extend(matrix.derived_pairs().into_iter().map(|(a, b, value)| {
                    DerivedJudgment {
                        scope: scope.clone(),
                        a,
                        b,
                        value,
                    }
                }));
                alternative_evaluations.push(ScopedEvaluation {
                    scope,
                    evaluation: evaluation.clone(),
                });
                evaluation.priorities
            };

            let (mode, composed) = if alternative_ids.len() < 2 {
                (
                    CompositionMode::Uniform {
                        reason: UniformReason::TooFewAlternatives,
                    },
                    PriorityVector::uniform(&alternative_ids),
                )
            } else if sub_ids.is_empty() {
                let priorities = solve_scope(AlternativeScope::Criterion(criterion_id.clone()));
                (CompositionMode::Direct, priorities)
            } else if let Some(subs) = &sub_criteria {
                let under_subs: Vec<(SubCriterionId, PriorityVector<AlternativeId>)> = sub_ids
                    .iter()
                    .map(|sub| (sub.clone(), solve_scope(AlternativeScope::SubCriterion(sub.clone()))))
                    .collect();
                (
                    CompositionMode::SubCriteria,
                    Self::compose(&subs.priorities, &under_subs, &alternative_ids),
                )
            } else {
                (
                    CompositionMode::Uniform {
                        reason: UniformReason::TooFewSubCriteria,
                    },
                    PriorityVector::uniform(&alternative_ids),
                )
            };

            let weight = criteria.priorities.weight(criterion_id);
            for (alternative, alternative_weight) in composed.iter() {
                weighted_table.set(alternative.clone(), criterion_id.clone(), weight * alternative_weight);
            }

            tracing::debug!(
                criterion = %criterion_id,
                weight,
                mode = ?mode,
                "composed criterion branch"
            );

            branches.push(CriterionBranch {
                criterion_id: criterion_id.clone(),
                weight,
                mode,
                sub_criteria,
                composed,
            });
        }

        HierarchyResult {
            criteria,
            branches,
            alternative_evaluations,
            weighted_table,
            derived_judgments,
        }
    }

    /// Combines alternative priorities under each sub-criterion into one
    /// vector for the parent criterion: `Σ_sub p(sub) · p(alt | sub)`.
    pub fn compose(
        sub_priorities: &PriorityVector<SubCriterionId>,
        under_subs: &[(SubCriterionId, PriorityVector<AlternativeId>)],
        alternatives: &[AlternativeId],
    ) -> PriorityVector<AlternativeId> {
        let entries = alternatives
            .iter()
            .map(|alternative| {
                let weight = under_subs
                    .iter()
                    .map(|(sub, priorities)| sub_priorities.weight(sub) * priorities.weight(alternative))
                    .sum();
                (alternative.clone(), weight)
            })
            .collect();
        PriorityVector::from_entries(entries)
    }
}

fn solve<Id, F>(
    ids: &[Id],
    table: Option<&JudgmentTable<Id>>,
    lookup: F,
    threshold: f64,
) -> (MatrixEvaluation<Id>, JudgmentMatrix<Id>)
where
    Id: Clone + Ord + Display,
    F: Fn(&Id, &Id) -> Option<Judgment>,
{
    let matrix = JudgmentMatrix::build(ids, lookup);
    let priorities = PrioritySolver::solve(&matrix);
    let consistency = ConsistencyEvaluator::evaluate_with_threshold(&matrix, &priorities, threshold);
    let worksheet = ConsistencyWorksheet::compute(&matrix, &priorities);
    let completeness = match table {
        Some(table) => table.completeness(ids),
        None => JudgmentTable::new().completeness(ids),
    };
    (
        MatrixEvaluation {
            priorities,
            consistency,
            worksheet,
            completeness,
        },
        matrix,
    )
}

fn solve_alternatives(
    state: &DecisionState,
    scope: &AlternativeScope,
    alternative_ids: &[AlternativeId],
    options: &AggregationOptions,
) -> (MatrixEvaluation<AlternativeId>, JudgmentMatrix<AlternativeId>) {
    let table = state.alternative_judgments(scope);
    let magnitudes = state
        .magnitudes(scope)
        .filter(|_| options.derive_from_magnitudes);

    solve(
        alternative_ids,
        table,
        |a, b| {
            table
                .and_then(|t| t.get(a, b))
                .map(Judgment::explicit)
                .or_else(|| magnitudes.and_then(|m| m.derive(a, b)).map(Judgment::derived))
        },
        options.consistency_threshold,
    )
}
