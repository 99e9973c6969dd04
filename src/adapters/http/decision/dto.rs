//! HTTP DTOs (Data Transfer Objects) for decision endpoints.
//!
//! Field names are camelCase to match the JSON contract consumed by the
//! presentation layer. Judgment maps use composite string keys such as
//! `"price-comfort"`; `input.rs` resolves them against declared ids.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ahp::{
    AlternativeScope, CompositionMode, ConsistencyWarning, DecisionReport,
    DerivedJudgment, MagnitudeDirection, MatrixEvaluation, MatrixScope, PriorityVector,
    RankedAlternative, WeightedTable,
};
use crate::domain::foundation::{AlternativeId, CriterionId, DomainError, SubCriterionId};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A criterion or alternative as declared by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDto {
    pub id: String,
    pub name: String,
}

/// A sub-criterion and the criterion it refines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCriterionDto {
    pub id: String,
    pub name: String,
    pub criterion_id: String,
}

/// Whether a criterion's raw magnitudes are a benefit or a cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionKind {
    Benefit,
    Cost,
}

impl From<CriterionKind> for MagnitudeDirection {
    fn from(kind: CriterionKind) -> Self {
        match kind {
            CriterionKind::Benefit => MagnitudeDirection::HigherIsBetter,
            CriterionKind::Cost => MagnitudeDirection::LowerIsBetter,
        }
    }
}

/// One raw magnitude: a single measurement or several samples.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MagnitudeInput {
    Single(f64),
    Samples(Vec<f64>),
}

/// Request to evaluate a decision snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateDecisionRequest {
    /// Existing decision to attribute the evaluation to; a new id is minted when absent.
    #[serde(default)]
    pub decision_id: Option<String>,
    #[serde(default)]
    pub criteria: Vec<EntityDto>,
    #[serde(default)]
    pub sub_criteria: Vec<SubCriterionDto>,
    #[serde(default)]
    pub alternatives: Vec<EntityDto>,
    /// `"idA-idB"` to value.
    #[serde(default)]
    pub criteria_judgments: BTreeMap<String, f64>,
    /// `"criterionId-subA-subB"` to value.
    #[serde(default)]
    pub sub_criteria_judgments: BTreeMap<String, f64>,
    /// `"scopeId-altA-altB"`, scope being a sub-criterion or criterion.
    #[serde(default)]
    pub alternative_judgments: BTreeMap<String, f64>,
    /// `"scopeId-altId"` to a positive measurement, or a list of samples
    /// that is averaged.
    #[serde(default)]
    pub raw_magnitudes: BTreeMap<String, MagnitudeInput>,
    /// Scope id to `BENEFIT` or `COST`; cost when absent.
    #[serde(default)]
    pub criteria_config: BTreeMap<String, CriterionKind>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Consistency figures and the tables behind them, in the shape the UI
/// displays them. Matrix rows and columns follow `ids`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyResponse {
    pub lambda: f64,
    #[serde(rename = "CI")]
    pub ci: f64,
    #[serde(rename = "RI")]
    pub ri: f64,
    #[serde(rename = "CR")]
    pub cr: f64,
    pub is_consistent: bool,
    pub ids: Vec<String>,
    pub matrix_raw: Vec<Vec<f64>>,
    pub normalized_matrix: Vec<Vec<f64>>,
    pub weighted_matrix: Vec<Vec<f64>>,
    pub weighted_sums: Vec<f64>,
    /// `weightedSums[i] / eigenvector[i]`.
    pub ratios: Vec<f64>,
    pub eigenvector: Vec<f64>,
}

impl<Id: Clone + PartialEq + ToString> From<&MatrixEvaluation<Id>> for ConsistencyResponse {
    fn from(evaluation: &MatrixEvaluation<Id>) -> Self {
        let metrics = &evaluation.consistency;
        let worksheet = evaluation.worksheet.clone();
        Self {
            lambda: metrics.lambda_max,
            ci: metrics.consistency_index,
            ri: metrics.random_index,
            cr: metrics.consistency_ratio,
            is_consistent: metrics.is_consistent,
            ids: evaluation.priorities.ids().iter().map(ToString::to_string).collect(),
            matrix_raw: worksheet.raw_matrix,
            normalized_matrix: worksheet.normalized_matrix,
            weighted_matrix: worksheet.weighted_matrix,
            weighted_sums: worksheet.weighted_sums,
            ratios: worksheet.row_ratios,
            eigenvector: worksheet.eigenvector,
        }
    }
}

/// Priorities of one matrix plus how much of it was judged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritiesResponse<Id> {
    pub priorities: PriorityVector<Id>,
    pub answered_pairs: usize,
    pub total_pairs: usize,
}

impl<Id: Clone> From<&MatrixEvaluation<Id>> for PrioritiesResponse<Id> {
    fn from(evaluation: &MatrixEvaluation<Id>) -> Self {
        Self {
            priorities: evaluation.priorities.clone(),
            answered_pairs: evaluation.completeness.answered,
            total_pairs: evaluation.completeness.total,
        }
    }
}

/// Composed alternative weights under one criterion.
#[derive(Debug, Clone, Serialize)]
pub struct BranchResponse {
    #[serde(flatten)]
    pub mode: CompositionMode,
    pub weight: f64,
    pub priorities: PriorityVector<AlternativeId>,
}

/// One row of the ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntryResponse {
    pub rank: usize,
    pub id: String,
    pub name: String,
    /// Percentage in [0, 100].
    pub score: f64,
    pub formatted_score: String,
}

impl From<&RankedAlternative> for RankingEntryResponse {
    fn from(ranked: &RankedAlternative) -> Self {
        Self {
            rank: ranked.rank,
            id: ranked.alternative_id.to_string(),
            name: ranked.name.clone(),
            score: ranked.score.value(),
            formatted_score: ranked.formatted_score.clone(),
        }
    }
}

/// An alternative judgment the engine filled in from raw magnitudes.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedJudgmentResponse {
    /// Same composite form as `alternativeJudgments` keys.
    pub key: String,
    pub scope: AlternativeScope,
    pub value: f64,
}

impl From<&DerivedJudgment> for DerivedJudgmentResponse {
    fn from(derived: &DerivedJudgment) -> Self {
        Self {
            key: format!("{}-{}-{}", derived.scope.id_str(), derived.a, derived.b),
            scope: derived.scope.clone(),
            value: derived.value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyWarningResponse {
    pub matrix: MatrixScope,
    pub consistency_ratio: f64,
}

impl From<&ConsistencyWarning> for ConsistencyWarningResponse {
    fn from(warning: &ConsistencyWarning) -> Self {
        Self {
            matrix: warning.matrix.clone(),
            consistency_ratio: warning.consistency_ratio,
        }
    }
}

/// Response for a decision evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateDecisionResponse {
    pub decision_id: String,
    pub criteria_priorities: PriorityVector<CriterionId>,
    pub criteria_consistency: ConsistencyResponse,
    /// Alternative priorities under each sub-criterion, keyed by sub-criterion id.
    pub sub_criterion_priorities: BTreeMap<String, PrioritiesResponse<AlternativeId>>,
    pub sub_criterion_consistency: BTreeMap<String, ConsistencyResponse>,
    /// Sub-criteria weights under each criterion, keyed by criterion id.
    pub sub_criteria_priorities: BTreeMap<String, PrioritiesResponse<SubCriterionId>>,
    pub sub_criteria_consistency: BTreeMap<String, ConsistencyResponse>,
    /// Composed alternative weights per criterion.
    pub alternative_priorities: BTreeMap<String, BranchResponse>,
    pub ranking: Vec<RankingEntryResponse>,
    pub weighted_table: WeightedTable,
    pub derived_judgments: Vec<DerivedJudgmentResponse>,
    pub consistency_warnings: Vec<ConsistencyWarningResponse>,
    /// Input entries that were ignored, with the reason.
    pub warnings: Vec<String>,
}

impl EvaluateDecisionResponse {
    pub fn from_report(decision_id: String, report: &DecisionReport, warnings: Vec<String>) -> Self {
        let mut sub_criterion_priorities: BTreeMap<String, PrioritiesResponse<AlternativeId>> =
            BTreeMap::new();
        let mut sub_criterion_consistency: BTreeMap<String, ConsistencyResponse> = BTreeMap::new();
        for scoped in &report.alternative_evaluations {
            if let AlternativeScope::SubCriterion(id) = &scoped.scope {
                sub_criterion_priorities.insert(id.to_string(), (&scoped.evaluation).into());
                sub_criterion_consistency
                    .insert(id.to_string(), (&scoped.evaluation).into());
            }
        }

        let mut sub_criteria_priorities: BTreeMap<String, PrioritiesResponse<SubCriterionId>> =
            BTreeMap::new();
        let mut sub_criteria_consistency: BTreeMap<String, ConsistencyResponse> = BTreeMap::new();
        let mut alternative_priorities = BTreeMap::new();
        for branch in &report.branches {
            let key = branch.criterion_id.to_string();
            if let Some(evaluation) = &branch.sub_criteria {
                sub_criteria_priorities.insert(key.clone(), evaluation.into());
                sub_criteria_consistency.insert(key.clone(), evaluation.into());
            }
            alternative_priorities.insert(
                key,
                BranchResponse {
                    mode: branch.mode,
                    weight: branch.weight,
                    priorities: branch.composed.clone(),
                },
            );
        }

        Self {
            decision_id,
            criteria_priorities: report.criteria.priorities.clone(),
            criteria_consistency: (&report.criteria).into(),
            sub_criterion_priorities,
            sub_criterion_consistency,
            sub_criteria_priorities,
            sub_criteria_consistency,
            alternative_priorities,
            ranking: report.ranking.iter().map(Into::into).collect(),
            weighted_table: report.weighted_table.clone(),
            derived_judgments: report.derived_judgments.iter().map(Into::into).collect(),
            consistency_warnings: report.consistency_warnings.iter().map(Into::into).collect(),
            warnings,
        }
    }
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unprocessable(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        let details = if error.details.is_empty() {
            None
        } else {
            serde_json::to_value(&error.details).ok()
        };
        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            details,
        }
    }
}
