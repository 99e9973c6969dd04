//! AHP module - the Analytic Hierarchy Process computation engine.
//!
//! Pure, synchronous and free of I/O. Every computation takes an immutable
//! [`DecisionState`] snapshot and returns a new result value.
//!
//! # Pipeline
//!
//! 1. [`JudgmentMatrix`] - reciprocal matrix per comparison set
//! 2. [`PrioritySolver`] - column-sum normalization and row averaging
//! 3. [`ConsistencyEvaluator`] - λmax, CI, RI, CR (advisory)
//! 4. [`HierarchyAggregator`] - criteria → sub-criteria → alternatives
//! 5. [`RankingSynthesizer`] - final scores and stable ordering
//!
//! [`DecisionEvaluator`] runs the whole pipeline.

mod consistency;
mod entities;
mod evaluation;
mod events;
mod hierarchy;
mod judgment;
mod magnitude;
mod matrix;
mod priority;
mod ranking;
mod scale;
mod state;

pub use consistency::{
    ConsistencyEvaluator, ConsistencyMetrics, ConsistencyWorksheet, CONSISTENCY_THRESHOLD,
    RANDOM_INDEX, RANDOM_INDEX_FALLBACK,
};
pub use entities::{Alternative, Criterion, SubCriterion};
pub use evaluation::{
    ConsistencyWarning, DecisionEvaluator, DecisionReport, EvaluationOptions, MatrixScope,
};
pub use events::{AlternativeScore, DecisionEvaluated};
pub use hierarchy::{
    AggregationOptions, CompositionMode, CriterionBranch, DerivedJudgment, HierarchyAggregator,
    HierarchyResult, MatrixEvaluation, ScopedEvaluation, UniformReason, WeightedTable,
};
pub use judgment::{Completeness, Judgment, JudgmentTable, Provenance};
pub use magnitude::{MagnitudeDirection, MagnitudeSeries};
pub use matrix::{CellSource, JudgmentMatrix, MatrixCell};
pub use priority::{PrioritySolver, PriorityVector};
pub use ranking::{RankedAlternative, RankingError, RankingSynthesizer};
pub use scale::{JudgmentValue, SaatyIntensity, MAX_JUDGMENT, MIN_JUDGMENT};
pub use state::{AlternativeScope, DecisionState, DecisionStateBuilder};
