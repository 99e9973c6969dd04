//! Consistency Evaluator - λmax, CI, RI and CR for a judgment matrix.
//!
//! The evaluation is advisory: an inconsistent matrix is flagged, never
//! rejected, and aggregation proceeds with its priorities unchanged.

use serde::{Deserialize, Serialize};

use super::{JudgmentMatrix, PrioritySolver, PriorityVector};

/// Saaty's random index for matrices of size 1 through 10.
pub const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

/// Random index used for n > 10.
///
/// This is the n = 10 value pinned as an approximation, not a derived constant.
pub const RANDOM_INDEX_FALLBACK: f64 = 1.49;

/// Conventional CR threshold at or above which judgments are unreliable.
pub const CONSISTENCY_THRESHOLD: f64 = 0.1;

/// Consistency diagnostics for one judgment matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyMetrics {
    pub size: usize,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub random_index: f64,
    pub consistency_ratio: f64,
    pub is_consistent: bool,
}

impl ConsistencyMetrics {
    /// Metrics of a matrix with nothing to be inconsistent about (n < 2).
    pub fn trivial(size: usize) -> Self {
        Self {
            size,
            lambda_max: size as f64,
            consistency_index: 0.0,
            random_index: ConsistencyEvaluator::random_index(size),
            consistency_ratio: 0.0,
            is_consistent: true,
        }
    }
}

/// Intermediate tables behind the consistency figures, in matrix order.
///
/// Rows and columns follow `JudgmentMatrix::ids()`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsistencyWorksheet {
    /// Reciprocal matrix as solved, unset cells read as 1.
    pub raw_matrix: Vec<Vec<f64>>,
    /// Each column divided by its sum.
    pub normalized_matrix: Vec<Vec<f64>>,
    /// `M[i][j] * p[j]`.
    pub weighted_matrix: Vec<Vec<f64>>,
    /// Row sums of the weighted matrix.
    pub weighted_sums: Vec<f64>,
    /// `weighted_sums[i] / p[i]`; their mean is λmax.
    pub row_ratios: Vec<f64>,
    /// The priority vector in matrix order.
    pub eigenvector: Vec<f64>,
}

impl ConsistencyWorksheet {
    pub fn compute<Id: Clone + PartialEq>(
        matrix: &JudgmentMatrix<Id>,
        priorities: &PriorityVector<Id>,
    ) -> Self {
        let n = matrix.size();
        let eigenvector: Vec<f64> = matrix.ids().iter().map(|id| priorities.weight(id)).collect();

        let weighted_matrix: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| matrix.value(i, j) * eigenvector[j]).collect())
            .collect();
        let weighted_sums: Vec<f64> = weighted_matrix.iter().map(|row| row.iter().sum()).collect();
        let row_ratios = weighted_sums
            .iter()
            .zip(&eigenvector)
            .map(|(sum, weight)| if *weight == 0.0 { 0.0 } else { sum / weight })
            .collect();

        Self {
            raw_matrix: matrix.values(),
            normalized_matrix: PrioritySolver::normalized(matrix),
            weighted_matrix,
            weighted_sums,
            row_ratios,
            eigenvector,
        }
    }
}

/// Computes consistency metrics from a matrix and its priority vector.
pub struct ConsistencyEvaluator;

impl ConsistencyEvaluator {
    /// Evaluates with the conventional 0.1 threshold.
    pub fn evaluate<Id: Clone + PartialEq>(
        matrix: &JudgmentMatrix<Id>,
        priorities: &PriorityVector<Id>,
    ) -> ConsistencyMetrics {
        Self::evaluate_with_threshold(matrix, priorities, CONSISTENCY_THRESHOLD)
    }

    /// Evaluates consistency, flagging the matrix when `CR >= threshold`.
    ///
    /// # Algorithm
    /// 1. `W[i][j] = M[i][j] * p[j]`
    /// 2. `rowRatio[i] = Σ_j W[i][j] / p[i]` (0 when `p[i] == 0`)
    /// 3. `λmax = mean(rowRatio)`
    /// 4. `CI = (λmax - n) / (n - 1)` for n ≥ 2, else 0
    /// 5. `CR = CI / RI` when `RI > 0`, else 0
    pub fn evaluate_with_threshold<Id: Clone + PartialEq>(
        matrix: &JudgmentMatrix<Id>,
        priorities: &PriorityVector<Id>,
        threshold: f64,
    ) -> ConsistencyMetrics {
        let n = matrix.size();
        if n < 2 {
            return ConsistencyMetrics::trivial(n);
        }

        let worksheet = ConsistencyWorksheet::compute(matrix, priorities);
        let lambda_max = worksheet.row_ratios.iter().sum::<f64>() / n as f64;

        let consistency_index = (lambda_max - n as f64) / (n as f64 - 1.0);
        let random_index = Self::random_index(n);
        let consistency_ratio = if random_index > 0.0 {
            consistency_index / random_index
        } else {
            0.0
        };

        ConsistencyMetrics {
            size: n,
            lambda_max,
            consistency_index,
            random_index,
            consistency_ratio,
            is_consistent: consistency_ratio < threshold,
        }
    }

    /// Random index for a matrix of size `n`.
    pub fn random_index(n: usize) -> f64 {
        match n {
            0 => 0.0,
            n if n <= RANDOM_INDEX.len() => RANDOM_INDEX[n - 1],
            _ => RANDOM_INDEX_FALLBACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ahp::{Judgment, JudgmentTable, JudgmentValue, PrioritySolver};
    use crate::domain::foundation::CriterionId;
    use proptest::prelude::*;

    fn cid(id: &str) -> CriterionId {
        CriterionId::new(id).unwrap()
    }

    fn abc() -> Vec<CriterionId> {
        vec![cid("A"), cid("B"), cid("C")]
    }

    fn evaluate(ids: &[CriterionId], entries: &[(&str, &str, f64)]) -> ConsistencyMetrics {
        let mut table = JudgmentTable::new();
        for (a, b, v) in entries {
            table
                .set(cid(a), cid(b), JudgmentValue::try_new(*v).unwrap())
                .unwrap();
        }
        let matrix = JudgmentMatrix::build(ids, |a, b| table.get(a, b).map(Judgment::explicit));
        let priorities = PrioritySolver::solve(&matrix);
        ConsistencyEvaluator::evaluate(&matrix, &priorities)
    }

    #[test]
    fn identity_matrix_is_perfectly_consistent() {
        let metrics = evaluate(&abc(), &[("A", "B", 1.0), ("A", "C", 1.0), ("B", "C", 1.0)]);

        assert!((metrics.lambda_max - 3.0).abs() < 1e-12);
        assert!(metrics.consistency_index.abs() < 1e-12);
        assert!(metrics.consistency_ratio.abs() < 1e-12);
        assert_eq!(metrics.random_index, 0.58);
        assert!(metrics.is_consistent);
    }

    #[test]
    fn single_ratio_scale_has_lambda_equal_to_n() {
        let metrics = evaluate(&abc(), &[("A", "B", 2.0), ("B", "C", 2.0), ("A", "C", 4.0)]);

        assert!((metrics.lambda_max - 3.0).abs() < 1e-12);
        assert!(metrics.consistency_index.abs() < 1e-12);
        assert!(metrics.consistency_ratio.abs() < 1e-12);
        assert!(metrics.is_consistent);
    }

    #[test]
    fn cyclic_preferences_are_flagged_inconsistent() {
        let metrics = evaluate(&abc(), &[("A", "B", 9.0), ("B", "C", 9.0), ("A", "C", 1.0 / 9.0)]);

        assert!(metrics.lambda_max > 10.0);
        assert!(metrics.consistency_ratio > 0.1);
        assert!((metrics.consistency_ratio - 6.13).abs() < 0.01);
        assert!(!metrics.is_consistent);
    }

    #[test]
    fn worksheet_rows_average_to_lambda_max() {
        let ids = abc();
        let mut table = JudgmentTable::new();
        for (a, b, v) in [("A", "B", 3.0), ("B", "C", 2.0), ("A", "C", 5.0)] {
            table.set(cid(a), cid(b), JudgmentValue::try_new(v).unwrap()).unwrap();
        }
        let matrix = JudgmentMatrix::build(&ids, |a, b| table.get(a, b).map(Judgment::explicit));
        let priorities = PrioritySolver::solve(&matrix);

        let worksheet = ConsistencyWorksheet::compute(&matrix, &priorities);
        let metrics = ConsistencyEvaluator::evaluate(&matrix, &priorities);

        assert_eq!(worksheet.raw_matrix, matrix.values());
        for j in 0..3 {
            let column: f64 = worksheet.normalized_matrix.iter().map(|row| row[j]).sum();
            assert!((column - 1.0).abs() < 1e-12);
        }
        for i in 0..3 {
            let row: f64 = worksheet.weighted_matrix[i].iter().sum();
            assert!((row - worksheet.weighted_sums[i]).abs() < 1e-12);
            assert!(
                (worksheet.row_ratios[i] - worksheet.weighted_sums[i] / worksheet.eigenvector[i])
                    .abs()
                    < 1e-12
            );
        }
        let mean = worksheet.row_ratios.iter().sum::<f64>() / 3.0;
        assert!((mean - metrics.lambda_max).abs() < 1e-12);
        assert_eq!(worksheet.eigenvector, priorities.iter().map(|(_, w)| w).collect::<Vec<_>>());
    }

    #[test]
    fn two_by_two_matrices_are_always_consistent() {
        let metrics = evaluate(&[cid("A"), cid("B")], &[("A", "B", 9.0)]);

        assert!((metrics.lambda_max - 2.0).abs() < 1e-12);
        assert_eq!(metrics.random_index, 0.0);
        assert_eq!(metrics.consistency_ratio, 0.0);
        assert!(metrics.is_consistent);
    }

    #[test]
    fn degenerate_sets_report_zero_ci() {
        let empty = evaluate(&[], &[]);
        assert_eq!(empty.size, 0);
        assert_eq!(empty.consistency_index, 0.0);
        assert!(empty.is_consistent);

        let single = evaluate(&[cid("A")], &[]);
        assert_eq!(single.lambda_max, 1.0);
        assert_eq!(single.consistency_ratio, 0.0);
    }

    #[test]
    fn custom_threshold_changes_the_verdict_only() {
        let ids = abc();
        let mut table = JudgmentTable::new();
        table.set(cid("A"), cid("B"), JudgmentValue::try_new(3.0).unwrap()).unwrap();
        table.set(cid("B"), cid("C"), JudgmentValue::try_new(3.0).unwrap()).unwrap();
        table.set(cid("A"), cid("C"), JudgmentValue::try_new(3.0).unwrap()).unwrap();
        let matrix = JudgmentMatrix::build(&ids, |a, b| table.get(a, b).map(Judgment::explicit));
        let priorities = PrioritySolver::solve(&matrix);

        let lenient = ConsistencyEvaluator::evaluate_with_threshold(&matrix, &priorities, 1.0);
        let strict = ConsistencyEvaluator::evaluate_with_threshold(&matrix, &priorities, 1e-6);

        assert_eq!(lenient.consistency_ratio, strict.consistency_ratio);
        assert!(lenient.is_consistent);
        assert!(!strict.is_consistent);
    }

    #[test]
    fn random_index_table_and_fallback() {
        assert_eq!(ConsistencyEvaluator::random_index(0), 0.0);
        assert_eq!(ConsistencyEvaluator::random_index(1), 0.0);
        assert_eq!(ConsistencyEvaluator::random_index(4), 0.90);
        assert_eq!(ConsistencyEvaluator::random_index(10), 1.49);
        assert_eq!(ConsistencyEvaluator::random_index(15), RANDOM_INDEX_FALLBACK);
    }

    proptest! {
        // Judgments taken from a weight vector are perfectly consistent.
        #[test]
        fn ratio_derived_judgments_have_zero_cr(
            weights in proptest::collection::vec(1.0f64..=3.0, 3..=6),
        ) {
            let ids: Vec<CriterionId> =
                (0..weights.len()).map(|i| cid(&format!("c{}", i))).collect();
            let mut table = JudgmentTable::new();
            for i in 0..ids.len() {
                for j in (i + 1)..ids.len() {
                    let value = JudgmentValue::try_new(weights[i] / weights[j]).unwrap();
                    table.set(ids[i].clone(), ids[j].clone(), value).unwrap();
                }
            }
            let matrix = JudgmentMatrix::build(&ids, |a, b| table.get(a, b).map(Judgment::explicit));
            let metrics = ConsistencyEvaluator::evaluate(&matrix, &PrioritySolver::solve(&matrix));

            prop_assert!(metrics.consistency_ratio.abs() < 1e-9);
            prop_assert!(metrics.is_consistent);
        }
    }
}
