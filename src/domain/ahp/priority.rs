//! Priority Vector Solver - approximate principal eigenvector by column normalization.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use super::JudgmentMatrix;

/// Weights for the entities of one comparison set, in matrix order.
///
/// Weights are non-negative and sum to 1 for any non-empty set.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityVector<Id> {
    entries: Vec<(Id, f64)>,
}

impl<Id> Default for PriorityVector<Id> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<Id: Clone + PartialEq> PriorityVector<Id> {
    /// Creates a vector from `(id, weight)` pairs as given.
    pub fn from_entries(entries: Vec<(Id, f64)>) -> Self {
        Self { entries }
    }

    /// Equal weight `1/n` for each id; empty for no ids.
    pub fn uniform(ids: &[Id]) -> Self {
        if ids.is_empty() {
            return Self::default();
        }
        let weight = 1.0 / ids.len() as f64;
        Self {
            entries: ids.iter().map(|id| (id.clone(), weight)).collect(),
        }
    }

    /// Weight for an id, if present.
    pub fn get(&self, id: &Id) -> Option<f64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, weight)| *weight)
    }

    /// Weight for an id, zero if absent.
    pub fn weight(&self, id: &Id) -> f64 {
        self.get(id).unwrap_or(0.0)
    }

    /// Iterates `(id, weight)` in matrix order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, f64)> {
        self.entries.iter().map(|(id, weight)| (id, *weight))
    }

    /// Ids in matrix order.
    pub fn ids(&self) -> Vec<Id> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Number of weighted entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights (1 within floating-point tolerance when non-empty).
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, weight)| weight).sum()
    }

    /// Copies the weights into an id-ordered map.
    pub fn to_map(&self) -> BTreeMap<Id, f64>
    where
        Id: Ord,
    {
        self.entries.iter().cloned().collect()
    }
}

impl<Id: Serialize> Serialize for PriorityVector<Id> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, weight) in &self.entries {
            map.serialize_entry(id, weight)?;
        }
        map.end()
    }
}

/// Derives priority vectors from judgment matrices.
pub struct PrioritySolver;

impl PrioritySolver {
    /// Computes the priority vector of a judgment matrix.
    ///
    /// # Algorithm
    /// 1. `colSum[j] = Σ_i M[i][j]`
    /// 2. `N[i][j] = M[i][j] / colSum[j]`
    /// 3. `p[i] = (Σ_j N[i][j]) / n`
    ///
    /// # Edge Cases
    /// - Empty matrix: empty vector
    /// - Single entity: weight 1.0
    pub fn solve<Id: Clone + PartialEq>(matrix: &JudgmentMatrix<Id>) -> PriorityVector<Id> {
        let n = matrix.size();
        match n {
            0 => return PriorityVector::default(),
            1 => return PriorityVector::from_entries(vec![(matrix.ids()[0].clone(), 1.0)]),
            _ => {}
        }

        let normalized = Self::normalized(matrix);
        let entries = matrix
            .ids()
            .iter()
            .zip(&normalized)
            .map(|(id, row)| (id.clone(), row.iter().sum::<f64>() / n as f64))
            .collect();

        PriorityVector::from_entries(entries)
    }

    /// Divides every cell by its column sum. Rows follow `matrix.ids()`.
    pub fn normalized<Id: Clone + PartialEq>(matrix: &JudgmentMatrix<Id>) -> Vec<Vec<f64>> {
        let n = matrix.size();
        let column_sums: Vec<f64> = (0..n)
            .map(|j| (0..n).map(|i| matrix.value(i, j)).sum())
            .collect();

        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if column_sums[j] == 0.0 {
                            0.0
                        } else {
                            matrix.value(i, j) / column_sums[j]
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
