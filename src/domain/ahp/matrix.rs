//! Judgment Matrix - square reciprocal matrix for one comparison set.

use serde::{Deserialize, Serialize};

use super::{Judgment, Provenance};

/// Where a matrix cell's value came from.
///
/// Distinguishes a judgment the user never gave (`Unset`, filled with
/// indifference) from an explicit one and from a magnitude-derived one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellSource {
    Diagonal,
    Explicit,
    Derived,
    Unset,
}

impl From<Provenance> for CellSource {
    fn from(provenance: Provenance) -> Self {
        match provenance {
            Provenance::Explicit => CellSource::Explicit,
            Provenance::Derived => CellSource::Derived,
        }
    }
}

/// One cell of a judgment matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub value: f64,
    pub source: CellSource,
}

/// Square, strictly positive, reciprocal matrix with a unit diagonal.
///
/// Rows and columns follow the order of `ids`. Built on demand from a
/// judgment lookup; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentMatrix<Id> {
    ids: Vec<Id>,
    cells: Vec<Vec<MatrixCell>>,
}

impl<Id: Clone + PartialEq> JudgmentMatrix<Id> {
    /// Builds the matrix for `ids` from a judgment lookup.
    ///
    /// For each pair above the diagonal: use `lookup(a, b)` if present, else
    /// the reciprocal of `lookup(b, a)`, else indifference (1, `Unset`). The
    /// cell below the diagonal is always the reciprocal of its mirror, so the
    /// result is reciprocal even if `lookup` is not.
    pub fn build<F>(ids: &[Id], lookup: F) -> Self
    where
        F: Fn(&Id, &Id) -> Option<Judgment>,
    {
        let n = ids.len();
        let diagonal = MatrixCell {
            value: 1.0,
            source: CellSource::Diagonal,
        };
        let mut cells = vec![vec![diagonal; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let upper = match lookup(&ids[i], &ids[j]) {
                    Some(judgment) => MatrixCell {
                        value: judgment.value.value(),
                        source: judgment.provenance.into(),
                    },
                    None => match lookup(&ids[j], &ids[i]) {
                        Some(judgment) => MatrixCell {
                            value: judgment.value.reciprocal().value(),
                            source: judgment.provenance.into(),
                        },
                        None => MatrixCell {
                            value: 1.0,
                            source: CellSource::Unset,
                        },
                    },
                };
                cells[j][i] = MatrixCell {
                    value: 1.0 / upper.value,
                    source: upper.source,
                };
                cells[i][j] = upper;
            }
        }

        Self {
            ids: ids.to_vec(),
            cells,
        }
    }

    /// Number of compared entities.
    pub fn size(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the matrix compares no entities.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Entity ids in row/column order.
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Value at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.cells[i][j].value
    }

    /// Cell at row `i`, column `j`, if in bounds.
    pub fn cell(&self, i: usize, j: usize) -> Option<&MatrixCell> {
        self.cells.get(i).and_then(|row| row.get(j))
    }

    /// Value for the pair (a, b), if both ids are in the matrix.
    pub fn entry(&self, a: &Id, b: &Id) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.cells[i][j].value)
    }

    /// Row index of an id.
    pub fn index_of(&self, id: &Id) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Plain numeric rows, e.g. for display.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.value).collect())
            .collect()
    }

    /// Pairs above the diagonal whose value was derived from magnitudes.
    pub fn derived_pairs(&self) -> Vec<(Id, Id, f64)> {
        self.upper_cells_with(CellSource::Derived)
    }

    /// Number of pairs above the diagonal left at the indifference default.
    pub fn unset_count(&self) -> usize {
        self.upper_cells_with(CellSource::Unset).len()
    }

    /// Checks `M[i][j] * M[j][i] == 1` and a unit diagonal within `tolerance`.
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (self.value(i, i) - 1.0).abs() <= tolerance
                && (0..n).all(|j| (self.value(i, j) * self.value(j, i) - 1.0).abs() <= tolerance)
        })
    }

    fn upper_cells_with(&self, source: CellSource) -> Vec<(Id, Id, f64)> {
        let n = self.size();
        let mut found = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.cells[i][j].source == source {
                    found.push((self.ids[i].clone(), self.ids[j].clone(), self.cells[i][j].value));
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ahp::{JudgmentTable, JudgmentValue};
    use crate::domain::foundation::AlternativeId;
    use proptest::prelude::*;

    fn aid(id: &str) -> AlternativeId {
        AlternativeId::new(id).unwrap()
    }

    fn table(entries: &[(&str, &str, f64)]) -> JudgmentTable<AlternativeId> {
        let mut table = JudgmentTable::new();
        for (a, b, v) in entries {
            table
                .set(aid(a), aid(b), JudgmentValue::try_new(*v).unwrap())
                .unwrap();
        }
        table
    }

    fn build(ids: &[AlternativeId], table: &JudgmentTable<AlternativeId>) -> JudgmentMatrix<AlternativeId> {
        JudgmentMatrix::build(ids, |a, b| table.get(a, b).map(Judgment::explicit))
    }

    #[test]
    fn empty_id_list_builds_empty_matrix() {
        let matrix = build(&[], &JudgmentTable::new());
        assert!(matrix.is_empty());
        assert!(matrix.values().is_empty());
    }

    #[test]
    fn diagonal_is_one_and_missing_judgments_default_to_indifference() {
        let ids = vec![aid("A"), aid("B"), aid("C")];
        let matrix = build(&ids, &table(&[("A", "B", 3.0)]));

        for i in 0..3 {
            assert_eq!(matrix.value(i, i), 1.0);
            assert_eq!(matrix.cell(i, i).unwrap().source, CellSource::Diagonal);
        }
        assert_eq!(matrix.value(0, 1), 3.0);
        assert_eq!(matrix.value(0, 2), 1.0);
        assert_eq!(matrix.cell(1, 2).unwrap().source, CellSource::Unset);
        assert_eq!(matrix.unset_count(), 2);
    }

    #[test]
    fn reverse_lookup_is_used_as_reciprocal() {
        let ids = vec![aid("A"), aid("B")];
        // Lookup that only knows (B, A); the builder must reciprocate it.
        let matrix = JudgmentMatrix::build(&ids, |a, b| {
            (a.as_str() == "B" && b.as_str() == "A")
                .then(|| Judgment::explicit(JudgmentValue::try_new(4.0).unwrap()))
        });

        assert_eq!(matrix.entry(&aid("A"), &aid("B")), Some(0.25));
        assert_eq!(matrix.entry(&aid("B"), &aid("A")), Some(4.0));
    }

    #[test]
    fn derived_cells_keep_their_provenance() {
        let ids = vec![aid("A"), aid("B")];
        let matrix = JudgmentMatrix::build(&ids, |a, _| {
            (a.as_str() == "A").then(|| Judgment::derived(JudgmentValue::try_new(2.0).unwrap()))
        });

        assert_eq!(matrix.cell(0, 1).unwrap().source, CellSource::Derived);
        assert_eq!(matrix.cell(1, 0).unwrap().source, CellSource::Derived);
        assert_eq!(matrix.derived_pairs(), vec![(aid("A"), aid("B"), 2.0)]);
    }

    #[test]
    fn entry_returns_none_for_unknown_ids() {
        let ids = vec![aid("A"), aid("B")];
        let matrix = build(&ids, &JudgmentTable::new());
        assert_eq!(matrix.entry(&aid("A"), &aid("Z")), None);
        assert_eq!(matrix.index_of(&aid("B")), Some(1));
    }

    proptest! {
        #[test]
        fn built_matrices_are_reciprocal_and_positive(
            raw in proptest::collection::vec(prop_oneof![Just(None), (1.0f64 / 9.0..=9.0).prop_map(Some)], 6)
        ) {
            let ids = vec![aid("A"), aid("B"), aid("C"), aid("D")];
            let mut table = JudgmentTable::new();
            for ((a, b), value) in JudgmentTable::pairs(&ids).into_iter().zip(raw) {
                if let Some(v) = value {
                    table.set(a, b, JudgmentValue::try_new(v).unwrap()).unwrap();
                }
            }

            let matrix = build(&ids, &table);
            prop_assert!(matrix.is_reciprocal(1e-12));
            for row in matrix.values() {
                for value in row {
                    prop_assert!(value > 0.0);
                }
            }
        }
    }
}
