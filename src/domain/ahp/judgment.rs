//! Judgment tables - reciprocal storage of pairwise comparisons for one comparison set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use super::JudgmentValue;
use crate::domain::foundation::ValidationError;

/// Where a matrix cell value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Entered by the decision-maker.
    Explicit,
    /// Computed from raw magnitudes because no explicit judgment exists.
    Derived,
}

/// A judgment value together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub value: JudgmentValue,
    pub provenance: Provenance,
}

impl Judgment {
    /// Creates an explicit judgment.
    pub fn explicit(value: JudgmentValue) -> Self {
        Self {
            value,
            provenance: Provenance::Explicit,
        }
    }

    /// Creates a derived judgment.
    pub fn derived(value: JudgmentValue) -> Self {
        Self {
            value,
            provenance: Provenance::Derived,
        }
    }
}

/// Explicit judgments for one comparison set, keyed by ordered id pairs.
///
/// Both orientations are written together, so `get(b, a)` is always the
/// reciprocal of `get(a, b)`. Diagonal pairs are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentTable<Id: Ord> {
    entries: BTreeMap<(Id, Id), JudgmentValue>,
}

impl<Id: Ord> Default for JudgmentTable<Id> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<Id> JudgmentTable<Id>
where
    Id: Clone + Ord + Display,
{
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records "a is `value` times as important as b" and the reciprocal for (b, a).
    pub fn set(&mut self, a: Id, b: Id, value: JudgmentValue) -> Result<(), ValidationError> {
        if a == b {
            return Err(ValidationError::self_comparison(a.to_string()));
        }
        self.entries.insert((b.clone(), a.clone()), value.reciprocal());
        self.entries.insert((a, b), value);
        Ok(())
    }

    /// Returns the recorded judgment for (a, b), if any.
    pub fn get(&self, a: &Id, b: &Id) -> Option<JudgmentValue> {
        self.entries.get(&(a.clone(), b.clone())).copied()
    }

    /// Removes the judgment for the pair in both orientations.
    pub fn clear(&mut self, a: &Id, b: &Id) {
        self.entries.remove(&(a.clone(), b.clone()));
        self.entries.remove(&(b.clone(), a.clone()));
    }

    /// Drops every judgment that involves an id rejected by `keep`.
    pub fn retain_ids(&mut self, keep: impl Fn(&Id) -> bool) {
        self.entries.retain(|(a, b), _| keep(a) && keep(b));
    }

    /// Number of compared pairs (each pair counted once).
    pub fn len(&self) -> usize {
        self.entries.len() / 2
    }

    /// Returns true if no judgment has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enumerates the pairs a decision-maker is asked about, in declaration order.
    ///
    /// For n ids this yields n·(n−1)/2 pairs `(ids[i], ids[j])` with `i < j`.
    pub fn pairs(ids: &[Id]) -> Vec<(Id, Id)> {
        let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                pairs.push((a.clone(), b.clone()));
            }
        }
        pairs
    }

    /// Counts how many of the pairs over `ids` carry a recorded judgment.
    pub fn completeness(&self, ids: &[Id]) -> Completeness {
        let pairs = Self::pairs(ids);
        let answered = pairs
            .iter()
            .filter(|(a, b)| self.get(a, b).is_some())
            .count();
        Completeness {
            answered,
            total: pairs.len(),
        }
    }
}

/// How many pairs of a comparison set have been judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completeness {
    pub answered: usize,
    pub total: usize,
}

impl Completeness {
    /// Returns true when every pair has a judgment (vacuously true for < 2 ids).
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}
