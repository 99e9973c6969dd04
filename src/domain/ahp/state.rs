//! Decision state - immutable snapshot of entities, judgments and magnitudes.
//!
//! Every mutation returns a new `DecisionState`; the receiver is never
//! changed, so a snapshot handed to the engine cannot be altered underneath it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Alternative, Criterion, JudgmentTable, JudgmentValue, MagnitudeSeries, SubCriterion};
use crate::domain::foundation::{AlternativeId, CriterionId, SubCriterionId, ValidationError};

/// The node under which alternatives are compared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AlternativeScope {
    Criterion(CriterionId),
    SubCriterion(SubCriterionId),
}

impl AlternativeScope {
    /// The raw id of the scope node.
    pub fn id_str(&self) -> &str {
        match self {
            AlternativeScope::Criterion(id) => id.as_str(),
            AlternativeScope::SubCriterion(id) => id.as_str(),
        }
    }
}

impl fmt::Display for AlternativeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlternativeScope::Criterion(id) => write!(f, "criterion:{}", id),
            AlternativeScope::SubCriterion(id) => write!(f, "sub_criterion:{}", id),
        }
    }
}

/// Entities, judgments and magnitudes of one decision.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecisionState {
    criteria: Vec<Criterion>,
    sub_criteria: Vec<SubCriterion>,
    alternatives: Vec<Alternative>,
    criteria_judgments: JudgmentTable<CriterionId>,
    sub_criteria_judgments: BTreeMap<CriterionId, JudgmentTable<SubCriterionId>>,
    alternative_judgments: BTreeMap<AlternativeScope, JudgmentTable<AlternativeId>>,
    magnitudes: BTreeMap<AlternativeScope, MagnitudeSeries>,
}

impl DecisionState {
    /// Creates an empty decision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder working with plain string ids.
    pub fn builder() -> DecisionStateBuilder {
        DecisionStateBuilder::new()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Criteria in declaration order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// All sub-criteria in declaration order.
    pub fn sub_criteria(&self) -> &[SubCriterion] {
        &self.sub_criteria
    }

    /// Alternatives in declaration order.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn criterion(&self, id: &CriterionId) -> Option<&Criterion> {
        self.criteria.iter().find(|c| &c.id == id)
    }

    pub fn sub_criterion(&self, id: &SubCriterionId) -> Option<&SubCriterion> {
        self.sub_criteria.iter().find(|s| &s.id == id)
    }

    pub fn alternative(&self, id: &AlternativeId) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| &a.id == id)
    }

    /// Sub-criteria owned by a criterion, in declaration order.
    pub fn sub_criteria_of(&self, criterion: &CriterionId) -> Vec<&SubCriterion> {
        self.sub_criteria
            .iter()
            .filter(|s| &s.criterion_id == criterion)
            .collect()
    }

    pub fn criterion_ids(&self) -> Vec<CriterionId> {
        self.criteria.iter().map(|c| c.id.clone()).collect()
    }

    pub fn sub_criterion_ids_of(&self, criterion: &CriterionId) -> Vec<SubCriterionId> {
        self.sub_criteria_of(criterion)
            .into_iter()
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn alternative_ids(&self) -> Vec<AlternativeId> {
        self.alternatives.iter().map(|a| a.id.clone()).collect()
    }

    pub fn criteria_judgments(&self) -> &JudgmentTable<CriterionId> {
        &self.criteria_judgments
    }

    /// Judgments between the sub-criteria of one criterion.
    pub fn sub_criteria_judgments(&self, criterion: &CriterionId) -> Option<&JudgmentTable<SubCriterionId>> {
        self.sub_criteria_judgments.get(criterion)
    }

    /// Judgments between alternatives under one scope.
    pub fn alternative_judgments(&self, scope: &AlternativeScope) -> Option<&JudgmentTable<AlternativeId>> {
        self.alternative_judgments.get(scope)
    }

    /// Raw magnitudes recorded for one scope.
    pub fn magnitudes(&self, scope: &AlternativeScope) -> Option<&MagnitudeSeries> {
        self.magnitudes.get(scope)
    }

    /// Returns true if the scope names a declared criterion or sub-criterion.
    pub fn has_scope(&self, scope: &AlternativeScope) -> bool {
        match scope {
            AlternativeScope::Criterion(id) => self.criterion(id).is_some(),
            AlternativeScope::SubCriterion(id) => self.sub_criterion(id).is_some(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Criteria
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a criterion at the end of the declaration order.
    pub fn with_criterion(&self, criterion: Criterion) -> Result<Self, ValidationError> {
        if self.criterion(&criterion.id).is_some() {
            return Err(ValidationError::duplicate("criterion", criterion.id.as_str()));
        }
        let mut next = self.clone();
        next.criteria.push(criterion);
        Ok(next)
    }

    /// Removes a criterion together with its sub-criteria and every judgment
    /// and magnitude that refers to either.
    pub fn without_criterion(&self, id: &CriterionId) -> Self {
        let mut next = self.clone();
        let orphaned: Vec<SubCriterionId> = self.sub_criterion_ids_of(id);

        next.criteria.retain(|c| &c.id != id);
        next.sub_criteria.retain(|s| &s.criterion_id != id);
        next.criteria_judgments.retain_ids(|c| c != id);
        next.sub_criteria_judgments.remove(id);

        let removed_scope = |scope: &AlternativeScope| match scope {
            AlternativeScope::Criterion(c) => c == id,
            AlternativeScope::SubCriterion(s) => orphaned.contains(s),
        };
        next.alternative_judgments.retain(|scope, _| !removed_scope(scope));
        next.magnitudes.retain(|scope, _| !removed_scope(scope));
        next
    }

    pub fn rename_criterion(&self, id: &CriterionId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let renamed = Criterion::new(id.clone(), name)?;
        let mut next = self.clone();
        let slot = next
            .criteria
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ValidationError::unknown_reference("criterion", id.as_str()))?;
        *slot = renamed;
        Ok(next)
    }

    /// Records "a is `value` times as important as b" between two criteria.
    pub fn with_criteria_judgment(
        &self,
        a: &CriterionId,
        b: &CriterionId,
        value: JudgmentValue,
    ) -> Result<Self, ValidationError> {
        self.require_criterion(a)?;
        self.require_criterion(b)?;
        let mut next = self.clone();
        next.criteria_judgments.set(a.clone(), b.clone(), value)?;
        Ok(next)
    }

    pub fn without_criteria_judgment(&self, a: &CriterionId, b: &CriterionId) -> Self {
        let mut next = self.clone();
        next.criteria_judgments.clear(a, b);
        next
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sub-criteria
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a sub-criterion under an existing criterion.
    pub fn with_sub_criterion(&self, sub: SubCriterion) -> Result<Self, ValidationError> {
        if self.sub_criterion(&sub.id).is_some() {
            return Err(ValidationError::duplicate("sub_criterion", sub.id.as_str()));
        }
        self.require_criterion(&sub.criterion_id)?;
        let mut next = self.clone();
        next.sub_criteria.push(sub);
        Ok(next)
    }

    /// Removes a sub-criterion and every judgment and magnitude that refers to it.
    pub fn without_sub_criterion(&self, id: &SubCriterionId) -> Self {
        let mut next = self.clone();
        next.sub_criteria.retain(|s| &s.id != id);
        for table in next.sub_criteria_judgments.values_mut() {
            table.retain_ids(|s| s != id);
        }
        let scope = AlternativeScope::SubCriterion(id.clone());
        next.alternative_judgments.remove(&scope);
        next.magnitudes.remove(&scope);
        next
    }

    pub fn rename_sub_criterion(
        &self,
        id: &SubCriterionId,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let owner = self
            .sub_criterion(id)
            .map(|s| s.criterion_id.clone())
            .ok_or_else(|| ValidationError::unknown_reference("sub_criterion", id.as_str()))?;
        let renamed = SubCriterion::new(id.clone(), name, owner)?;
        let mut next = self.clone();
        if let Some(slot) = next.sub_criteria.iter_mut().find(|s| &s.id == id) {
            *slot = renamed;
        }
        Ok(next)
    }

    /// Records a judgment between two sub-criteria of the same criterion.
    pub fn with_sub_criteria_judgment(
        &self,
        criterion: &CriterionId,
        a: &SubCriterionId,
        b: &SubCriterionId,
        value: JudgmentValue,
    ) -> Result<Self, ValidationError> {
        self.require_criterion(criterion)?;
        self.require_sub_criterion_of(criterion, a)?;
        self.require_sub_criterion_of(criterion, b)?;
        let mut next = self.clone();
        next.sub_criteria_judgments
            .entry(criterion.clone())
            .or_default()
            .set(a.clone(), b.clone(), value)?;
        Ok(next)
    }

    pub fn without_sub_criteria_judgment(
        &self,
        criterion: &CriterionId,
        a: &SubCriterionId,
        b: &SubCriterionId,
    ) -> Self {
        let mut next = self.clone();
        if let Some(table) = next.sub_criteria_judgments.get_mut(criterion) {
            table.clear(a, b);
        }
        next
    }

    // ─────────────────────────────────────────────────────────────────────
    // Alternatives
    // ─────────────────────────────────────────────────────────────────────

    pub fn with_alternative(&self, alternative: Alternative) -> Result<Self, ValidationError> {
        if self.alternative(&alternative.id).is_some() {
            return Err(ValidationError::duplicate("alternative", alternative.id.as_str()));
        }
        let mut next = self.clone();
        next.alternatives.push(alternative);
        Ok(next)
    }

    /// Removes an alternative from every scope's judgments and magnitudes.
    pub fn without_alternative(&self, id: &AlternativeId) -> Self {
        let mut next = self.clone();
        next.alternatives.retain(|a| &a.id != id);
        for table in next.alternative_judgments.values_mut() {
            table.retain_ids(|a| a != id);
        }
        for series in next.magnitudes.values_mut() {
            series.retain(|a| a != id);
        }
        next
    }

    pub fn rename_alternative(&self, id: &AlternativeId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let renamed = Alternative::new(id.clone(), name)?;
        let mut next = self.clone();
        let slot = next
            .alternatives
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| ValidationError::unknown_reference("alternative", id.as_str()))?;
        *slot = renamed;
        Ok(next)
    }

    /// Records a judgment between two alternatives under a scope.
    pub fn with_alternative_judgment(
        &self,
        scope: &AlternativeScope,
        a: &AlternativeId,
        b: &AlternativeId,
        value: JudgmentValue,
    ) -> Result<Self, ValidationError> {
        self.require_scope(scope)?;
        self.require_alternative(a)?;
        self.require_alternative(b)?;
        let mut next = self.clone();
        next.alternative_judgments
            .entry(scope.clone())
            .or_default()
            .set(a.clone(), b.clone(), value)?;
        Ok(next)
    }

    pub fn without_alternative_judgment(
        &self,
        scope: &AlternativeScope,
        a: &AlternativeId,
        b: &AlternativeId,
    ) -> Self {
        let mut next = self.clone();
        if let Some(table) = next.alternative_judgments.get_mut(scope) {
            table.clear(a, b);
        }
        next
    }

    /// Replaces the raw magnitudes of a scope.
    pub fn with_magnitudes(&self, scope: &AlternativeScope, series: MagnitudeSeries) -> Result<Self, ValidationError> {
        self.require_scope(scope)?;
        let mut next = self.clone();
        next.magnitudes.insert(scope.clone(), series);
        Ok(next)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reference checks
    // ─────────────────────────────────────────────────────────────────────

    fn require_criterion(&self, id: &CriterionId) -> Result<(), ValidationError> {
        self.criterion(id)
            .map(|_| ())
            .ok_or_else(|| ValidationError::unknown_reference("criterion", id.as_str()))
    }

    fn require_sub_criterion_of(&self, criterion: &CriterionId, id: &SubCriterionId) -> Result<(), ValidationError> {
        match self.sub_criterion(id) {
            Some(sub) if &sub.criterion_id == criterion => Ok(()),
            _ => Err(ValidationError::unknown_reference("sub_criterion", id.as_str())),
        }
    }

    fn require_alternative(&self, id: &AlternativeId) -> Result<(), ValidationError> {
        self.alternative(id)
            .map(|_| ())
            .ok_or_else(|| ValidationError::unknown_reference("alternative", id.as_str()))
    }

    fn require_scope(&self, scope: &AlternativeScope) -> Result<(), ValidationError> {
        if self.has_scope(scope) {
            Ok(())
        } else {
            Err(ValidationError::unknown_reference("scope", scope.to_string()))
        }
    }
}

/// Builds a `DecisionState` from plain string ids, stopping at the first error.
#[derive(Debug)]
pub struct DecisionStateBuilder {
    state: Result<DecisionState, ValidationError>,
}

impl Default for DecisionStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionStateBuilder {
    pub fn new() -> Self {
        Self {
            state: Ok(DecisionState::new()),
        }
    }

    fn apply<F>(self, step: F) -> Self
    where
        F: FnOnce(&DecisionState) -> Result<DecisionState, ValidationError>,
    {
        Self {
            state: self.state.and_then(|state| step(&state)),
        }
    }

    pub fn criterion(self, id: &str, name: &str) -> Self {
        self.apply(|s| s.with_criterion(Criterion::new(CriterionId::new(id)?, name)?))
    }

    pub fn sub_criterion(self, id: &str, name: &str, criterion: &str) -> Self {
        self.apply(|s| {
            s.with_sub_criterion(SubCriterion::new(
                SubCriterionId::new(id)?,
                name,
                CriterionId::new(criterion)?,
            )?)
        })
    }

    pub fn alternative(self, id: &str, name: &str) -> Self {
        self.apply(|s| s.with_alternative(Alternative::new(AlternativeId::new(id)?, name)?))
    }

    pub fn criteria_judgment(self, a: &str, b: &str, value: f64) -> Self {
        self.apply(|s| {
            s.with_criteria_judgment(
                &CriterionId::new(a)?,
                &CriterionId::new(b)?,
                JudgmentValue::try_new(value)?,
            )
        })
    }

    pub fn sub_criteria_judgment(self, criterion: &str, a: &str, b: &str, value: f64) -> Self {
        self.apply(|s| {
            s.with_sub_criteria_judgment(
                &CriterionId::new(criterion)?,
                &SubCriterionId::new(a)?,
                &SubCriterionId::new(b)?,
                JudgmentValue::try_new(value)?,
            )
        })
    }

    /// Judgment between alternatives directly under a criterion.
    pub fn criterion_alternative_judgment(self, criterion: &str, a: &str, b: &str, value: f64) -> Self {
        self.apply(|s| {
            let scope = AlternativeScope::Criterion(CriterionId::new(criterion)?);
            s.with_alternative_judgment(
                &scope,
                &AlternativeId::new(a)?,
                &AlternativeId::new(b)?,
                JudgmentValue::try_new(value)?,
            )
        })
    }

    /// Judgment between alternatives under a sub-criterion.
    pub fn sub_criterion_alternative_judgment(self, sub: &str, a: &str, b: &str, value: f64) -> Self {
        self.apply(|s| {
            let scope = AlternativeScope::SubCriterion(SubCriterionId::new(sub)?);
            s.with_alternative_judgment(
                &scope,
                &AlternativeId::new(a)?,
                &AlternativeId::new(b)?,
                JudgmentValue::try_new(value)?,
            )
        })
    }

    pub fn magnitudes(self, scope: AlternativeScope, series: MagnitudeSeries) -> Self {
        self.apply(|s| s.with_magnitudes(&scope, series))
    }

    pub fn build(self) -> Result<DecisionState, ValidationError> {
        self.state
    }
}
