//! Turns an `EvaluateDecisionRequest` into a validated `DecisionState`.
//!
//! Nothing in the request fails the evaluation. Entries that cannot be used
//! are dropped and described in the returned warnings, so the engine only
//! ever sees judgments within the Saaty scale between declared entities.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use super::dto::{EvaluateDecisionRequest, MagnitudeInput};
use crate::domain::ahp::{
    Alternative, AlternativeScope, Criterion, DecisionState, JudgmentValue, MagnitudeDirection,
    MagnitudeSeries, SubCriterion,
};
use crate::domain::foundation::{AlternativeId, CriterionId, SubCriterionId, ValidationError};

/// Largest relative gap between the two orientations of a pair that still
/// reads as one judgment rounded to two decimals (`3` and `0.33`).
const RECIPROCAL_AGREEMENT: f64 = 0.05;

/// A decision snapshot plus everything that was left out of it.
#[derive(Debug, Clone)]
pub struct ParsedDecision {
    pub state: DecisionState,
    pub warnings: Vec<String>,
}

impl EvaluateDecisionRequest {
    /// Builds the decision state, collecting a warning for every ignored entry.
    pub fn into_state(self) -> ParsedDecision {
        let mut parser = Parser::default();

        parser.add_entities(&self);
        let catalog = Catalog::of(&parser.state);

        parser.add_criteria_judgments(&catalog, &self.criteria_judgments);
        parser.add_sub_criteria_judgments(&catalog, &self.sub_criteria_judgments);
        parser.add_alternative_judgments(&catalog, &self.alternative_judgments);
        parser.add_magnitudes(&catalog, &self.raw_magnitudes, &self);

        ParsedDecision {
            state: parser.state,
            warnings: parser.warnings,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Composite keys
// ════════════════════════════════════════════════════════════════════════════

/// Splits `key` at the first `-` that yields two accepted halves.
///
/// Ids may contain `-` themselves, so every split position is tried.
fn split_pair<'k>(
    key: &'k str,
    left: impl Fn(&str) -> bool,
    right: impl Fn(&str) -> bool,
) -> Option<(&'k str, &'k str)> {
    key.match_indices('-')
        .map(|(at, _)| (&key[..at], &key[at + 1..]))
        .find(|(a, b)| left(a) && right(b))
}

/// Splits `scope-a-b` where `a` and `b` must be members of `scope`.
fn split_scoped<'k>(
    key: &'k str,
    scope: impl Fn(&str) -> bool,
    member: impl Fn(&str, &str) -> bool,
) -> Option<(&'k str, &'k str, &'k str)> {
    key.match_indices('-').find_map(|(at, _)| {
        let (prefix, rest) = (&key[..at], &key[at + 1..]);
        if !scope(prefix) {
            return None;
        }
        split_pair(rest, |a| member(prefix, a), |b| member(prefix, b)).map(|(a, b)| (prefix, a, b))
    })
}

/// Declared ids, for resolving keys without rebuilding typed ids per candidate.
#[derive(Debug, Default)]
struct Catalog {
    criteria: HashSet<String>,
    /// Sub-criterion id to owning criterion id.
    sub_criteria: HashMap<String, String>,
    alternatives: HashSet<String>,
}

impl Catalog {
    fn of(state: &DecisionState) -> Self {
        Self {
            criteria: state.criteria().iter().map(|c| c.id.to_string()).collect(),
            sub_criteria: state
                .sub_criteria()
                .iter()
                .map(|s| (s.id.to_string(), s.criterion_id.to_string()))
                .collect(),
            alternatives: state.alternatives().iter().map(|a| a.id.to_string()).collect(),
        }
    }

    fn is_criterion(&self, id: &str) -> bool {
        self.criteria.contains(id)
    }

    fn is_sub_criterion(&self, id: &str) -> bool {
        self.sub_criteria.contains_key(id)
    }

    fn is_sub_criterion_of(&self, criterion: &str, id: &str) -> bool {
        self.sub_criteria.get(id).is_some_and(|owner| owner == criterion)
    }

    fn is_alternative(&self, id: &str) -> bool {
        self.alternatives.contains(id)
    }

    fn parent_of(&self, sub_criterion: &str) -> Option<&str> {
        self.sub_criteria.get(sub_criterion).map(String::as_str)
    }

    /// Resolves `scope-a-b`, preferring a sub-criterion scope over a criterion.
    fn alternative_key<'k>(&self, key: &'k str) -> Option<(AlternativeScope, &'k str, &'k str)> {
        let alternative = |_: &str, id: &str| self.is_alternative(id);
        if let Some((scope, a, b)) = split_scoped(key, |s| self.is_sub_criterion(s), alternative) {
            return Some((AlternativeScope::SubCriterion(SubCriterionId::new(scope).ok()?), a, b));
        }
        split_scoped(key, |s| self.is_criterion(s), alternative)
            .and_then(|(scope, a, b)| Some((AlternativeScope::Criterion(CriterionId::new(scope).ok()?), a, b)))
    }

    /// Resolves `scope-alternative` with the same preference as judgments.
    fn magnitude_key(&self, key: &str) -> Option<(AlternativeScope, AlternativeId)> {
        let alternative = |id: &str| self.is_alternative(id);
        if let Some((scope, alt)) = split_pair(key, |s| self.is_sub_criterion(s), alternative) {
            return Some((
                AlternativeScope::SubCriterion(SubCriterionId::new(scope).ok()?),
                AlternativeId::new(alt).ok()?,
            ));
        }
        let (scope, alt) = split_pair(key, |s| self.is_criterion(s), alternative)?;
        Some((
            AlternativeScope::Criterion(CriterionId::new(scope).ok()?),
            AlternativeId::new(alt).ok()?,
        ))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// State assembly
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Parser {
    state: DecisionState,
    warnings: Vec<String>,
}

impl Parser {
    fn ignore(&mut self, section: &str, key: &str, reason: impl std::fmt::Display) {
        warn!(section, key, reason = %reason, "ignoring decision input");
        self.warnings.push(format!("{} '{}' ignored: {}", section, key, reason));
    }

    /// Applies a state transition, keeping the old state and warning on failure.
    fn apply(
        &mut self,
        section: &str,
        key: &str,
        next: Result<DecisionState, ValidationError>,
    ) {
        match next {
            Ok(state) => self.state = state,
            Err(err) => self.ignore(section, key, err),
        }
    }

    /// Validates a raw judgment. `None` means unset, whether by choice (0) or
    /// because the value was rejected.
    fn judgment(&mut self, section: &str, key: &str, raw: f64) -> Option<JudgmentValue> {
        if raw == 0.0 {
            return None;
        }
        match JudgmentValue::try_new(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                self.ignore(section, key, err);
                None
            }
        }
    }

    /// Settles a judgment for a pair that may already hold the reverse entry.
    ///
    /// Editors write both orientations, the smaller one rounded. When the two
    /// agree, the side entered as `>= 1` is kept; when they contradict each
    /// other the later key is ignored.
    fn reconcile(
        &mut self,
        section: &str,
        key: &str,
        existing: Option<JudgmentValue>,
        raw: f64,
        value: JudgmentValue,
    ) -> Option<JudgmentValue> {
        let Some(existing) = existing else {
            return Some(value);
        };
        if (existing.value() / value.value() - 1.0).abs() > RECIPROCAL_AGREEMENT {
            self.ignore(
                section,
                key,
                format!("contradicts the reverse judgment ({} vs {})", existing, value),
            );
            return None;
        }
        (raw >= 1.0).then_some(value)
    }

    fn add_entities(&mut self, request: &EvaluateDecisionRequest) {
        for dto in &request.criteria {
            let next = CriterionId::new(dto.id.as_str())
                .and_then(|id| Criterion::new(id, dto.name.as_str()))
                .and_then(|criterion| self.state.with_criterion(criterion));
            self.apply("criterion", &dto.id, next);
        }

        for dto in &request.sub_criteria {
            let next = SubCriterionId::new(dto.id.as_str())
                .and_then(|id| Ok((id, CriterionId::new(dto.criterion_id.as_str())?)))
                .and_then(|(id, owner)| SubCriterion::new(id, dto.name.as_str(), owner))
                .and_then(|sub| self.state.with_sub_criterion(sub));
            self.apply("sub-criterion", &dto.id, next);
        }

        for dto in &request.alternatives {
            let next = AlternativeId::new(dto.id.as_str())
                .and_then(|id| Alternative::new(id, dto.name.as_str()))
                .and_then(|alternative| self.state.with_alternative(alternative));
            self.apply("alternative", &dto.id, next);
        }
    }

    fn add_criteria_judgments(&mut self, catalog: &Catalog, judgments: &BTreeMap<String, f64>) {
        const SECTION: &str = "criteria judgment";
        for (key, &raw) in judgments {
            let Some(value) = self.judgment(SECTION, key, raw) else {
                continue;
            };
            let Some((a, b)) = split_pair(key, |s| catalog.is_criterion(s), |s| catalog.is_criterion(s))
            else {
                self.ignore(SECTION, key, "does not name two declared criteria");
                continue;
            };
            let ids = CriterionId::new(a).and_then(|a| Ok((a, CriterionId::new(b)?)));
            let (a, b) = match ids {
                Ok(ids) => ids,
                Err(err) => {
                    self.ignore(SECTION, key, err);
                    continue;
                }
            };
            let existing = self.state.criteria_judgments().get(&a, &b);
            let Some(value) = self.reconcile(SECTION, key, existing, raw, value) else {
                continue;
            };
            let next = self.state.with_criteria_judgment(&a, &b, value);
            self.apply(SECTION, key, next);
        }
    }

    fn add_sub_criteria_judgments(&mut self, catalog: &Catalog, judgments: &BTreeMap<String, f64>) {
        const SECTION: &str = "sub-criteria judgment";
        for (key, &raw) in judgments {
            let Some(value) = self.judgment(SECTION, key, raw) else {
                continue;
            };
            let resolved = split_scoped(
                key,
                |s| catalog.is_criterion(s),
                |criterion, s| catalog.is_sub_criterion_of(criterion, s),
            );
            let Some((criterion, a, b)) = resolved else {
                self.ignore(SECTION, key, "does not name a criterion and two of its sub-criteria");
                continue;
            };
            let ids = CriterionId::new(criterion).and_then(|criterion| {
                Ok((criterion, SubCriterionId::new(a)?, SubCriterionId::new(b)?))
            });
            let (criterion, a, b) = match ids {
                Ok(ids) => ids,
                Err(err) => {
                    self.ignore(SECTION, key, err);
                    continue;
                }
            };
            let existing = self
                .state
                .sub_criteria_judgments(&criterion)
                .and_then(|table| table.get(&a, &b));
            let Some(value) = self.reconcile(SECTION, key, existing, raw, value) else {
                continue;
            };
            let next = self.state.with_sub_criteria_judgment(&criterion, &a, &b, value);
            self.apply(SECTION, key, next);
        }
    }

    fn add_alternative_judgments(&mut self, catalog: &Catalog, judgments: &BTreeMap<String, f64>) {
        const SECTION: &str = "alternative judgment";
        for (key, &raw) in judgments {
            let Some(value) = self.judgment(SECTION, key, raw) else {
                continue;
            };
            let Some((scope, a, b)) = catalog.alternative_key(key) else {
                self.ignore(SECTION, key, "does not name a scope and two declared alternatives");
                continue;
            };
            let ids = AlternativeId::new(a).and_then(|a| Ok((a, AlternativeId::new(b)?)));
            let (a, b) = match ids {
                Ok(ids) => ids,
                Err(err) => {
                    self.ignore(SECTION, key, err);
                    continue;
                }
            };
            let existing = self
                .state
                .alternative_judgments(&scope)
                .and_then(|table| table.get(&a, &b));
            let Some(value) = self.reconcile(SECTION, key, existing, raw, value) else {
                continue;
            };
            let next = self.state.with_alternative_judgment(&scope, &a, &b, value);
            self.apply(SECTION, key, next);
        }
    }

    fn add_magnitudes(
        &mut self,
        catalog: &Catalog,
        magnitudes: &BTreeMap<String, MagnitudeInput>,
        request: &EvaluateDecisionRequest,
    ) {
        const SECTION: &str = "raw magnitude";
        let mut by_scope: BTreeMap<AlternativeScope, Vec<(&str, AlternativeId, &MagnitudeInput)>> =
            BTreeMap::new();

        for (key, raw) in magnitudes {
            let Some((scope, alternative)) = catalog.magnitude_key(key) else {
                self.ignore(SECTION, key, "does not name a scope and a declared alternative");
                continue;
            };
            by_scope.entry(scope).or_default().push((key.as_str(), alternative, raw));
        }

        for (scope, entries) in by_scope {
            let direction = direction_of(catalog, request, &scope);
            let mut series = MagnitudeSeries::new(direction);
            for (key, alternative, raw) in entries {
                let next = match raw {
                    MagnitudeInput::Single(value) => {
                        series.clone().with_value(alternative, *value)
                    }
                    MagnitudeInput::Samples(samples) => {
                        series.clone().with_samples(alternative, samples)
                    }
                };
                match next {
                    Ok(next) => series = next,
                    Err(err) => self.ignore(SECTION, key, err),
                }
            }
            if series.is_empty() {
                continue;
            }
            let next = self.state.with_magnitudes(&scope, series);
            self.apply(SECTION, scope.id_str(), next);
        }
    }
}

/// The scope's own configuration, else its parent criterion's, else cost.
fn direction_of(
    catalog: &Catalog,
    request: &EvaluateDecisionRequest,
    scope: &AlternativeScope,
) -> MagnitudeDirection {
    let own = request.criteria_config.get(scope.id_str());
    let inherited = match scope {
        AlternativeScope::SubCriterion(id) => catalog
            .parent_of(id.as_str())
            .and_then(|parent| request.criteria_config.get(parent)),
        AlternativeScope::Criterion(_) => None,
    };
    own.or(inherited)
        .map(|&kind| kind.into())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ahp::DecisionEvaluator;
    use crate::domain::ahp::EvaluationOptions;
    use serde_json::json;

    fn request(body: serde_json::Value) -> EvaluateDecisionRequest {
        serde_json::from_value(body).unwrap()
    }

    fn base() -> serde_json::Value {
        json!({
            "criteria": [
                {"id": "location", "name": "Location"},
                {"id": "cost", "name": "Cost"}
            ],
            "subCriteria": [
                {"id": "port-distance", "name": "Port", "criterionId": "location"},
                {"id": "airport", "name": "Airport", "criterionId": "location"}
            ],
            "alternatives": [
                {"id": "city-a", "name": "City A"},
                {"id": "city-b", "name": "City B"}
            ]
        })
    }

    fn with(mut body: serde_json::Value, field: &str, value: serde_json::Value) -> serde_json::Value {
        body[field] = value;
        body
    }

    fn alt(id: &str) -> AlternativeId {
        AlternativeId::new(id).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Key resolution
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn split_pair_tries_every_dash() {
        let known = ["a-b", "c", "a", "b-c"];
        let is_known = |s: &str| known.contains(&s);

        assert_eq!(split_pair("a-b-c", is_known, is_known), Some(("a", "b-c")));
        assert_eq!(split_pair("x-y", is_known, is_known), None);
    }

    #[test]
    fn split_scoped_requires_members_of_the_scope() {
        let scoped = |scope: &str, id: &str| scope == "s" && (id == "p" || id == "q");

        assert_eq!(split_scoped("s-p-q", |s| s == "s", scoped), Some(("s", "p", "q")));
        assert_eq!(split_scoped("t-p-q", |s| s == "t", scoped), None);
    }

    #[test]
    fn dashed_ids_resolve_in_every_section() {
        let body = with(
            with(base(), "criteriaJudgments", json!({"location-cost": 3})),
            "alternativeJudgments",
            json!({"port-distance-city-a-city-b": 5}),
        );
        let body = with(
            body,
            "subCriteriaJudgments",
            json!({"location-port-distance-airport": 2}),
        );

        let parsed = request(body).into_state();

        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let scope = AlternativeScope::SubCriterion(SubCriterionId::new("port-distance").unwrap());
        let table = parsed.state.alternative_judgments(&scope).unwrap();
        assert_eq!(table.get(&alt("city-a"), &alt("city-b")).unwrap().value(), 5.0);
        let location = CriterionId::new("location").unwrap();
        assert_eq!(parsed.state.sub_criteria_judgments(&location).unwrap().len(), 1);
        assert_eq!(parsed.state.criteria_judgments().len(), 1);
    }

    #[test]
    fn criterion_scope_is_used_when_no_sub_criterion_matches() {
        let body = with(base(), "alternativeJudgments", json!({"cost-city-b-city-a": 4}));

        let parsed = request(body).into_state();

        let scope = AlternativeScope::Criterion(CriterionId::new("cost").unwrap());
        let table = parsed.state.alternative_judgments(&scope).unwrap();
        assert_eq!(table.get(&alt("city-a"), &alt("city-b")).unwrap().value(), 0.25);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Both orientations of a pair
    // ─────────────────────────────────────────────────────────────────────

    fn cid(id: &str) -> CriterionId {
        CriterionId::new(id).unwrap()
    }

    #[test]
    fn rounded_extreme_pair_keeps_the_extreme_judgment() {
        let body = with(
            base(),
            "criteriaJudgments",
            json!({"location-cost": 0.11, "cost-location": 9.09}),
        );

        let parsed = request(body).into_state();

        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let table = parsed.state.criteria_judgments();
        assert_eq!(table.get(&cid("cost"), &cid("location")).unwrap().value(), 9.0);
        assert!((table.get(&cid("location"), &cid("cost")).unwrap().value() - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn unrounded_side_wins_regardless_of_key_order() {
        // "cost-location" sorts first, so the rounded side is seen first here.
        let criteria = with(
            base(),
            "criteriaJudgments",
            json!({"location-cost": 3, "cost-location": 0.33}),
        );
        // Here the exact side sorts first.
        let body = with(
            criteria,
            "alternativeJudgments",
            json!({"cost-city-a-city-b": 7, "cost-city-b-city-a": 0.14}),
        );

        let parsed = request(body).into_state();

        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let criteria = parsed.state.criteria_judgments();
        assert_eq!(criteria.get(&cid("location"), &cid("cost")).unwrap().value(), 3.0);
        let scope = AlternativeScope::Criterion(cid("cost"));
        let alternatives = parsed.state.alternative_judgments(&scope).unwrap();
        assert_eq!(alternatives.get(&alt("city-a"), &alt("city-b")).unwrap().value(), 7.0);
    }

    #[test]
    fn contradicting_orientations_keep_the_first_and_warn() {
        let body = with(
            base(),
            "criteriaJudgments",
            json!({"location-cost": 3, "cost-location": 3}),
        );

        let parsed = request(body).into_state();

        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("location-cost"));
        let table = parsed.state.criteria_judgments();
        assert_eq!(table.get(&cid("cost"), &cid("location")).unwrap().value(), 3.0);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Invalid input
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn zero_is_unset_without_warning() {
        let body = with(base(), "criteriaJudgments", json!({"location-cost": 0}));

        let parsed = request(body).into_state();

        assert!(parsed.warnings.is_empty());
        assert!(parsed.state.criteria_judgments().is_empty());
    }

    #[test]
    fn out_of_scale_and_negative_values_are_rejected() {
        let body = with(
            base(),
            "alternativeJudgments",
            json!({"cost-city-a-city-b": 12, "airport-city-a-city-b": -3}),
        );

        let parsed = request(body).into_state();

        assert_eq!(parsed.warnings.len(), 2);
        let scope = AlternativeScope::Criterion(CriterionId::new("cost").unwrap());
        assert!(parsed.state.alternative_judgments(&scope).is_none());
    }

    #[test]
    fn unknown_keys_are_ignored_with_warning() {
        let body = with(base(), "criteriaJudgments", json!({"location-weather": 3}));

        let parsed = request(body).into_state();

        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.warnings[0].contains("location-weather"));
    }

    #[test]
    fn self_comparison_is_ignored_with_warning() {
        let body = with(base(), "criteriaJudgments", json!({"cost-cost": 3}));

        let parsed = request(body).into_state();

        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.state.criteria_judgments().is_empty());
    }

    #[test]
    fn orphan_sub_criterion_and_duplicates_are_dropped() {
        let mut body = base();
        body["subCriteria"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": "orphan", "name": "Orphan", "criterionId": "missing"}));
        body["alternatives"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": "city-a", "name": "Again"}));

        let parsed = request(body).into_state();

        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(parsed.state.sub_criteria().len(), 2);
        assert_eq!(parsed.state.alternatives().len(), 2);
    }

    #[test]
    fn sub_criteria_judgment_across_criteria_is_rejected() {
        let mut body = base();
        body["subCriteria"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": "rent", "name": "Rent", "criterionId": "cost"}));
        let body = with(body, "subCriteriaJudgments", json!({"location-airport-rent": 2}));

        let parsed = request(body).into_state();

        assert_eq!(parsed.warnings.len(), 1);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Raw magnitudes
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn magnitudes_default_to_cost_direction() {
        let body = with(
            base(),
            "rawMagnitudes",
            json!({"airport-city-a": 10.0, "airport-city-b": 30.0}),
        );

        let parsed = request(body).into_state();
        let scope = AlternativeScope::SubCriterion(SubCriterionId::new("airport").unwrap());
        let series = parsed.state.magnitudes(&scope).unwrap();

        assert_eq!(series.direction(), MagnitudeDirection::LowerIsBetter);
        assert_eq!(series.derive(&alt("city-a"), &alt("city-b")).unwrap().value(), 3.0);
    }

    #[test]
    fn sample_lists_are_averaged_into_one_magnitude() {
        let body = with(
            base(),
            "rawMagnitudes",
            json!({"airport-city-a": [10.0, 30.0], "airport-city-b": 40.0}),
        );

        let parsed = request(body).into_state();
        let scope = AlternativeScope::SubCriterion(SubCriterionId::new("airport").unwrap());
        let series = parsed.state.magnitudes(&scope).unwrap();

        assert!(parsed.warnings.is_empty());
        assert_eq!(series.derive(&alt("city-a"), &alt("city-b")).unwrap().value(), 2.0);
    }

    #[test]
    fn empty_sample_lists_are_ignored_with_a_warning() {
        let body = with(
            base(),
            "rawMagnitudes",
            json!({"cost-city-a": [], "cost-city-b": 5.0}),
        );

        let parsed = request(body).into_state();
        let scope = AlternativeScope::Criterion(CriterionId::new("cost").unwrap());

        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.state.magnitudes(&scope).unwrap().len(), 1);
    }

    #[test]
    fn sub_criterion_inherits_parent_config() {
        let body = with(
            with(
                base(),
                "rawMagnitudes",
                json!({"airport-city-a": 10.0, "airport-city-b": 30.0}),
            ),
            "criteriaConfig",
            json!({"location": "BENEFIT"}),
        );

        let parsed = request(body).into_state();
        let scope = AlternativeScope::SubCriterion(SubCriterionId::new("airport").unwrap());

        assert_eq!(
            parsed.state.magnitudes(&scope).unwrap().direction(),
            MagnitudeDirection::HigherIsBetter
        );
    }

    #[test]
    fn non_positive_magnitudes_are_rejected() {
        let body = with(
            base(),
            "rawMagnitudes",
            json!({"cost-city-a": 0.0, "cost-city-b": 5.0}),
        );

        let parsed = request(body).into_state();
        let scope = AlternativeScope::Criterion(CriterionId::new("cost").unwrap());

        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.state.magnitudes(&scope).unwrap().len(), 1);
    }

    #[test]
    fn parsed_state_evaluates_with_derived_judgments() {
        let body = with(
            base(),
            "rawMagnitudes",
            json!({"cost-city-a": 100.0, "cost-city-b": 200.0}),
        );

        let parsed = request(body).into_state();
        let report = DecisionEvaluator::evaluate(&parsed.state, &EvaluationOptions::default()).unwrap();

        assert_eq!(report.derived_judgments.len(), 1);
        let scope = AlternativeScope::Criterion(CriterionId::new("cost").unwrap());
        let cost = report.alternative_evaluation(&scope).unwrap();
        assert!((cost.priorities.weight(&alt("city-a")) - 2.0 / 3.0).abs() < 1e-9);
    }
}
