//! Raw-magnitude fallback for alternative comparisons.
//!
//! When the decision-maker has not compared two alternatives under a scope,
//! a provisional judgment can be derived from a measurable proxy such as
//! distance or price per square metre.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::JudgmentValue;
use crate::domain::foundation::{AlternativeId, ValidationError};

/// Whether smaller or larger magnitudes are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeDirection {
    /// Cost-like: distance, price, travel time.
    #[default]
    LowerIsBetter,
    /// Benefit-like: area, capacity.
    HigherIsBetter,
}

/// Measured magnitudes of alternatives under one scope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MagnitudeSeries {
    direction: MagnitudeDirection,
    values: BTreeMap<AlternativeId, f64>,
}

impl MagnitudeSeries {
    /// Creates an empty series.
    pub fn new(direction: MagnitudeDirection) -> Self {
        Self {
            direction,
            values: BTreeMap::new(),
        }
    }

    /// Adds or replaces the magnitude of one alternative.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` unless the magnitude is finite and strictly positive.
    pub fn with_value(mut self, alternative: AlternativeId, magnitude: f64) -> Result<Self, ValidationError> {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(ValidationError::out_of_range(
                "magnitude",
                f64::MIN_POSITIVE,
                f64::MAX,
                magnitude,
            ));
        }
        self.values.insert(alternative, magnitude);
        Ok(self)
    }

    /// Sets one alternative's magnitude to the mean of several samples
    /// (rent per m² across warehouses, say).
    ///
    /// Samples that are not finite or not strictly positive are skipped.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` when no sample is usable.
    pub fn with_samples(
        self,
        alternative: AlternativeId,
        samples: &[f64],
    ) -> Result<Self, ValidationError> {
        let usable: Vec<f64> = samples
            .iter()
            .copied()
            .filter(|sample| sample.is_finite() && *sample > 0.0)
            .collect();
        if usable.is_empty() {
            return Err(ValidationError::out_of_range(
                "magnitude",
                f64::MIN_POSITIVE,
                f64::MAX,
                samples.first().copied().unwrap_or(0.0),
            ));
        }
        let mean = usable.iter().sum::<f64>() / usable.len() as f64;
        self.with_value(alternative, mean)
    }

    pub fn direction(&self) -> MagnitudeDirection {
        self.direction
    }

    pub fn magnitude(&self, alternative: &AlternativeId) -> Option<f64> {
        self.values.get(alternative).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drops magnitudes of alternatives rejected by `keep`.
    pub fn retain(&mut self, keep: impl Fn(&AlternativeId) -> bool) {
        self.values.retain(|alternative, _| keep(alternative));
    }

    /// Derives the judgment "a versus b" from the two magnitudes.
    ///
    /// Lower-is-better yields `m_b / m_a`, higher-is-better `m_a / m_b`,
    /// clamped onto the scale. `None` if either magnitude is missing.
    pub fn derive(&self, a: &AlternativeId, b: &AlternativeId) -> Option<JudgmentValue> {
        let m_a = self.magnitude(a)?;
        let m_b = self.magnitude(b)?;
        let ratio = match self.direction {
            MagnitudeDirection::LowerIsBetter => m_b / m_a,
            MagnitudeDirection::HigherIsBetter => m_a / m_b,
        };
        JudgmentValue::from_ratio(ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ahp::MIN_JUDGMENT;

    fn aid(id: &str) -> AlternativeId {
        AlternativeId::new(id).unwrap()
    }

    fn distances() -> MagnitudeSeries {
        MagnitudeSeries::new(MagnitudeDirection::LowerIsBetter)
            .with_value(aid("near"), 2.0)
            .unwrap()
            .with_value(aid("far"), 6.0)
            .unwrap()
    }

    #[test]
    fn lower_is_better_favours_the_smaller_magnitude() {
        let series = distances();
        assert_eq!(series.derive(&aid("near"), &aid("far")).unwrap().value(), 3.0);
        let reverse = series.derive(&aid("far"), &aid("near")).unwrap().value();
        assert!((reverse - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn higher_is_better_favours_the_larger_magnitude() {
        let series = MagnitudeSeries::new(MagnitudeDirection::HigherIsBetter)
            .with_value(aid("big"), 500.0)
            .unwrap()
            .with_value(aid("small"), 250.0)
            .unwrap();
        assert_eq!(series.derive(&aid("big"), &aid("small")).unwrap().value(), 2.0);
    }

    #[test]
    fn derived_ratio_is_clamped_onto_scale() {
        let series = MagnitudeSeries::new(MagnitudeDirection::LowerIsBetter)
            .with_value(aid("a"), 1.0)
            .unwrap()
            .with_value(aid("b"), 100.0)
            .unwrap();
        assert_eq!(series.derive(&aid("a"), &aid("b")).unwrap().value(), 9.0);
        assert_eq!(series.derive(&aid("b"), &aid("a")).unwrap().value(), MIN_JUDGMENT);
    }

    #[test]
    fn missing_magnitude_derives_nothing() {
        let series = distances();
        assert!(series.derive(&aid("near"), &aid("unknown")).is_none());
    }

    #[test]
    fn with_value_rejects_non_positive_magnitudes() {
        let series = MagnitudeSeries::default();
        assert!(series.clone().with_value(aid("a"), 0.0).is_err());
        assert!(series.clone().with_value(aid("a"), -3.0).is_err());
        assert!(series.with_value(aid("a"), f64::NAN).is_err());
    }

    #[test]
    fn with_samples_averages_usable_samples() {
        let series = MagnitudeSeries::new(MagnitudeDirection::LowerIsBetter)
            .with_samples(aid("x"), &[10.0, 20.0, 0.0, -5.0, f64::NAN])
            .unwrap()
            .with_samples(aid("y"), &[30.0])
            .unwrap();

        assert_eq!(series.magnitude(&aid("x")), Some(15.0));
        assert_eq!(series.magnitude(&aid("y")), Some(30.0));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn with_samples_rejects_when_nothing_is_usable() {
        let series = MagnitudeSeries::new(MagnitudeDirection::LowerIsBetter);

        assert!(series.clone().with_samples(aid("z"), &[0.0, -1.0]).is_err());
        assert!(series.with_samples(aid("z"), &[]).is_err());
    }

    #[test]
    fn retain_drops_removed_alternatives() {
        let mut series = distances();
        series.retain(|alternative| alternative.as_str() != "far");
        assert_eq!(series.len(), 1);
        assert!(series.magnitude(&aid("far")).is_none());
    }

    #[test]
    fn default_direction_is_lower_is_better() {
        assert_eq!(MagnitudeDirection::default(), MagnitudeDirection::LowerIsBetter);
    }
}
