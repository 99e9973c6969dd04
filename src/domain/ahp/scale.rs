//! Saaty scale value objects for pairwise judgments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Smallest admissible judgment (the reciprocal of "extremely more important").
pub const MIN_JUDGMENT: f64 = 1.0 / 9.0;

/// Largest admissible judgment ("extremely more important").
pub const MAX_JUDGMENT: f64 = 9.0;

/// 1/9 rounded to two decimals, as editors store it.
const ROUNDED_MIN_JUDGMENT: f64 = 0.11;

/// The reciprocal of `ROUNDED_MIN_JUDGMENT`, rounded the same way.
const ROUNDED_MAX_JUDGMENT: f64 = 9.09;

/// A validated pairwise judgment: "A is `value` times as important as B".
///
/// Always finite, strictly positive and within `[1/9, 9]`. A raw value of 0
/// means "unset" at the input boundary and never becomes a `JudgmentValue`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct JudgmentValue(f64);

impl JudgmentValue {
    /// Indifference (A and B equally important).
    pub const INDIFFERENCE: Self = Self(1.0);

    /// Creates a judgment, rejecting values that are not finite or fall outside `[1/9, 9]`.
    ///
    /// Two-decimal renderings of the bounds (`0.11`, `9.09`) are accepted and
    /// clamped onto the scale.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::invalid_format(
                "judgment",
                "must be a finite number",
            ));
        }
        if !(ROUNDED_MIN_JUDGMENT..=ROUNDED_MAX_JUDGMENT).contains(&value) {
            return Err(ValidationError::out_of_range(
                "judgment",
                MIN_JUDGMENT,
                MAX_JUDGMENT,
                value,
            ));
        }
        Ok(Self(value.clamp(MIN_JUDGMENT, MAX_JUDGMENT)))
    }

    /// Creates a judgment from an arbitrary positive ratio, clamping it onto the scale.
    ///
    /// Returns `None` for ratios that are not finite or not strictly positive.
    pub fn from_ratio(ratio: f64) -> Option<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return None;
        }
        Some(Self(ratio.clamp(MIN_JUDGMENT, MAX_JUDGMENT)))
    }

    /// Creates a judgment from a signed slider position in `-4..=4`.
    ///
    /// Negative positions favour the left entity, positive positions the right one.
    pub fn from_slider(position: i8) -> Result<Self, ValidationError> {
        let intensity = SaatyIntensity::from_step(position.unsigned_abs()).ok_or_else(|| {
            ValidationError::out_of_range("slider_position", -4.0, 4.0, f64::from(position))
        })?;
        let magnitude = intensity.value();
        if position > 0 {
            Ok(Self(1.0 / magnitude))
        } else {
            Ok(Self(magnitude))
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the judgment for the reversed pair, kept on the scale.
    pub fn reciprocal(&self) -> Self {
        Self((1.0 / self.0).clamp(MIN_JUDGMENT, MAX_JUDGMENT))
    }

    /// Returns the nearest Saaty intensity, ignoring which side is favoured.
    pub fn intensity(&self) -> SaatyIntensity {
        let strength = if self.0 >= 1.0 { self.0 } else { 1.0 / self.0 };
        SaatyIntensity::ALL
            .iter()
            .copied()
            .min_by(|a, b| {
                (a.value() - strength)
                    .abs()
                    .total_cmp(&(b.value() - strength).abs())
            })
            .unwrap_or(SaatyIntensity::Equal)
    }
}

impl Default for JudgmentValue {
    fn default() -> Self {
        Self::INDIFFERENCE
    }
}

impl TryFrom<f64> for JudgmentValue {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<JudgmentValue> for f64 {
    fn from(value: JudgmentValue) -> Self {
        value.0
    }
}

impl fmt::Display for JudgmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1.0 {
            write!(f, "{}", trim_decimal(self.0))
        } else {
            write!(f, "1/{}", trim_decimal(1.0 / self.0))
        }
    }
}

fn trim_decimal(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// The odd steps of the fundamental Saaty scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SaatyIntensity {
    Equal,
    Moderate,
    Strong,
    VeryStrong,
    Extreme,
}

impl SaatyIntensity {
    /// All intensities, weakest first.
    pub const ALL: [SaatyIntensity; 5] = [
        SaatyIntensity::Equal,
        SaatyIntensity::Moderate,
        SaatyIntensity::Strong,
        SaatyIntensity::VeryStrong,
        SaatyIntensity::Extreme,
    ];

    /// Maps a slider step (distance from the centre, 0..=4) to an intensity.
    pub fn from_step(step: u8) -> Option<Self> {
        Self::ALL.get(usize::from(step)).copied()
    }

    /// Returns the scale value (1, 3, 5, 7 or 9).
    pub fn value(&self) -> f64 {
        match self {
            SaatyIntensity::Equal => 1.0,
            SaatyIntensity::Moderate => 3.0,
            SaatyIntensity::Strong => 5.0,
            SaatyIntensity::VeryStrong => 7.0,
            SaatyIntensity::Extreme => 9.0,
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            SaatyIntensity::Equal => "Equal importance",
            SaatyIntensity::Moderate => "Moderately more important",
            SaatyIntensity::Strong => "Strongly more important",
            SaatyIntensity::VeryStrong => "Very strongly more important",
            SaatyIntensity::Extreme => "Extremely more important",
        }
    }
}
