//! Percentage value object (0-100 scale) for final scores.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0 and 100 inclusive.
///
/// Final alternative scores are fractions of 1 scaled by 100, so they carry
/// decimals; the value is kept as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100.0);

    /// Creates a new Percentage, clamping to valid range. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 100.0))
    }

    /// Creates a Percentage, returning error if out of range or not finite.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::out_of_range("percentage", 0.0, 100.0, value));
        }
        Ok(Self(value))
    }

    /// Creates a Percentage from a fraction of one (0.25 becomes 25%).
    pub fn from_fraction(fraction: f64) -> Self {
        Self::new(fraction * 100.0)
    }

    /// Returns the value on the 0-100 scale.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value as a fraction (0.0 to 1.0).
    pub fn as_fraction(&self) -> f64 {
        self.0 / 100.0
    }

    /// Formats with a fixed number of decimals and a trailing `%`.
    pub fn format(&self, decimals: usize) -> String {
        format!("{:.*}%", decimals, self.0)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_range() {
        assert_eq!(Percentage::new(-3.0).value(), 0.0);
        assert_eq!(Percentage::new(42.5).value(), 42.5);
        assert_eq!(Percentage::new(100.0000001).value(), 100.0);
        assert_eq!(Percentage::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn percentage_try_new_rejects_out_of_range() {
        assert!(Percentage::try_new(0.0).is_ok());
        assert!(Percentage::try_new(100.0).is_ok());
        match Percentage::try_new(101.0) {
            Err(ValidationError::OutOfRange { field, actual, .. }) => {
                assert_eq!(field, "percentage");
                assert_eq!(actual, 101.0);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
        assert!(Percentage::try_new(f64::INFINITY).is_err());
    }

    #[test]
    fn percentage_from_fraction_scales_by_hundred() {
        let pct = Percentage::from_fraction(0.4567);
        assert!((pct.value() - 45.67).abs() < 1e-9);
        assert!((pct.as_fraction() - 0.4567).abs() < 1e-12);
    }

    #[test]
    fn percentage_formats_with_requested_decimals() {
        let pct = Percentage::new(33.33333);
        assert_eq!(pct.format(2), "33.33%");
        assert_eq!(pct.format(0), "33%");
        assert_eq!(format!("{}", Percentage::HUNDRED), "100.00%");
    }

    #[test]
    fn percentage_serializes_as_number() {
        let json = serde_json::to_string(&Percentage::new(12.5)).unwrap();
        assert_eq!(json, "12.5");
    }
}
