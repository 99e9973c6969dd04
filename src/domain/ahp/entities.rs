//! Hierarchy entities - criteria, sub-criteria and alternatives.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AlternativeId, CriterionId, SubCriterionId, ValidationError};

fn validated_name(field: &str, name: impl Into<String>) -> Result<String, ValidationError> {
    let name = name.into();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

/// A top-level criterion of the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
}

impl Criterion {
    /// Creates a criterion; the name must not be blank.
    pub fn new(id: CriterionId, name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: validated_name("criterion_name", name)?,
        })
    }
}

/// A refinement of exactly one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCriterion {
    pub id: SubCriterionId,
    pub name: String,
    pub criterion_id: CriterionId,
}

impl SubCriterion {
    /// Creates a sub-criterion owned by `criterion_id`.
    pub fn new(
        id: SubCriterionId,
        name: impl Into<String>,
        criterion_id: CriterionId,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: validated_name("sub_criterion_name", name)?,
            criterion_id,
        })
    }
}

/// An option being ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: AlternativeId,
    pub name: String,
}

impl Alternative {
    pub fn new(id: AlternativeId, name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: validated_name("alternative_name", name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let criterion = Criterion::new(CriterionId::new("cost").unwrap(), "  Cost ").unwrap();
        assert_eq!(criterion.name, "Cost");
    }

    #[test]
    fn blank_names_are_rejected() {
        let result = Alternative::new(AlternativeId::new("a1").unwrap(), "   ");
        assert_eq!(result, Err(ValidationError::empty_field("alternative_name")));
    }

    #[test]
    fn sub_criterion_keeps_its_owner() {
        let sub = SubCriterion::new(
            SubCriterionId::new("rent").unwrap(),
            "Rent",
            CriterionId::new("cost").unwrap(),
        )
        .unwrap();
        assert_eq!(sub.criterion_id.as_str(), "cost");
    }
}
