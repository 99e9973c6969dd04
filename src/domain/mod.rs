//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `ahp` - Analytic Hierarchy Process engine (judgments, matrices, priorities,
//!   consistency, hierarchy composition, ranking)

pub mod ahp;
pub mod foundation;
