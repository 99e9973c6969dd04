//! AHP Engine - Multi-criteria decision support
//!
//! This crate implements the Analytic Hierarchy Process: pairwise judgments
//! between criteria, sub-criteria and alternatives are turned into priority
//! vectors, checked for consistency and composed into a final ranking.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
