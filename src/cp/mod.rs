//! Constraint formulation and solving engines.
//!
//! Rules describe the roster as linear constraints over 0/1 terms of the
//! assignment grid. This module holds that representation, the
//! [`Engine`] contract that turns a composed [`RosterModel`] into a raw
//! assignment, and the engines themselves.
//!
//! # Engines
//! - [`MilpEngine`]: `good_lp` with the pure-Rust `microlp` backend,
//!   with an optional cooperative time limit and warm start.
//!
//! # Reference
//! - Rossi et al. (2006), "Handbook of Constraint Programming", Ch. 1
//! - Williams (2013), "Model Building in Mathematical Programming"

mod assignment;
mod constraint;
mod engine;
mod expr;
mod milp;

pub use assignment::RawAssignment;
pub use constraint::{
    Constraint, ConstraintSet, LinearConstraint, Relation, RosterModel, RuleViolation,
};
pub use engine::{Engine, EngineOutcome};
pub use expr::{LinearExpr, Term};
pub use milp::MilpEngine;
