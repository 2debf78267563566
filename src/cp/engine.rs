//! Solving engine contract.
//!
//! An engine receives a composed [`RosterModel`], searches for an
//! assignment satisfying every constraint, and either returns that
//! assignment or reports infeasibility. The current rule set is pure
//! feasibility; no objective is required.

use super::{RawAssignment, RosterModel};
use crate::error::RosterResult;

/// Result of a feasibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutcome {
    /// A satisfying assignment, one value per grid variable.
    Satisfiable(RawAssignment),
    /// No assignment satisfies the model.
    Unsatisfiable,
}

impl EngineOutcome {
    /// Whether a solution was found.
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, EngineOutcome::Satisfiable(_))
    }
}

/// A feasibility engine.
///
/// Implementations must be deterministic for identical models when the
/// backend is, and must not hold state across calls.
pub trait Engine {
    /// Engine name for logs.
    fn name(&self) -> &'static str;

    /// Checks the model and extracts a model assignment when satisfiable.
    ///
    /// Errors are reserved for engine failures (timeouts, backend
    /// errors); infeasibility is an [`EngineOutcome`], not an error.
    fn check(&self, model: &RosterModel) -> RosterResult<EngineOutcome>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn check(&self, model: &RosterModel) -> RosterResult<EngineOutcome> {
        (**self).check(model)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn check(&self, model: &RosterModel) -> RosterResult<EngineOutcome> {
        (**self).check(model)
    }
}
