//! Roster solving, decoding, and KPI evaluation.
//!
//! Provides the end-to-end solve pipeline and roster quality metrics.
//!
//! # Pipeline
//!
//! `RosterSolver` validates the configuration, composes the constraint
//! sets of the enabled rules into one model, runs a feasibility engine,
//! verifies the answer, and hands it to `RosterDecoder`. A previous
//! roster can seed the solve: accepted as is when it already satisfies
//! the rules, otherwise passed to the engine as a warm start.
//!
//! # KPI
//!
//! `RosterKpi` computes coverage metrics: uncovered Swing weeks, Extra
//! weeks, core headcount range, and per-fellow rotation totals.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models", EJOR 153(1)
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering",
//!   Journal of Scheduling 7(6)

mod decoder;
mod kpi;
mod solver;

pub use decoder::RosterDecoder;
pub use kpi::RosterKpi;
pub use solver::{RosterSolution, RosterSolver};
