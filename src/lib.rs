//! Fellowship duty rostering.
//!
//! Builds one year (52 weeks) of rotation assignments for a clinical
//! fellowship with four cohorts. Scheduling policy is expressed as a
//! library of independent rules over a boolean (fellow, week, rotation)
//! grid; a feasibility engine finds an assignment and the decoder turns
//! it into per-fellow timelines and per-slot occupant lists.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Cohort`, `Roster`, `RotationSet`,
//!   `AssignmentGrid`, `VacationRequest`, `WeekCalendar`, `RosterSchedule`
//! - **`cp`**: Constraint representation, `RosterModel`, and the `Engine`
//!   implementation (`MilpEngine`, with a cooperative time limit and
//!   warm start)
//! - **`rules`**: The rule library and the toggleable `RuleBook`
//! - **`scheduler`**: `RosterSolver`, `RosterDecoder`, `RosterKpi`
//! - **`config`**: `RosterConfig`, loadable from JSON
//! - **`validation`**: Configuration checks run before generation
//! - **`error`**: `RosterError` and `DecodeError`
//!
//! # Example
//!
//! ```no_run
//! use u_roster::{CohortLists, RosterConfig, RosterSolver, VacationRequest};
//!
//! let config = RosterConfig::new(
//!     CohortLists::new()
//!         .with_junior(["J1", "J2"])
//!         .with_senior(["S1", "S2"])
//!         .with_stroke(["K1", "K2", "K3", "K4"])
//!         .with_ccm((1..=15).map(|i| format!("C{i}"))),
//! )
//! .with_vacation(VacationRequest::new("J1", [1, 7, 36]));
//!
//! match RosterSolver::standard(config).solve() {
//!     Ok(solution) => println!("{:?}", solution.schedule.slot("NCC1")),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Williams (2013), "Model Building in Mathematical Programming"

pub mod config;
pub mod cp;
pub mod error;
pub mod models;
pub mod rules;
pub mod scheduler;
pub mod validation;

pub use config::{RosterConfig, SolverSettings};
pub use error::{DecodeError, RosterError, RosterResult};
pub use models::{CohortLists, RosterSchedule, VacationRequest, WeekCalendar};
pub use rules::RuleBook;
pub use scheduler::{RosterDecoder, RosterKpi, RosterSolution, RosterSolver};
