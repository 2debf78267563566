//! Rostering domain models.
//!
//! Provides the fixed vocabulary of a fellowship roster: cohorts,
//! fellows, rotations, the week grid of decision variables, vacation
//! requests, the calendar mapping, and the decoded schedule.
//!
//! # Domain Mappings
//!
//! | u-roster | Meaning |
//! |----------|---------|
//! | Fellow | Person to schedule, member of one cohort |
//! | Rotation | Weekly duty category (NCC1, Swing, MICU, ...) |
//! | Week | Index in `[0, 52)` from the year's anchor date |
//! | Grid | One boolean per (fellow, week, rotation) |

mod calendar;
mod cohort;
mod fellow;
mod grid;
pub mod rotation;
mod schedule;
mod vacation;

pub use calendar::{CalendarError, WeekCalendar};
pub use cohort::Cohort;
pub use fellow::{CohortLists, CohortRanges, Fellow, FellowId, Roster};
pub use grid::{aligned_blocks, AssignmentGrid, VarId, VarKey, Week, WEEKS};
pub use rotation::{RotationId, RotationSet};
pub use schedule::{FellowTimeline, RosterSchedule, SlotColumn, EXTRA};
pub use vacation::{VacationRequest, VacationSplit};
