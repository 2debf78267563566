//! Decoded roster (solution) model.
//!
//! The decoder produces two views of one solved year:
//! - a per-fellow timeline with one rotation label per week (empty when
//!   a partially managed fellow has no assignment that week);
//! - per-slot weekly occupant lists for the NCC-relevant slots, with an
//!   explicit "Extra" column holding demoted fellows.
//!
//! Presentation adapters consume only these structures.

use serde::{Deserialize, Serialize};

use super::{Cohort, FellowId, Week, WEEKS};

/// Column name for demoted fellows.
pub const EXTRA: &str = "Extra";

/// One fellow's year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FellowTimeline {
    pub fellow: FellowId,
    pub name: String,
    pub cohort: Cohort,
    /// Rotation label per week; empty string when unassigned.
    pub weeks: Vec<String>,
}

impl FellowTimeline {
    /// Label for one week.
    pub fn label(&self, week: Week) -> &str {
        self.weeks.get(week).map(String::as_str).unwrap_or("")
    }

    /// Number of weeks spent on `rotation`.
    pub fn count(&self, rotation: &str) -> usize {
        self.weeks.iter().filter(|l| *l == rotation).count()
    }

    /// Number of weeks without any assignment.
    pub fn unassigned(&self) -> usize {
        self.weeks.iter().filter(|l| l.is_empty()).count()
    }
}

/// Weekly occupants of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotColumn {
    /// Rotation name, or [`EXTRA`].
    pub slot: String,
    /// Fellow names per week, in ascending fellow order.
    pub weeks: Vec<Vec<String>>,
}

impl SlotColumn {
    /// Creates an empty column.
    pub fn new(slot: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            weeks: vec![Vec::new(); WEEKS],
        }
    }

    /// Occupants in one week.
    pub fn occupants(&self, week: Week) -> &[String] {
        self.weeks.get(week).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weeks with nobody on the slot.
    pub fn empty_weeks(&self) -> usize {
        self.weeks.iter().filter(|w| w.is_empty()).count()
    }
}

/// A decoded roster year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSchedule {
    /// One timeline per fellow, in grid order.
    pub timelines: Vec<FellowTimeline>,
    /// Slot columns, core slots first, then [`EXTRA`], then the rest.
    pub slots: Vec<SlotColumn>,
}

impl RosterSchedule {
    /// Timeline of a fellow by name.
    pub fn timeline(&self, name: &str) -> Option<&FellowTimeline> {
        self.timelines.iter().find(|t| t.name == name)
    }

    /// Column for a slot.
    pub fn slot(&self, slot: &str) -> Option<&SlotColumn> {
        self.slots.iter().find(|c| c.slot == slot)
    }

    /// Timelines of one cohort.
    pub fn cohort_timelines(&self, cohort: Cohort) -> impl Iterator<Item = &FellowTimeline> {
        self.timelines.iter().filter(move |t| t.cohort == cohort)
    }
}
