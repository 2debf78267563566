//! Fellows and the per-run roster.
//!
//! A [`Roster`] is built once per solve from four ordered name lists,
//! one per cohort. Fellows receive stable indices in grid order
//! (Junior, Senior, Stroke, CCM), so every cohort occupies a contiguous
//! half-open index range.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::Cohort;

/// Stable fellow index within a run.
pub type FellowId = usize;

/// A person to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fellow {
    /// Index into the assignment grid.
    pub id: FellowId,
    /// Display name.
    pub name: String,
    /// Owning cohort.
    pub cohort: Cohort,
}

/// Ordered fellow names per cohort, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortLists {
    #[serde(default)]
    pub junior_ncc: Vec<String>,
    #[serde(default)]
    pub senior_ncc: Vec<String>,
    #[serde(default)]
    pub stroke: Vec<String>,
    #[serde(default)]
    pub ccm: Vec<String>,
}

impl CohortLists {
    /// Creates empty cohort lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the junior NCC fellows.
    pub fn with_junior<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.junior_ncc = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the senior NCC fellows.
    pub fn with_senior<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.senior_ncc = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the stroke fellows.
    pub fn with_stroke<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.stroke = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the CCM fellows.
    pub fn with_ccm<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.ccm = names.into_iter().map(Into::into).collect();
        self
    }

    /// Names for one cohort.
    pub fn names(&self, cohort: Cohort) -> &[String] {
        match cohort {
            Cohort::JuniorNcc => &self.junior_ncc,
            Cohort::SeniorNcc => &self.senior_ncc,
            Cohort::Stroke => &self.stroke,
            Cohort::Ccm => &self.ccm,
        }
    }

    /// Total number of names across cohorts.
    pub fn len(&self) -> usize {
        Cohort::ALL.iter().map(|&c| self.names(c).len()).sum()
    }

    /// Whether no cohort has any fellow.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Half-open fellow index ranges per cohort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortRanges {
    bounds: [Range<usize>; 4],
}

impl CohortRanges {
    /// Range for one cohort.
    #[inline]
    pub fn of(&self, cohort: Cohort) -> Range<usize> {
        self.bounds[cohort.ordinal()].clone()
    }

    /// Fellow indices belonging to any of the given cohorts, ascending.
    pub fn members(&self, cohorts: &[Cohort]) -> Vec<FellowId> {
        let mut ids: Vec<FellowId> = Cohort::ALL
            .iter()
            .filter(|c| cohorts.contains(c))
            .flat_map(|&c| self.of(c))
            .collect();
        ids.dedup();
        ids
    }

    /// Number of fellows in one cohort.
    pub fn count(&self, cohort: Cohort) -> usize {
        self.of(cohort).len()
    }
}

/// All fellows for a run, in grid order.
#[derive(Debug, Clone)]
pub struct Roster {
    fellows: Vec<Fellow>,
    ranges: CohortRanges,
}

impl Roster {
    /// Lays out the cohort lists in grid order.
    pub fn from_lists(lists: &CohortLists) -> Self {
        let mut fellows = Vec::with_capacity(lists.len());
        let mut bounds: [Range<usize>; 4] = Default::default();

        for cohort in Cohort::ALL {
            let start = fellows.len();
            for name in lists.names(cohort) {
                fellows.push(Fellow {
                    id: fellows.len(),
                    name: name.clone(),
                    cohort,
                });
            }
            bounds[cohort.ordinal()] = start..fellows.len();
        }

        Self {
            fellows,
            ranges: CohortRanges { bounds },
        }
    }

    /// All fellows.
    #[inline]
    pub fn fellows(&self) -> &[Fellow] {
        &self.fellows
    }

    /// Fellow by index.
    #[inline]
    pub fn fellow(&self, id: FellowId) -> Option<&Fellow> {
        self.fellows.get(id)
    }

    /// Cohort index ranges.
    #[inline]
    pub fn ranges(&self) -> &CohortRanges {
        &self.ranges
    }

    /// Looks up a fellow by display name.
    pub fn find(&self, name: &str) -> Option<&Fellow> {
        self.fellows.iter().find(|f| f.name == name)
    }

    /// Number of fellows.
    #[inline]
    pub fn len(&self) -> usize {
        self.fellows.len()
    }

    /// Whether the roster is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fellows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists() -> CohortLists {
        CohortLists::new()
            .with_junior(["J1", "J2"])
            .with_senior(["S1"])
            .with_stroke(["K1", "K2", "K3"])
            .with_ccm(["C1"])
    }

    #[test]
    fn test_grid_order_and_ranges() {
        let roster = Roster::from_lists(&lists());
        assert_eq!(roster.len(), 7);
        assert_eq!(roster.ranges().of(Cohort::JuniorNcc), 0..2);
        assert_eq!(roster.ranges().of(Cohort::SeniorNcc), 2..3);
        assert_eq!(roster.ranges().of(Cohort::Stroke), 3..6);
        assert_eq!(roster.ranges().of(Cohort::Ccm), 6..7);
        assert_eq!(roster.fellow(3).unwrap().name, "K1");
        assert_eq!(roster.fellow(3).unwrap().cohort, Cohort::Stroke);
    }

    #[test]
    fn test_members_of_several_cohorts() {
        let roster = Roster::from_lists(&lists());
        let ids = roster
            .ranges()
            .members(&[Cohort::Ccm, Cohort::JuniorNcc]);
        assert_eq!(ids, vec![0, 1, 6]);
    }

    #[test]
    fn test_empty_cohort_range() {
        let roster = Roster::from_lists(&CohortLists::new().with_junior(["J1"]).with_ccm(["C1"]));
        assert!(roster.ranges().of(Cohort::SeniorNcc).is_empty());
        assert_eq!(roster.ranges().of(Cohort::Ccm), 1..2);
    }

    #[test]
    fn test_find_by_name() {
        let roster = Roster::from_lists(&lists());
        assert_eq!(roster.find("S1").map(|f| f.id), Some(2));
        assert!(roster.find("nobody").is_none());
    }
}
