//! Roster quality metrics (KPIs).
//!
//! Computes coverage and workload indicators from a decoded roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Rotation weeks | Weeks per rotation, per fellow |
//! | Uncovered Swing | Weeks with nobody on Swing |
//! | Extra weeks | Weeks in which somebody was demoted to Extra |
//! | Core headcount | Min / max fellows on core slots in a week (Extra included) |
//! | Idle managed weeks | Blank weeks of fully managed fellows |

use std::collections::BTreeMap;

use crate::models::{RosterSchedule, SlotColumn, EXTRA, WEEKS};

/// Roster performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterKpi {
    /// Fellow name → rotation → weeks.
    pub rotation_weeks: BTreeMap<String, BTreeMap<String, usize>>,
    /// Weeks with an empty Swing column.
    pub uncovered_swing_weeks: usize,
    /// Weeks with at least one demoted fellow.
    pub extra_weeks: usize,
    /// Fewest fellows on core slots in any week.
    pub min_core_headcount: usize,
    /// Most fellows on core slots in any week.
    pub max_core_headcount: usize,
    /// Blank weeks summed over fully managed fellows.
    pub idle_managed_weeks: usize,
}

impl RosterKpi {
    /// Computes KPIs from a decoded roster.
    ///
    /// Core slots are the columns listed before [`EXTRA`]; the column
    /// after it is Swing.
    pub fn calculate(schedule: &RosterSchedule) -> Self {
        let rotation_weeks = schedule
            .timelines
            .iter()
            .map(|t| {
                let mut counts = BTreeMap::new();
                for label in t.weeks.iter().filter(|l| !l.is_empty()) {
                    *counts.entry(label.clone()).or_insert(0) += 1;
                }
                (t.name.clone(), counts)
            })
            .collect();

        let extra_at = schedule.slots.iter().position(|c| c.slot == EXTRA);
        let (core, extra, swing): (&[SlotColumn], Option<&SlotColumn>, Option<&SlotColumn>) =
            match extra_at {
                Some(i) => (
                    &schedule.slots[..i],
                    schedule.slots.get(i),
                    schedule.slots.get(i + 1),
                ),
                None => (&schedule.slots[..], None, None),
            };

        let uncovered_swing_weeks = swing.map_or(0, SlotColumn::empty_weeks);
        let extra_weeks = extra.map_or(0, |c| WEEKS - c.empty_weeks());

        let mut min_core = usize::MAX;
        let mut max_core = 0;
        for w in 0..WEEKS {
            let named: usize = core.iter().map(|c| c.occupants(w).len()).sum();
            let demoted = extra.map_or(0, |c| {
                c.occupants(w)
                    .iter()
                    .filter(|name| {
                        schedule
                            .timeline(name)
                            .is_some_and(|t| core.iter().any(|c| c.slot == t.label(w)))
                    })
                    .count()
            });
            let headcount = named + demoted;
            min_core = min_core.min(headcount);
            max_core = max_core.max(headcount);
        }

        let idle_managed_weeks = schedule
            .timelines
            .iter()
            .filter(|t| t.cohort.is_fully_managed())
            .map(|t| t.unassigned())
            .sum();

        Self {
            rotation_weeks,
            uncovered_swing_weeks,
            extra_weeks,
            min_core_headcount: min_core,
            max_core_headcount: max_core,
            idle_managed_weeks,
        }
    }

    /// Weeks a fellow spent on a rotation.
    pub fn weeks_on(&self, fellow: &str, rotation: &str) -> usize {
        self.rotation_weeks
            .get(fellow)
            .and_then(|m| m.get(rotation))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the roster meets the given coverage thresholds.
    pub fn meets_thresholds(&self, max_uncovered_swing: usize, min_core_headcount: usize) -> bool {
        self.uncovered_swing_weeks <= max_uncovered_swing
            && self.min_core_headcount >= min_core_headcount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cohort, FellowTimeline};

    fn timeline(id: usize, name: &str, cohort: Cohort, fill: &[(usize, &str)]) -> FellowTimeline {
        let mut weeks = vec![String::new(); WEEKS];
        for &(w, label) in fill {
            weeks[w] = label.to_string();
        }
        FellowTimeline {
            fellow: id,
            name: name.into(),
            cohort,
            weeks,
        }
    }

    fn column(slot: &str, fill: &[(usize, &str)]) -> SlotColumn {
        let mut c = SlotColumn::new(slot);
        for &(w, name) in fill {
            c.weeks[w].push(name.to_string());
        }
        c
    }

    fn sample() -> RosterSchedule {
        let all_ncc1: Vec<(usize, &str)> = (0..WEEKS).map(|w| (w, "NCC1")).collect();
        let all_ncc2: Vec<(usize, &str)> = (0..WEEKS).map(|w| (w, "NCC2")).collect();
        let jun: Vec<(usize, &str)> = (0..WEEKS).map(|w| (w, "Jun")).collect();
        let sen: Vec<(usize, &str)> = (0..WEEKS).map(|w| (w, "Sen")).collect();

        RosterSchedule {
            timelines: vec![
                timeline(0, "Jun", Cohort::JuniorNcc, &all_ncc1),
                timeline(1, "Sen", Cohort::SeniorNcc, &all_ncc2[..50]),
                timeline(2, "Ccm", Cohort::Ccm, &[(3, "NCC1"), (4, "Swing")]),
            ],
            slots: vec![
                column("NCC1", &jun),
                column("NCC2", &sen[..50]),
                column(EXTRA, &[(3, "Ccm")]),
                column("Swing", &[(4, "Ccm")]),
            ],
        }
    }

    #[test]
    fn test_kpi_counts() {
        let kpi = RosterKpi::calculate(&sample());
        assert_eq!(kpi.weeks_on("Jun", "NCC1"), WEEKS);
        assert_eq!(kpi.weeks_on("Sen", "NCC2"), 50);
        assert_eq!(kpi.weeks_on("Ccm", "Swing"), 1);
        assert_eq!(kpi.weeks_on("Nobody", "NCC1"), 0);
        assert_eq!(kpi.uncovered_swing_weeks, WEEKS - 1);
        assert_eq!(kpi.extra_weeks, 1);
        assert_eq!(kpi.idle_managed_weeks, 2);
    }

    #[test]
    fn test_kpi_core_headcount() {
        let kpi = RosterKpi::calculate(&sample());
        // Weeks 50-51: junior only. Week 3: junior, senior, demoted CCM.
        assert_eq!(kpi.min_core_headcount, 1);
        assert_eq!(kpi.max_core_headcount, 3);
    }

    #[test]
    fn test_meets_thresholds() {
        let kpi = RosterKpi::calculate(&sample());
        assert!(kpi.meets_thresholds(WEEKS, 1));
        assert!(!kpi.meets_thresholds(8, 1));
        assert!(!kpi.meets_thresholds(WEEKS, 2));
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = RosterKpi::calculate(&RosterSchedule::default());
        assert!(kpi.rotation_weeks.is_empty());
        assert_eq!(kpi.uncovered_swing_weeks, 0);
        assert_eq!(kpi.min_core_headcount, 0);
        assert_eq!(kpi.max_core_headcount, 0);
    }
}
