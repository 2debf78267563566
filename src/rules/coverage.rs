//! Coverage rules: who must be somewhere, and how many per slot.
//!
//! - [`FullCoverage`]: fully managed fellows work every week.
//! - [`OneRotationPerWeek`]: nobody holds two rotations in one week.
//! - [`SlotCoverage`]: core NCC slots staffed 1..=2 each, at most one
//!   extra overall, Swing at most one and filled in all but `deficit` weeks.
//! - [`TrustedOversight`]: a trusted cohort is on a core slot every week.
//! - [`DoubleStaffing`]: a rotation doubled over a fixed span of weeks.

use serde::{Deserialize, Serialize};

use super::{check_rotations, core_slots, invalid, require_members, swing_slot, RosterRule, RuleContext};
use crate::cp::{Constraint, ConstraintSet, LinearExpr, Term};
use crate::models::rotation::MICU;
use crate::models::{Cohort, WEEKS};
use crate::validation::ValidationError;

/// Fully managed fellows have at least one rotation every week.
///
/// Together with [`OneRotationPerWeek`] this yields exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullCoverage {
    pub cohorts: Vec<Cohort>,
}

impl Default for FullCoverage {
    fn default() -> Self {
        Self {
            cohorts: vec![Cohort::JuniorNcc, Cohort::SeniorNcc],
        }
    }
}

impl RosterRule for FullCoverage {
    fn name(&self) -> &'static str {
        "full_coverage"
    }

    fn description(&self) -> &'static str {
        "Fully managed fellows have a rotation every week"
    }

    fn check(&self, _ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        Vec::new()
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let mut set = ConstraintSet::new(self.label());
        for f in ctx.members(&self.cohorts) {
            for w in 0..WEEKS {
                set.push(Constraint::ge(LinearExpr::sum(ctx.grid.week_vars(f, w)), 1));
            }
        }
        Ok(set)
    }
}

/// At most one rotation per fellow per week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneRotationPerWeek {
    pub cohorts: Vec<Cohort>,
}

impl Default for OneRotationPerWeek {
    fn default() -> Self {
        Self {
            cohorts: Cohort::ALL.to_vec(),
        }
    }
}

impl RosterRule for OneRotationPerWeek {
    fn name(&self) -> &'static str {
        "one_rotation_per_week"
    }

    fn description(&self) -> &'static str {
        "No fellow holds two rotations in the same week"
    }

    fn check(&self, _ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        Vec::new()
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let mut set = ConstraintSet::new(self.label());
        for f in ctx.members(&self.cohorts) {
            for w in 0..WEEKS {
                set.push(Constraint::le(LinearExpr::sum(ctx.grid.week_vars(f, w)), 1));
            }
        }
        Ok(set)
    }
}

/// Weekly headcount bounds on the NCC slots.
///
/// Per week: each core slot has `min_per_slot..=max_per_slot` fellows,
/// the core slots together hold at most `max_core_total`, and Swing
/// holds at most `max_swing`. Over the year, Swing is filled in at least
/// `52 - swing_deficit` weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotCoverage {
    pub core_slots: Vec<String>,
    pub swing: String,
    pub min_per_slot: i64,
    pub max_per_slot: i64,
    pub max_core_total: i64,
    pub max_swing: i64,
    pub swing_deficit: usize,
}

impl Default for SlotCoverage {
    fn default() -> Self {
        Self {
            core_slots: core_slots(),
            swing: swing_slot(),
            min_per_slot: 1,
            max_per_slot: 2,
            max_core_total: 3,
            max_swing: 1,
            swing_deficit: 8,
        }
    }
}

impl SlotCoverage {
    /// Sets the number of weeks Swing may go unfilled.
    pub fn with_deficit(mut self, deficit: usize) -> Self {
        self.swing_deficit = deficit;
        self
    }
}

impl RosterRule for SlotCoverage {
    fn name(&self) -> &'static str {
        "slot_coverage"
    }

    fn description(&self) -> &'static str {
        "Core NCC slots staffed every week; Swing filled except for a deficit budget"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.core_slots);
        errors.extend(check_rotations(ctx, &[&self.swing]));
        if self.core_slots.is_empty() {
            errors.push(invalid(self.name(), "at least one core slot is required"));
        }
        if self.min_per_slot < 0 || self.min_per_slot > self.max_per_slot {
            errors.push(invalid(
                self.name(),
                format!(
                    "per-slot bounds {}..={} are empty or negative",
                    self.min_per_slot, self.max_per_slot
                ),
            ));
        }
        if self.max_core_total < self.min_per_slot * self.core_slots.len() as i64 {
            errors.push(invalid(
                self.name(),
                format!(
                    "core total cap {} cannot cover {} slots at {} each",
                    self.max_core_total,
                    self.core_slots.len(),
                    self.min_per_slot
                ),
            ));
        }
        if self.max_swing < 0 {
            errors.push(invalid(self.name(), "swing cap must be non-negative"));
        }
        if self.swing_deficit > WEEKS {
            errors.push(invalid(
                self.name(),
                format!("swing deficit {} exceeds {WEEKS} weeks", self.swing_deficit),
            ));
        }
        errors.extend(require_members(ctx, self.name(), &Cohort::ALL));
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let core = ctx.rotations.require_all(&self.core_slots)?;
        let swing = ctx.rotations.require(&self.swing)?;
        let swing_weeks = WEEKS.checked_sub(self.swing_deficit).ok_or_else(|| {
            invalid(
                self.name(),
                format!("swing deficit {} exceeds {WEEKS} weeks", self.swing_deficit),
            )
        })?;
        let everyone = ctx.members(&Cohort::ALL);
        let mut set = ConstraintSet::new(self.label());
        let mut swing_year = LinearExpr::new();

        for w in 0..WEEKS {
            for &slot in &core {
                let on_slot = LinearExpr::sum(everyone.iter().map(|&f| ctx.grid.var(f, w, slot)));
                set.push(Constraint::ge(on_slot.clone(), self.min_per_slot));
                set.push(Constraint::le(on_slot, self.max_per_slot));
            }

            let on_core = LinearExpr::sum(everyone.iter().map(|&f| ctx.any_of(f, w, &core)));
            set.push(Constraint::le(on_core, self.max_core_total));

            let on_swing = LinearExpr::sum(everyone.iter().map(|&f| ctx.grid.var(f, w, swing)));
            set.push(Constraint::le(on_swing.clone(), self.max_swing));
            swing_year.add_scaled(1, &on_swing);
        }

        set.push(Constraint::ge(swing_year, swing_weeks as i64));
        Ok(set)
    }
}

/// Every week, at least one trusted fellow is on a core slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustedOversight {
    pub cohorts: Vec<Cohort>,
    pub core_slots: Vec<String>,
}

impl Default for TrustedOversight {
    fn default() -> Self {
        Self {
            cohorts: vec![Cohort::JuniorNcc, Cohort::SeniorNcc, Cohort::Stroke],
            core_slots: core_slots(),
        }
    }
}

impl RosterRule for TrustedOversight {
    fn name(&self) -> &'static str {
        "trusted_oversight"
    }

    fn description(&self) -> &'static str {
        "A trusted cohort holds a core NCC slot every week"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.core_slots);
        errors.extend(require_members(ctx, self.name(), &self.cohorts));
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let core = ctx.rotations.require_all(&self.core_slots)?;
        let trusted = ctx.members(&self.cohorts);
        let mut set = ConstraintSet::new(self.label());
        for w in 0..WEEKS {
            let on_core = LinearExpr::sum(trusted.iter().map(|&f| ctx.any_of(f, w, &core)));
            set.push(Constraint::ge(on_core, 1));
        }
        Ok(set)
    }
}

/// A rotation staffed by exactly `count` fellows over `[from_week, to_week)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleStaffing {
    pub rotation: String,
    pub cohorts: Vec<Cohort>,
    pub from_week: usize,
    pub to_week: usize,
    pub count: i64,
}

impl Default for DoubleStaffing {
    /// The fourth four-week block on MICU.
    fn default() -> Self {
        Self {
            rotation: MICU.to_string(),
            cohorts: vec![Cohort::JuniorNcc, Cohort::SeniorNcc],
            from_week: 12,
            to_week: 16,
            count: 2,
        }
    }
}

impl RosterRule for DoubleStaffing {
    fn name(&self) -> &'static str {
        "double_staffing"
    }

    fn description(&self) -> &'static str {
        "A rotation runs with a fixed doubled headcount over a span of weeks"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &[&self.rotation]);
        if self.from_week >= self.to_week || self.to_week > WEEKS {
            errors.push(invalid(
                self.name(),
                format!("span [{}, {}) is not inside the year", self.from_week, self.to_week),
            ));
        }
        let pool = ctx.members(&self.cohorts).len() as i64;
        if self.count < 0 || self.count > pool {
            errors.push(invalid(
                self.name(),
                format!("headcount {} not achievable with {pool} fellows", self.count),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let r = ctx.rotations.require(&self.rotation)?;
        let pool = ctx.members(&self.cohorts);
        let mut set = ConstraintSet::new(self.label());
        for w in self.from_week..self.to_week.min(WEEKS) {
            let on = LinearExpr::sum(pool.iter().map(|&f| Term::Var(ctx.grid.var(f, w, r))));
            set.push(Constraint::exactly(on, self.count));
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{violated, Fixture};
    use super::*;
    use crate::models::rotation::{NCC1, NCC2, SWING};
    use crate::models::CohortLists;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_full_coverage_counts() {
        let fx = Fixture::small();
        let set = FullCoverage::default().generate(&fx.ctx()).unwrap();
        // Junior and senior, every week.
        assert_eq!(set.len(), 2 * WEEKS);

        let mut a = fx.empty();
        assert_eq!(violated(&set, &a), 2 * WEEKS);
        fx.put(&mut a, 0, 0..WEEKS, MICU);
        fx.put(&mut a, 1, 0..WEEKS, "Elec");
        assert_eq!(violated(&set, &a), 0);
    }

    #[test]
    fn test_one_rotation_per_week() {
        let fx = Fixture::small();
        let set = OneRotationPerWeek::default().generate(&fx.ctx()).unwrap();
        assert_eq!(set.len(), 4 * WEEKS);

        let mut a = fx.empty();
        fx.put(&mut a, 3, [7], NCC1);
        assert_eq!(violated(&set, &a), 0);
        fx.put(&mut a, 3, [7], SWING);
        assert_eq!(violated(&set, &a), 1);
    }

    /// Junior on NCC1 and senior on NCC2 every week, stroke on Swing.
    fn covered(fx: &Fixture) -> crate::cp::RawAssignment {
        let mut a = fx.empty();
        fx.put(&mut a, 0, 0..WEEKS, NCC1);
        fx.put(&mut a, 1, 0..WEEKS, NCC2);
        fx.put(&mut a, 2, 0..WEEKS, SWING);
        a
    }

    #[test]
    fn test_slot_coverage_satisfied() {
        let fx = Fixture::small();
        let set = SlotCoverage::default().generate(&fx.ctx()).unwrap();
        assert_eq!(violated(&set, &covered(&fx)), 0);
    }

    #[test]
    fn test_slot_coverage_uncovered_core() {
        let fx = Fixture::small();
        let set = SlotCoverage::default().generate(&fx.ctx()).unwrap();
        let mut a = fx.empty();
        fx.put(&mut a, 0, 0..WEEKS, NCC1);
        fx.put(&mut a, 2, 0..WEEKS, SWING);
        // NCC2 empty every week.
        assert_eq!(violated(&set, &a), WEEKS);
    }

    #[test]
    fn test_slot_coverage_caps() {
        let fx = Fixture::small();
        let set = SlotCoverage::default().generate(&fx.ctx()).unwrap();
        let mut a = covered(&fx);
        // Week 3: CCM joins NCC1 (2 on NCC1, 3 on core) - allowed.
        fx.put(&mut a, 3, [3], NCC1);
        assert_eq!(violated(&set, &a), 0);

        // Week 5: CCM on Swing with the stroke fellow - Swing cap broken.
        fx.put(&mut a, 3, [5], SWING);
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_slot_coverage_core_total_cap() {
        let fx = Fixture::new(
            CohortLists::new()
                .with_junior(["J1", "J2"])
                .with_senior(["S1", "S2"]),
        );
        let set = SlotCoverage::default().generate(&fx.ctx()).unwrap();
        let mut a = fx.empty();
        fx.put(&mut a, 0, 0..WEEKS, NCC1);
        fx.put(&mut a, 1, 0..WEEKS, NCC2);
        fx.put(&mut a, 2, 0..WEEKS, SWING);
        fx.put(&mut a, 3, [10], NCC1);
        assert_eq!(violated(&set, &a), 0);
        // 4 on core in week 10.
        fx.put(&mut a, 2, [10], NCC2);
        let swing = fx.rot(SWING);
        a.set(fx.ctx().grid.var(2, 10, swing), false);
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_swing_deficit_budget() {
        let fx = Fixture::small();
        let rule = SlotCoverage::default().with_deficit(2);
        let set = rule.generate(&fx.ctx()).unwrap();
        let swing = fx.rot(SWING);
        let grid = fx.ctx().grid;

        let mut a = covered(&fx);
        a.set(grid.var(2, 0, swing), false);
        a.set(grid.var(2, 1, swing), false);
        assert_eq!(violated(&set, &a), 0);
        a.set(grid.var(2, 2, swing), false);
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_slot_coverage_rejects_bad_parameters() {
        let fx = Fixture::small();
        let mut rule = SlotCoverage::default().with_deficit(60);
        rule.min_per_slot = 3;
        let errors = rule.check(&fx.ctx());
        assert!(errors.len() >= 3);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidParameter));
    }

    #[test]
    fn test_oversized_deficit_fails_generation() {
        let fx = Fixture::small();
        let err = SlotCoverage::default()
            .with_deficit(60)
            .generate(&fx.ctx())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidParameter);
        assert!(err.message.contains("60"));

        // The whole year may go without Swing.
        let set = SlotCoverage::default()
            .with_deficit(WEEKS)
            .generate(&fx.ctx())
            .unwrap();
        assert!(!set.is_empty());
    }

    #[test]
    fn test_slot_coverage_needs_fellows() {
        let fx = Fixture::new(CohortLists::new());
        let errors = SlotCoverage::default().check(&fx.ctx());
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyCohort));
    }

    #[test]
    fn test_trusted_oversight() {
        let fx = Fixture::small();
        let set = TrustedOversight::default().generate(&fx.ctx()).unwrap();
        assert_eq!(set.len(), WEEKS);

        let mut a = fx.empty();
        // Only the CCM fellow on core: violation every week.
        fx.put(&mut a, 3, 0..WEEKS, NCC1);
        assert_eq!(violated(&set, &a), WEEKS);
        // Stroke fellow on NCC2 for all but one week.
        fx.put(&mut a, 2, 1..WEEKS, NCC2);
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_oversight_requires_trusted_cohort() {
        let fx = Fixture::new(CohortLists::new().with_ccm(["C1", "C2"]));
        let errors = TrustedOversight::default().check(&fx.ctx());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyCohort);
    }

    #[test]
    fn test_double_staffing() {
        let fx = Fixture::small();
        let set = DoubleStaffing::default().generate(&fx.ctx()).unwrap();
        assert_eq!(set.len(), 4);

        let mut a = fx.empty();
        fx.put(&mut a, 0, 12..16, MICU);
        assert_eq!(violated(&set, &a), 4);
        fx.put(&mut a, 1, 12..16, MICU);
        assert_eq!(violated(&set, &a), 0);
    }

    #[test]
    fn test_double_staffing_bad_span() {
        let fx = Fixture::small();
        let rule = DoubleStaffing {
            from_week: 50,
            to_week: 54,
            ..DoubleStaffing::default()
        };
        assert_eq!(rule.check(&fx.ctx()).len(), 1);
    }
}
