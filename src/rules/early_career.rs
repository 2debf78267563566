//! Early-career exposure rules for junior fellows.

use serde::{Deserialize, Serialize};

use super::{check_rotations, core_slots, invalid, swing_slot, RosterRule, RuleContext};
use crate::cp::{Constraint, ConstraintSet, LinearExpr, Relation};
use crate::models::rotation::MICU;
use crate::models::{Cohort, WEEKS};
use crate::validation::ValidationError;

/// Pins a cohort to one rotation for the opening weeks of the year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningRotation {
    pub cohorts: Vec<Cohort>,
    pub rotation: String,
    pub weeks: usize,
}

impl Default for OpeningRotation {
    fn default() -> Self {
        Self {
            cohorts: vec![Cohort::JuniorNcc],
            rotation: MICU.to_string(),
            weeks: 4,
        }
    }
}

impl RosterRule for OpeningRotation {
    fn name(&self) -> &'static str {
        "opening_rotation"
    }

    fn description(&self) -> &'static str {
        "Pins a cohort to a fixed rotation for the first weeks of the year"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &[&self.rotation]);
        if self.weeks > WEEKS {
            errors.push(invalid(
                self.name(),
                format!("opening span of {} weeks exceeds the year", self.weeks),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let r = ctx.rotations.require(&self.rotation)?;
        let mut set = ConstraintSet::new(self.label());
        for f in ctx.members(&self.cohorts) {
            for w in 0..self.weeks.min(WEEKS) {
                set.push(Constraint::pin(ctx.grid.var(f, w, r)));
                // Nothing else that week.
                set.push(Constraint::exactly(LinearExpr::sum(ctx.grid.week_vars(f, w)), 1));
            }
        }
        Ok(set)
    }
}

/// At least `min_weeks` core NCC weeks within `[from_week, deadline_week)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreNccByDeadline {
    pub cohorts: Vec<Cohort>,
    pub core_slots: Vec<String>,
    pub from_week: usize,
    pub deadline_week: usize,
    pub min_weeks: i64,
}

impl Default for CoreNccByDeadline {
    fn default() -> Self {
        Self {
            cohorts: vec![Cohort::JuniorNcc],
            core_slots: core_slots(),
            from_week: 4,
            deadline_week: 19,
            min_weeks: 1,
        }
    }
}

impl RosterRule for CoreNccByDeadline {
    fn name(&self) -> &'static str {
        "core_ncc_by_deadline"
    }

    fn description(&self) -> &'static str {
        "Junior fellows reach a core NCC slot before a deadline week"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.core_slots);
        if self.from_week >= self.deadline_week || self.deadline_week > WEEKS {
            errors.push(invalid(
                self.name(),
                format!(
                    "window [{}, {}) is not inside the year",
                    self.from_week, self.deadline_week
                ),
            ));
        } else if self.min_weeks > (self.deadline_week - self.from_week) as i64 {
            errors.push(invalid(
                self.name(),
                format!(
                    "{} weeks cannot fit in [{}, {})",
                    self.min_weeks, self.from_week, self.deadline_week
                ),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let core = ctx.rotations.require_all(&self.core_slots)?;
        let mut set = ConstraintSet::new(self.label());
        for f in ctx.members(&self.cohorts) {
            let window =
                (self.from_week..self.deadline_week.min(WEEKS)).map(|w| ctx.any_of(f, w, &core));
            set.push(Constraint::ge(LinearExpr::sum(window), self.min_weeks));
        }
        Ok(set)
    }
}

/// At least `min_prior` core NCC weeks strictly before the first Swing week.
///
/// Posted as `Swing(f, w) => Σ_{w' < w} core(f, w') >= min_prior` for
/// every week. The first Swing week has the smallest prefix, so the
/// family is equivalent to bounding that week alone. A fellow with no
/// Swing at all would satisfy it vacuously, hence the extra
/// "at least one Swing week" row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NccBeforeFirstSwing {
    pub cohorts: Vec<Cohort>,
    pub core_slots: Vec<String>,
    pub swing: String,
    pub min_prior: i64,
}

impl Default for NccBeforeFirstSwing {
    fn default() -> Self {
        Self {
            cohorts: vec![Cohort::JuniorNcc],
            core_slots: core_slots(),
            swing: swing_slot(),
            min_prior: 4,
        }
    }
}

impl RosterRule for NccBeforeFirstSwing {
    fn name(&self) -> &'static str {
        "ncc_before_first_swing"
    }

    fn description(&self) -> &'static str {
        "Junior fellows complete core NCC weeks before their first Swing"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.core_slots);
        errors.extend(check_rotations(ctx, &[&self.swing]));
        if self.min_prior < 0 || self.min_prior >= WEEKS as i64 {
            errors.push(invalid(
                self.name(),
                format!("prior weeks {} out of range", self.min_prior),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let core = ctx.rotations.require_all(&self.core_slots)?;
        let swing = ctx.rotations.require(&self.swing)?;
        let mut set = ConstraintSet::new(self.label());
        if self.min_prior == 0 {
            return Ok(set);
        }

        for f in ctx.members(&self.cohorts) {
            let mut prior = LinearExpr::new();
            for w in 0..WEEKS {
                set.push(Constraint::implies(
                    ctx.grid.var(f, w, swing),
                    prior.clone(),
                    Relation::Ge,
                    self.min_prior,
                ));
                prior.add_term(1, ctx.any_of(f, w, &core));
            }
            let any_swing = (0..WEEKS).map(|w| ctx.grid.var(f, w, swing));
            set.push(Constraint::ge(LinearExpr::sum(any_swing), 1));
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{violated, Fixture};
    use super::*;
    use crate::models::rotation::{ELECTIVE, NCC1, NCC2, SWING};

    #[test]
    fn test_opening_rotation() {
        let fx = Fixture::small();
        let set = OpeningRotation::default().generate(&fx.ctx()).unwrap();
        assert_eq!(set.len(), 2 * 4);

        let mut a = fx.empty();
        fx.put(&mut a, 0, 0..4, MICU);
        assert_eq!(violated(&set, &a), 0);

        // A sibling rotation in week 2 breaks the exclusive pin.
        fx.put(&mut a, 0, [2], ELECTIVE);
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_opening_rotation_missing_week() {
        let fx = Fixture::small();
        let set = OpeningRotation::default().generate(&fx.ctx()).unwrap();
        let mut a = fx.empty();
        fx.put(&mut a, 0, 0..3, MICU);
        fx.put(&mut a, 0, [3], NCC1);
        // Pin broken, exclusivity holds.
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_core_by_deadline() {
        let fx = Fixture::small();
        let set = CoreNccByDeadline::default().generate(&fx.ctx()).unwrap();
        assert_eq!(set.len(), 1);

        let mut a = fx.empty();
        fx.put(&mut a, 0, [19, 20], NCC1);
        assert_eq!(violated(&set, &a), 1);
        fx.put(&mut a, 0, [18], NCC2);
        assert_eq!(violated(&set, &a), 0);
    }

    #[test]
    fn test_double_booked_week_counts_once() {
        let fx = Fixture::small();
        let rule = CoreNccByDeadline {
            min_weeks: 2,
            ..CoreNccByDeadline::default()
        };
        let set = rule.generate(&fx.ctx()).unwrap();

        let mut a = fx.empty();
        fx.put(&mut a, 0, [5], NCC1);
        fx.put(&mut a, 0, [5], NCC2);
        assert_eq!(violated(&set, &a), 1);
        fx.put(&mut a, 0, [6], NCC2);
        assert_eq!(violated(&set, &a), 0);
    }

    #[test]
    fn test_deadline_window_validated() {
        let fx = Fixture::small();
        let rule = CoreNccByDeadline {
            from_week: 20,
            deadline_week: 10,
            ..CoreNccByDeadline::default()
        };
        assert_eq!(rule.check(&fx.ctx()).len(), 1);

        let rule = CoreNccByDeadline {
            min_weeks: 20,
            ..CoreNccByDeadline::default()
        };
        assert_eq!(rule.check(&fx.ctx()).len(), 1);
    }

    #[test]
    fn test_ncc_before_first_swing() {
        let fx = Fixture::small();
        let set = NccBeforeFirstSwing::default().generate(&fx.ctx()).unwrap();
        // One implication per week plus the "has a Swing" row.
        assert_eq!(set.len(), WEEKS + 1);

        let mut a = fx.empty();
        fx.put(&mut a, 0, 4..8, NCC1);
        fx.put(&mut a, 0, [8, 30], SWING);
        assert_eq!(violated(&set, &a), 0);
    }

    #[test]
    fn test_swing_too_early() {
        let fx = Fixture::small();
        let set = NccBeforeFirstSwing::default().generate(&fx.ctx()).unwrap();

        let mut a = fx.empty();
        fx.put(&mut a, 0, 4..7, NCC1);
        fx.put(&mut a, 0, [7], SWING);
        fx.put(&mut a, 0, 8..10, NCC2);
        fx.put(&mut a, 0, [10], SWING);
        // Week 7 has only three prior core weeks; week 10 is fine.
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_prior_weeks_count_distinct_weeks() {
        let fx = Fixture::small();
        let set = NccBeforeFirstSwing::default().generate(&fx.ctx()).unwrap();

        // Two weeks on both core slots are two weeks, not four.
        let mut a = fx.empty();
        fx.put(&mut a, 0, 4..6, NCC1);
        fx.put(&mut a, 0, 4..6, NCC2);
        fx.put(&mut a, 0, [6], SWING);
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_swing_required() {
        let fx = Fixture::small();
        let set = NccBeforeFirstSwing::default().generate(&fx.ctx()).unwrap();
        let mut a = fx.empty();
        fx.put(&mut a, 0, 0..10, NCC1);
        assert_eq!(violated(&set, &a), 1);
    }

    #[test]
    fn test_zero_prior_emits_nothing() {
        let fx = Fixture::small();
        let rule = NccBeforeFirstSwing {
            min_prior: 0,
            ..NccBeforeFirstSwing::default()
        };
        assert!(rule.generate(&fx.ctx()).unwrap().is_empty());
    }
}
