//! Half-year load balancing.

use serde::{Deserialize, Serialize};

use super::{check_rotations, invalid, RosterRule, RuleContext};
use crate::cp::{Constraint, ConstraintSet, LinearExpr};
use crate::models::rotation::MICU;
use crate::models::{Cohort, WEEKS};
use crate::validation::ValidationError;

/// First-half and second-half counts of a rotation differ by at most
/// `tolerance` weeks, per fellow.
///
/// `|a - b| <= k` is posted as the pair `a - b <= k`, `b - a <= k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfYearBalance {
    pub rotations: Vec<String>,
    pub cohorts: Vec<Cohort>,
    pub tolerance: i64,
}

impl Default for HalfYearBalance {
    fn default() -> Self {
        Self {
            rotations: vec![MICU.to_string()],
            cohorts: vec![Cohort::JuniorNcc, Cohort::SeniorNcc],
            tolerance: 6,
        }
    }
}

impl RosterRule for HalfYearBalance {
    fn name(&self) -> &'static str {
        "half_year_balance"
    }

    fn description(&self) -> &'static str {
        "Spreads a rotation evenly over both halves of the year"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.rotations);
        if self.tolerance < 0 {
            errors.push(invalid(self.name(), "tolerance must be non-negative"));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let ids = ctx.rotations.require_all(&self.rotations)?;
        let half = WEEKS / 2;
        let mut set = ConstraintSet::new(self.label());

        for f in ctx.members(&self.cohorts) {
            for &r in &ids {
                let first = LinearExpr::sum(ctx.grid.span_vars(f, 0..half, r));
                let second = LinearExpr::sum(ctx.grid.span_vars(f, half..WEEKS, r));
                let diff = first.clone() + (-1 * second.clone());
                set.push(Constraint::le(diff, self.tolerance));
                set.push(Constraint::le(second + (-1 * first), self.tolerance));
            }
        }
        Ok(set)
    }
}
