//! Limits on runs of intensive-care weeks.

use serde::{Deserialize, Serialize};

use super::{check_rotations, invalid, RosterRule, RuleContext};
use crate::cp::{Constraint, ConstraintSet, LinearExpr, Relation};
use crate::models::rotation::{MICU, NCC1, NCC2, SICU, SWING};
use crate::models::{Cohort, WEEKS};
use crate::validation::ValidationError;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// No more than `max_consecutive` ICU-type weeks in any run of
/// `max_consecutive + 1` weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxConsecutiveIcu {
    pub cohorts: Vec<Cohort>,
    pub rotations: Vec<String>,
    pub max_consecutive: usize,
}

impl Default for MaxConsecutiveIcu {
    fn default() -> Self {
        Self {
            cohorts: Cohort::ALL.to_vec(),
            rotations: names(&[NCC1, NCC2, SWING, SICU, MICU]),
            max_consecutive: 8,
        }
    }
}

impl RosterRule for MaxConsecutiveIcu {
    fn name(&self) -> &'static str {
        "max_consecutive_icu"
    }

    fn description(&self) -> &'static str {
        "Caps the length of an uninterrupted run of ICU-type weeks"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.rotations);
        if self.max_consecutive == 0 || self.max_consecutive >= WEEKS {
            errors.push(invalid(
                self.name(),
                format!("run length {} must be in 1..{WEEKS}", self.max_consecutive),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let icu = ctx.rotations.require_all(&self.rotations)?;
        let max = self.max_consecutive;
        let mut set = ConstraintSet::new(self.label());
        if max >= WEEKS {
            return Ok(set);
        }

        for f in ctx.members(&self.cohorts) {
            for start in 0..WEEKS - max {
                let window = (start..=start + max).map(|w| ctx.any_of(f, w, &icu));
                set.push(Constraint::le(LinearExpr::sum(window), max as i64));
            }
        }
        Ok(set)
    }
}

/// No isolated NCC-type weeks: any NCC-type week has at least
/// `min_in_window` NCC-type weeks in the 3-week window centred on it
/// (clipped at the ends of the year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinConsecutiveNcc {
    pub cohorts: Vec<Cohort>,
    pub rotations: Vec<String>,
    pub min_in_window: i64,
}

impl Default for MinConsecutiveNcc {
    fn default() -> Self {
        Self {
            cohorts: Cohort::ALL.to_vec(),
            rotations: names(&[NCC1, NCC2, SWING]),
            min_in_window: 2,
        }
    }
}

impl RosterRule for MinConsecutiveNcc {
    fn name(&self) -> &'static str {
        "min_consecutive_ncc"
    }

    fn description(&self) -> &'static str {
        "Forbids one-week NCC stints"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.rotations);
        if !(1..=3).contains(&self.min_in_window) {
            errors.push(invalid(
                self.name(),
                format!("window minimum {} must be in 1..=3", self.min_in_window),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let ncc = ctx.rotations.require_all(&self.rotations)?;
        let mut set = ConstraintSet::new(self.label());
        for f in ctx.members(&self.cohorts) {
            for w in 0..WEEKS {
                let lo = w.saturating_sub(1);
                let hi = (w + 1).min(WEEKS - 1);
                let window = (lo..=hi).map(|x| ctx.any_of(f, x, &ncc));
                set.push(Constraint::implies(
                    ctx.any_of(f, w, &ncc),
                    LinearExpr::sum(window),
                    Relation::Ge,
                    self.min_in_window,
                ));
            }
        }
        Ok(set)
    }
}
