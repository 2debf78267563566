//! Yearly service totals.
//!
//! [`CumulativeService`] sets per-cohort minimum weeks on named
//! rotations plus a combined core NCC ("NICU") minimum. [`RotatingBlocks`]
//! gives rotating cohorts an exact NCC and Swing allowance that must
//! land in aligned blocks with one Swing week per block.

use serde::{Deserialize, Serialize};

use super::{check_rotations, core_slots, invalid, swing_slot, RosterRule, RuleContext};
use crate::cp::{Constraint, ConstraintSet, LinearExpr};
use crate::models::rotation::{
    ANAESTHESIA, ELECTIVE, MICU, NEUROSURGERY, SICU, SWING, VACATION, VASCULAR_CLINIC,
};
use crate::models::{aligned_blocks, Cohort, WEEKS};
use crate::validation::ValidationError;

/// Minimum weeks on one rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMinimum {
    pub rotation: String,
    pub weeks: usize,
}

impl ServiceMinimum {
    pub fn new(rotation: impl Into<String>, weeks: usize) -> Self {
        Self {
            rotation: rotation.into(),
            weeks,
        }
    }
}

/// Per-fellow yearly minimums for a set of cohorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeService {
    pub cohorts: Vec<Cohort>,
    #[serde(default)]
    pub minimums: Vec<ServiceMinimum>,
    #[serde(default = "core_slots")]
    pub core_slots: Vec<String>,
    #[serde(default)]
    pub min_core_weeks: usize,
}

impl CumulativeService {
    /// Empty requirement set for `cohorts`.
    pub fn new(cohorts: impl IntoIterator<Item = Cohort>) -> Self {
        Self {
            cohorts: cohorts.into_iter().collect(),
            minimums: Vec::new(),
            core_slots: core_slots(),
            min_core_weeks: 0,
        }
    }

    /// Adds a rotation minimum.
    pub fn with_minimum(mut self, rotation: impl Into<String>, weeks: usize) -> Self {
        self.minimums.push(ServiceMinimum::new(rotation, weeks));
        self
    }

    /// Sets the combined core NCC minimum.
    pub fn with_core_weeks(mut self, weeks: usize) -> Self {
        self.min_core_weeks = weeks;
        self
    }

    /// Junior NCC year.
    pub fn junior() -> Self {
        Self::new([Cohort::JuniorNcc])
            .with_minimum(MICU, 20)
            .with_minimum(ANAESTHESIA, 4)
            .with_minimum(ELECTIVE, 9)
            .with_minimum(VACATION, 3)
            .with_minimum(SICU, 4)
            .with_minimum(SWING, 3)
            .with_core_weeks(9)
    }

    /// Senior NCC year.
    pub fn senior() -> Self {
        Self::new([Cohort::SeniorNcc])
            .with_minimum(MICU, 8)
            .with_minimum(ELECTIVE, 10)
            .with_minimum(VACATION, 3)
            .with_minimum(NEUROSURGERY, 7)
            .with_minimum(VASCULAR_CLINIC, 4)
            .with_minimum(SWING, 6)
            .with_core_weeks(14)
    }

    /// Stroke fellows' NCC share.
    pub fn stroke() -> Self {
        Self::new([Cohort::Stroke])
            .with_minimum(SWING, 2)
            .with_core_weeks(6)
    }

    fn total(&self) -> usize {
        self.minimums.iter().map(|m| m.weeks).sum::<usize>() + self.min_core_weeks
    }
}

impl RosterRule for CumulativeService {
    fn name(&self) -> &'static str {
        "cumulative_service"
    }

    fn label(&self) -> String {
        let keys: Vec<&str> = self.cohorts.iter().map(|c| c.key()).collect();
        format!("{}:{}", self.name(), keys.join("+"))
    }

    fn description(&self) -> &'static str {
        "Minimum yearly weeks per rotation for a cohort"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let names: Vec<&str> = self.minimums.iter().map(|m| m.rotation.as_str()).collect();
        let mut errors = check_rotations(ctx, &names);
        if self.min_core_weeks > 0 {
            errors.extend(check_rotations(ctx, &self.core_slots));
        }
        // Assumes the core slots are not among the named minimums.
        if self.total() > WEEKS {
            errors.push(invalid(
                &self.label(),
                format!("minimums add up to {} weeks", self.total()),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let mut required = Vec::with_capacity(self.minimums.len());
        for m in &self.minimums {
            required.push((ctx.rotations.require(&m.rotation)?, m.weeks));
        }
        let core = if self.min_core_weeks > 0 {
            ctx.rotations.require_all(&self.core_slots)?
        } else {
            Vec::new()
        };

        let mut set = ConstraintSet::new(self.label());
        for f in ctx.members(&self.cohorts) {
            for &(r, weeks) in required.iter().filter(|(_, weeks)| *weeks > 0) {
                let year = ctx.grid.span_vars(f, 0..WEEKS, r);
                set.push(Constraint::ge(LinearExpr::sum(year), weeks as i64));
            }
            if self.min_core_weeks > 0 {
                let year = (0..WEEKS).map(|w| ctx.any_of(f, w, &core));
                set.push(Constraint::ge(LinearExpr::sum(year), self.min_core_weeks as i64));
            }
        }
        Ok(set)
    }
}

/// Exact NCC and Swing allowance for rotating cohorts, in aligned blocks.
///
/// For each fellow: exactly `core_weeks` core weeks and `swing_weeks`
/// Swing weeks over the year; every aligned block of `block` weeks is
/// either entirely on NCC-type duty (core or Swing) or entirely off it,
/// and an on-block contains exactly one Swing week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatingBlocks {
    pub cohorts: Vec<Cohort>,
    pub core_slots: Vec<String>,
    pub swing: String,
    pub core_weeks: usize,
    pub swing_weeks: usize,
    pub block: usize,
}

impl Default for RotatingBlocks {
    fn default() -> Self {
        Self {
            cohorts: vec![Cohort::Ccm],
            core_slots: core_slots(),
            swing: swing_slot(),
            core_weeks: 3,
            swing_weeks: 1,
            block: 4,
        }
    }
}

impl RosterRule for RotatingBlocks {
    fn name(&self) -> &'static str {
        "rotating_blocks"
    }

    fn description(&self) -> &'static str {
        "Rotating cohorts serve NCC in aligned blocks with one Swing week each"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.core_slots);
        errors.extend(check_rotations(ctx, &[&self.swing]));
        let on_weeks = self.core_weeks + self.swing_weeks;
        if self.block < 2 || on_weeks % self.block != 0 {
            errors.push(invalid(
                self.name(),
                format!(
                    "{on_weeks} NCC-type weeks do not fill whole {}-week blocks",
                    self.block
                ),
            ));
        } else if self.swing_weeks != on_weeks / self.block {
            errors.push(invalid(
                self.name(),
                format!(
                    "{} Swing weeks do not give one per block ({} blocks)",
                    self.swing_weeks,
                    on_weeks / self.block
                ),
            ));
        }
        if on_weeks > WEEKS {
            errors.push(invalid(
                self.name(),
                format!("{on_weeks} NCC-type weeks exceed the year"),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let core = ctx.rotations.require_all(&self.core_slots)?;
        let swing = ctx.rotations.require(&self.swing)?;
        let mut ncc_type = core.clone();
        ncc_type.push(swing);

        let mut set = ConstraintSet::new(self.label());
        if self.block < 2 {
            return Ok(set);
        }

        for f in ctx.members(&self.cohorts) {
            let core_year = (0..WEEKS).map(|w| ctx.any_of(f, w, &core));
            set.push(Constraint::exactly(LinearExpr::sum(core_year), self.core_weeks as i64));
            let swing_year = ctx.grid.span_vars(f, 0..WEEKS, swing);
            set.push(Constraint::exactly(LinearExpr::sum(swing_year), self.swing_weeks as i64));

            for block in aligned_blocks(self.block) {
                let head = ctx.any_of(f, block.start, &ncc_type);
                for w in block.start + 1..block.end {
                    set.push(Constraint::same(head.clone(), ctx.any_of(f, w, &ncc_type)));
                }
                let swings = ctx.grid.span_vars(f, block.clone(), swing);
                set.push(Constraint::exactly(
                    LinearExpr::sum(swings).with_term(-1, head),
                    0,
                ));
            }
        }
        Ok(set)
    }
}
