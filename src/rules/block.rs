//! Block granularity: rotations taken in whole aligned blocks.
//!
//! A block rule covers one rotation, or a group of rotations treated as
//! one ("on any of them"), for a set of cohorts. Within each aligned
//! block of `size` weeks the indicator is constant. The partial variant
//! additionally accepts exactly the leading `size - 1` weeks, for
//! rotations whose last week is routinely split.

use serde::{Deserialize, Serialize};

use super::{check_rotations, invalid, RosterRule, RuleContext};
use crate::cp::{Constraint, ConstraintSet, Term};
use crate::models::{aligned_blocks, Cohort, RotationId, WEEKS};
use crate::validation::ValidationError;

/// Whole-block constraint for one rotation or a group of rotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGranularity {
    pub rotations: Vec<String>,
    pub cohorts: Vec<Cohort>,
    pub size: usize,
    #[serde(default)]
    pub allow_partial: bool,
}

impl BlockGranularity {
    /// Block rule for a single rotation.
    pub fn new(
        rotation: impl Into<String>,
        size: usize,
        cohorts: impl IntoIterator<Item = Cohort>,
    ) -> Self {
        Self {
            rotations: vec![rotation.into()],
            cohorts: cohorts.into_iter().collect(),
            size,
            allow_partial: false,
        }
    }

    /// Block rule for a group of rotations counted as one.
    pub fn group<S: Into<String>>(
        rotations: impl IntoIterator<Item = S>,
        size: usize,
        cohorts: impl IntoIterator<Item = Cohort>,
    ) -> Self {
        Self {
            rotations: rotations.into_iter().map(Into::into).collect(),
            cohorts: cohorts.into_iter().collect(),
            size,
            allow_partial: false,
        }
    }

    /// Also accept a block of exactly the leading `size - 1` weeks.
    pub fn with_partial(mut self) -> Self {
        self.allow_partial = true;
        self
    }

    fn indicator(ctx: &RuleContext<'_>, f: usize, w: usize, ids: &[RotationId]) -> Term {
        ctx.any_of(f, w, ids)
    }
}

impl RosterRule for BlockGranularity {
    fn name(&self) -> &'static str {
        "block_granularity"
    }

    fn label(&self) -> String {
        format!(
            "{}:{}/{}{}",
            self.name(),
            self.rotations.join("|"),
            self.size,
            if self.allow_partial { "+partial" } else { "" }
        )
    }

    fn description(&self) -> &'static str {
        "Rotation taken only in whole aligned blocks"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &self.rotations);
        if self.rotations.is_empty() {
            errors.push(invalid(&self.label(), "no rotation given"));
        }
        if self.size < 2 || self.size > WEEKS {
            errors.push(invalid(
                &self.label(),
                format!("block size {} must be in 2..={WEEKS}", self.size),
            ));
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let ids = ctx.rotations.require_all(&self.rotations)?;
        let mut set = ConstraintSet::new(self.label());
        if self.size < 2 {
            return Ok(set);
        }

        for f in ctx.members(&self.cohorts) {
            for block in aligned_blocks(self.size) {
                let head = Self::indicator(ctx, f, block.start, &ids);
                // A clipped tail block has no partial exception.
                let partial = self.allow_partial && block.len() == self.size;
                let last = block.end - 1;

                for w in block.start + 1..block.end {
                    let t = Self::indicator(ctx, f, w, &ids);
                    if partial && w == last {
                        set.push(Constraint::at_most(t, head.clone()));
                    } else {
                        set.push(Constraint::same(head.clone(), t));
                    }
                }
            }
        }
        Ok(set)
    }
}
