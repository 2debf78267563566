//! Vacation pinning with overflow to elective.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{check_rotations, RosterRule, RuleContext};
use crate::cp::{Constraint, ConstraintSet};
use crate::models::rotation::{ELECTIVE, VACATION};
use crate::models::{FellowId, VacationRequest, WEEKS};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Pins requested weeks: the first `quota` distinct weeks per fellow to
/// Vacation, the rest to the overflow rotation.
///
/// Several requests naming the same fellow are merged in order before
/// the quota is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacationPinning {
    pub quota: usize,
    pub vacation: String,
    pub overflow: String,
}

impl Default for VacationPinning {
    fn default() -> Self {
        Self {
            quota: 3,
            vacation: VACATION.to_string(),
            overflow: ELECTIVE.to_string(),
        }
    }
}

/// Requests grouped per fellow, in first-seen order.
fn merged(ctx: &RuleContext<'_>) -> Result<Vec<(FellowId, VacationRequest)>, ValidationError> {
    let mut out: Vec<(FellowId, VacationRequest)> = Vec::new();
    for req in ctx.vacations {
        let fellow = ctx
            .roster
            .find(&req.fellow)
            .ok_or_else(|| unknown_fellow(&req.fellow))?;
        match out.iter_mut().find(|(id, _)| *id == fellow.id) {
            Some((_, acc)) => acc.weeks.extend_from_slice(&req.weeks),
            None => out.push((fellow.id, req.clone())),
        }
    }
    Ok(out)
}

fn unknown_fellow(name: &str) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::UnknownFellow,
        format!("Vacation request for unknown fellow '{name}'"),
    )
}

impl RosterRule for VacationPinning {
    fn name(&self) -> &'static str {
        "vacation"
    }

    fn description(&self) -> &'static str {
        "Honours vacation requests up to a quota; extra weeks become elective"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = check_rotations(ctx, &[&self.vacation, &self.overflow]);
        for req in ctx.vacations {
            if ctx.roster.find(&req.fellow).is_none() {
                errors.push(unknown_fellow(&req.fellow));
            }
            for &w in req.weeks.iter().filter(|&&w| w >= WEEKS) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::WeekOutOfRange,
                    format!("Vacation week {w} for '{}' is outside 0..{WEEKS}", req.fellow),
                ));
            }
        }
        errors
    }

    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError> {
        let vac = ctx.rotations.require(&self.vacation)?;
        let over = ctx.rotations.require(&self.overflow)?;
        let mut set = ConstraintSet::new(self.label());

        for (fellow, req) in merged(ctx)? {
            let split = req.split(self.quota);
            if !split.overflow.is_empty() {
                warn!(
                    fellow = %req.fellow,
                    quota = self.quota,
                    overflow = ?split.overflow,
                    "vacation requests over quota moved to {}",
                    self.overflow
                );
            }
            for w in split.granted.into_iter().filter(|&w| w < WEEKS) {
                set.push(Constraint::pin(ctx.grid.var(fellow, w, vac)));
            }
            for w in split.overflow.into_iter().filter(|&w| w < WEEKS) {
                set.push(Constraint::pin(ctx.grid.var(fellow, w, over)));
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{violated, Fixture};
    use super::*;

    #[test]
    fn test_quota_then_overflow() {
        let mut fx = Fixture::small();
        fx.vacations = vec![VacationRequest::new("J", [1, 7, 36, 40])];
        let rule = VacationPinning::default();
        assert!(rule.check(&fx.ctx()).is_empty());
        let set = rule.generate(&fx.ctx()).unwrap();
        assert_eq!(set.len(), 4);

        let mut a = fx.empty();
        fx.put(&mut a, 0, [1, 7, 36], VACATION);
        fx.put(&mut a, 0, [40], ELECTIVE);
        assert_eq!(violated(&set, &a), 0);

        // Vacation on the fourth week does not satisfy the overflow pin.
        let mut b = fx.empty();
        fx.put(&mut b, 0, [1, 7, 36, 40], VACATION);
        assert_eq!(violated(&set, &b), 1);
    }

    #[test]
    fn test_duplicates_and_merging() {
        let mut fx = Fixture::small();
        fx.vacations = vec![
            VacationRequest::new("S", [5, 5, 9]),
            VacationRequest::new("K", [2]),
            VacationRequest::new("S", [9, 11, 20]),
        ];
        let set = VacationPinning::default().generate(&fx.ctx()).unwrap();
        // S: 5, 9, 11 granted, 20 overflow. K: 2 granted.
        assert_eq!(set.len(), 5);

        let mut a = fx.empty();
        fx.put(&mut a, 1, [5, 9, 11], VACATION);
        fx.put(&mut a, 1, [20], ELECTIVE);
        fx.put(&mut a, 2, [2], VACATION);
        assert_eq!(violated(&set, &a), 0);
    }

    #[test]
    fn test_unknown_fellow_and_bad_week() {
        let mut fx = Fixture::small();
        fx.vacations = vec![
            VacationRequest::new("Nobody", [3]),
            VacationRequest::new("C", [52, 60]),
        ];
        let errors = VacationPinning::default().check(&fx.ctx());
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownFellow);
        assert!(errors[1..]
            .iter()
            .all(|e| e.kind == ValidationErrorKind::WeekOutOfRange));

        let err = VacationPinning::default().generate(&fx.ctx()).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownFellow);
    }

    #[test]
    fn test_no_requests() {
        let fx = Fixture::small();
        assert!(VacationPinning::default()
            .generate(&fx.ctx())
            .unwrap()
            .is_empty());
    }
}
