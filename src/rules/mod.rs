//! Roster rule library.
//!
//! Each rule turns one scheduling policy (coverage, exposure limits,
//! block continuity, service totals, vacation) into a [`ConstraintSet`]
//! over the shared assignment grid. Rules are pure: they read the
//! [`RuleContext`] and return their constraints, so composition is plain
//! conjunction with no ordering dependency.
//!
//! # Usage
//!
//! ```
//! use u_roster::rules::{RuleBook, RuleContext};
//! use u_roster::models::{CohortLists, Roster, RotationSet};
//!
//! let lists = CohortLists::new().with_junior(["A"]).with_senior(["B"]);
//! let roster = Roster::from_lists(&lists);
//! let rotations = RotationSet::standard();
//! let ctx = RuleContext::new(&roster, &rotations, &[]);
//!
//! let book = RuleBook::standard();
//! let sets = book.generate(&ctx).unwrap();
//! assert!(!sets.is_empty());
//! ```
//!
//! # Toggling
//! A [`RuleBook`] holds every rule with an `enabled` flag, so trying a
//! relaxed subset during infeasibility triage is a configuration change.

mod balance;
mod block;
mod coverage;
mod early_career;
mod exposure;
mod service;
mod vacation;

pub use balance::HalfYearBalance;
pub use block::BlockGranularity;
pub use coverage::{DoubleStaffing, FullCoverage, OneRotationPerWeek, SlotCoverage, TrustedOversight};
pub use early_career::{CoreNccByDeadline, NccBeforeFirstSwing, OpeningRotation};
pub use exposure::{MaxConsecutiveIcu, MinConsecutiveNcc};
pub use service::{CumulativeService, RotatingBlocks, ServiceMinimum};
pub use vacation::VacationPinning;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

use crate::cp::{ConstraintSet, Term};
use crate::models::{
    AssignmentGrid, Cohort, FellowId, Roster, RotationId, RotationSet, VacationRequest, Week,
};
use crate::models::rotation::{NCC1, NCC2, SWING};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Everything a rule may read.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub grid: AssignmentGrid,
    pub roster: &'a Roster,
    pub rotations: &'a RotationSet,
    pub vacations: &'a [VacationRequest],
}

impl<'a> RuleContext<'a> {
    /// Creates a context; the grid shape follows the roster and vocabulary.
    pub fn new(
        roster: &'a Roster,
        rotations: &'a RotationSet,
        vacations: &'a [VacationRequest],
    ) -> Self {
        Self {
            grid: AssignmentGrid::new(roster.len(), rotations.len()),
            roster,
            rotations,
            vacations,
        }
    }

    /// Fellows in any of the given cohorts, ascending.
    pub fn members(&self, cohorts: &[Cohort]) -> Vec<FellowId> {
        self.roster.ranges().members(cohorts)
    }

    /// Indicator "fellow is on any of `rotations` in `week`".
    pub fn any_of(&self, fellow: FellowId, week: Week, rotations: &[RotationId]) -> Term {
        Term::any_of(self.grid.vars(fellow, week, rotations))
    }
}

/// A roster policy that emits constraints.
pub trait RosterRule: Debug + Send + Sync {
    /// Rule kind (e.g., "slot_coverage").
    fn name(&self) -> &'static str;

    /// Instance label used for logs, violation reports, and toggling.
    ///
    /// Defaults to [`name`](Self::name); parameterised rules that appear
    /// several times in a book override it.
    fn label(&self) -> String {
        self.name().to_string()
    }

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Validates parameters and rotation names against the context.
    ///
    /// Runs before any constraint is generated.
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError>;

    /// Emits the rule's constraints.
    fn generate(&self, ctx: &RuleContext<'_>) -> Result<ConstraintSet, ValidationError>;
}

/// Every rule the library knows, as tagged configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleConfig {
    FullCoverage(FullCoverage),
    OneRotationPerWeek(OneRotationPerWeek),
    SlotCoverage(SlotCoverage),
    TrustedOversight(TrustedOversight),
    MaxConsecutiveIcu(MaxConsecutiveIcu),
    MinConsecutiveNcc(MinConsecutiveNcc),
    OpeningRotation(OpeningRotation),
    CoreNccByDeadline(CoreNccByDeadline),
    NccBeforeFirstSwing(NccBeforeFirstSwing),
    BlockGranularity(BlockGranularity),
    CumulativeService(CumulativeService),
    RotatingBlocks(RotatingBlocks),
    HalfYearBalance(HalfYearBalance),
    DoubleStaffing(DoubleStaffing),
    VacationPinning(VacationPinning),
}

impl RuleConfig {
    /// The rule behind this configuration.
    pub fn rule(&self) -> &dyn RosterRule {
        match self {
            RuleConfig::FullCoverage(r) => r,
            RuleConfig::OneRotationPerWeek(r) => r,
            RuleConfig::SlotCoverage(r) => r,
            RuleConfig::TrustedOversight(r) => r,
            RuleConfig::MaxConsecutiveIcu(r) => r,
            RuleConfig::MinConsecutiveNcc(r) => r,
            RuleConfig::OpeningRotation(r) => r,
            RuleConfig::CoreNccByDeadline(r) => r,
            RuleConfig::NccBeforeFirstSwing(r) => r,
            RuleConfig::BlockGranularity(r) => r,
            RuleConfig::CumulativeService(r) => r,
            RuleConfig::RotatingBlocks(r) => r,
            RuleConfig::HalfYearBalance(r) => r,
            RuleConfig::DoubleStaffing(r) => r,
            RuleConfig::VacationPinning(r) => r,
        }
    }
}

fn enabled() -> bool {
    true
}

/// A rule with its toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub rule: RuleConfig,
}

impl RuleEntry {
    /// Instance label of the wrapped rule.
    pub fn label(&self) -> String {
        self.rule.rule().label()
    }

    fn matches(&self, key: &str) -> bool {
        let rule = self.rule.rule();
        rule.name() == key || rule.label() == key
    }
}

/// An ordered, toggleable collection of rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    entries: Vec<RuleEntry>,
}

impl RuleBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fellowship's standing rule set.
    ///
    /// Minimum consecutive exposure, half-year balance, and double
    /// staffing are present but disabled.
    pub fn standard() -> Self {
        use crate::models::rotation::{ANAESTHESIA, MICU, NEUROSURGERY, SICU, VASCULAR_CLINIC};
        use Cohort::{JuniorNcc, SeniorNcc};

        Self::new()
            .with_rule(RuleConfig::FullCoverage(FullCoverage::default()))
            .with_rule(RuleConfig::OneRotationPerWeek(OneRotationPerWeek::default()))
            .with_rule(RuleConfig::SlotCoverage(SlotCoverage::default()))
            .with_rule(RuleConfig::TrustedOversight(TrustedOversight::default()))
            .with_rule(RuleConfig::MaxConsecutiveIcu(MaxConsecutiveIcu::default()))
            .with_rule(RuleConfig::OpeningRotation(OpeningRotation::default()))
            .with_rule(RuleConfig::CoreNccByDeadline(CoreNccByDeadline::default()))
            .with_rule(RuleConfig::NccBeforeFirstSwing(NccBeforeFirstSwing::default()))
            .with_rule(RuleConfig::BlockGranularity(BlockGranularity::new(SICU, 4, [JuniorNcc])))
            .with_rule(RuleConfig::BlockGranularity(BlockGranularity::new(
                MICU,
                2,
                [JuniorNcc, SeniorNcc],
            )))
            .with_rule(RuleConfig::BlockGranularity(BlockGranularity::new(
                ANAESTHESIA,
                4,
                [JuniorNcc],
            )))
            .with_rule(RuleConfig::BlockGranularity(BlockGranularity::new(
                VASCULAR_CLINIC,
                4,
                [SeniorNcc],
            )))
            .with_rule(RuleConfig::BlockGranularity(
                BlockGranularity::new(NEUROSURGERY, 4, [SeniorNcc]).with_partial(),
            ))
            .with_rule(RuleConfig::BlockGranularity(BlockGranularity::group(
                [NCC1, NCC2, SWING],
                2,
                Cohort::ALL,
            )))
            .with_rule(RuleConfig::RotatingBlocks(RotatingBlocks::default()))
            .with_rule(RuleConfig::CumulativeService(CumulativeService::stroke()))
            .with_rule(RuleConfig::CumulativeService(CumulativeService::junior()))
            .with_rule(RuleConfig::CumulativeService(CumulativeService::senior()))
            .with_rule(RuleConfig::VacationPinning(VacationPinning::default()))
            .with_disabled(RuleConfig::MinConsecutiveNcc(MinConsecutiveNcc::default()))
            .with_disabled(RuleConfig::HalfYearBalance(HalfYearBalance::default()))
            .with_disabled(RuleConfig::DoubleStaffing(DoubleStaffing::default()))
    }

    /// Appends an enabled rule.
    pub fn with_rule(mut self, rule: RuleConfig) -> Self {
        self.entries.push(RuleEntry {
            enabled: true,
            rule,
        });
        self
    }

    /// Appends a disabled rule.
    pub fn with_disabled(mut self, rule: RuleConfig) -> Self {
        self.entries.push(RuleEntry {
            enabled: false,
            rule,
        });
        self
    }

    /// Enables every rule whose name or label equals `key`. Returns the match count.
    pub fn enable(&mut self, key: &str) -> usize {
        self.set_enabled(key, true)
    }

    /// Disables every rule whose name or label equals `key`. Returns the match count.
    pub fn disable(&mut self, key: &str) -> usize {
        self.set_enabled(key, false)
    }

    fn set_enabled(&mut self, key: &str, on: bool) -> usize {
        let mut n = 0;
        for e in self.entries.iter_mut().filter(|e| e.matches(key)) {
            e.enabled = on;
            n += 1;
        }
        n
    }

    /// A copy with exactly the rules matching `keys` enabled.
    pub fn only(&self, keys: &[&str]) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|e| RuleEntry {
                enabled: keys.iter().any(|k| e.matches(k)),
                rule: e.rule.clone(),
            })
            .collect();
        Self { entries }
    }

    /// All entries, enabled or not.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Enabled rules in book order.
    pub fn active(&self) -> impl Iterator<Item = &dyn RosterRule> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.rule.rule())
    }

    /// Labels of the enabled rules.
    pub fn enabled_labels(&self) -> Vec<String> {
        self.active().map(|r| r.label()).collect()
    }

    /// Validates every enabled rule; collects all problems.
    pub fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        self.active().flat_map(|r| r.check(ctx)).collect()
    }

    /// Generates the constraint sets of every enabled rule.
    pub fn generate(&self, ctx: &RuleContext<'_>) -> Result<Vec<ConstraintSet>, ValidationError> {
        self.active()
            .map(|r| {
                let set = r.generate(ctx)?;
                debug!(rule = %set.origin(), constraints = set.len(), "rule generated");
                Ok(set)
            })
            .collect()
    }
}

// ======================== Shared helpers ========================

/// Default core slots.
pub(crate) fn core_slots() -> Vec<String> {
    vec![NCC1.to_string(), NCC2.to_string()]
}

/// Default swing slot.
pub(crate) fn swing_slot() -> String {
    SWING.to_string()
}

/// Collects missing-rotation errors for a list of names.
pub(crate) fn check_rotations<S: AsRef<str>>(ctx: &RuleContext<'_>, names: &[S]) -> Vec<ValidationError> {
    names
        .iter()
        .filter_map(|n| ctx.rotations.require(n.as_ref()).err())
        .collect()
}

/// Error for a bad parameter of `rule`.
pub(crate) fn invalid(rule: &str, message: impl AsRef<str>) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::InvalidParameter,
        format!("{rule}: {}", message.as_ref()),
    )
}

/// Error when a rule needs at least one fellow in `cohorts`.
pub(crate) fn require_members(
    ctx: &RuleContext<'_>,
    rule: &str,
    cohorts: &[Cohort],
) -> Option<ValidationError> {
    if ctx.members(cohorts).is_empty() {
        let names: Vec<&str> = cohorts.iter().map(|c| c.label()).collect();
        Some(ValidationError::new(
            ValidationErrorKind::EmptyCohort,
            format!("{rule}: needs at least one fellow in {}", names.join(" / ")),
        ))
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Fixture;
    use super::*;

    #[test]
    fn test_standard_book_contents() {
        let book = RuleBook::standard();
        let labels = book.enabled_labels();
        assert!(labels.contains(&"slot_coverage".to_string()));
        assert!(labels.contains(&"block_granularity:NS/4+partial".to_string()));
        assert_eq!(labels.iter().filter(|l| *l == "trusted_oversight").count(), 1);
        assert!(!labels.contains(&"half_year_balance".to_string()));
        assert_eq!(book.entries().len(), labels.len() + 3);
    }

    #[test]
    fn test_toggle_by_name_and_label() {
        let mut book = RuleBook::standard();
        assert_eq!(book.disable("block_granularity"), 6);
        assert!(book
            .enabled_labels()
            .iter()
            .all(|l| !l.starts_with("block_granularity")));
        assert_eq!(book.enable("block_granularity:SICU/4"), 1);
        assert_eq!(book.enable("half_year_balance"), 1);
        assert!(book.enabled_labels().contains(&"half_year_balance".to_string()));
    }

    #[test]
    fn test_only_subset() {
        let book = RuleBook::standard().only(&["full_coverage", "vacation"]);
        assert_eq!(book.enabled_labels(), vec!["full_coverage", "vacation"]);
        assert_eq!(book.entries().len(), RuleBook::standard().entries().len());
    }

    #[test]
    fn test_generate_standard_on_small_roster() {
        let fx = Fixture::small();
        let book = RuleBook::standard();
        assert!(book.check(&fx.ctx()).is_empty());
        let sets = book.generate(&fx.ctx()).unwrap();
        assert_eq!(sets.len(), book.enabled_labels().len());
    }

    #[test]
    fn test_check_reports_missing_rotations() {
        let mut fx = Fixture::small();
        fx.rotations = RotationSet::new(["NCC1", "NCC2", "Vac", "Elec"]);
        let errors = RuleBook::standard().check(&fx.ctx());
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MissingRotation && e.message.contains("Swing")));
    }

    #[test]
    fn test_book_json_round_trip() {
        let book = RuleBook::standard();
        let json = serde_json::to_string(&book).unwrap();
        let back: RuleBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }

    #[test]
    fn test_entry_defaults_to_enabled() {
        let json = r#"[{"rule": "full_coverage", "cohorts": ["junior_ncc"]}]"#;
        let book: RuleBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.enabled_labels(), vec!["full_coverage"]);
    }
}
