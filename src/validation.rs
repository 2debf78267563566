//! Configuration validation.
//!
//! Runs before any constraint is generated and reports every problem at
//! once:
//! - Duplicate or blank fellow names, empty roster
//! - Duplicate or blank rotation names
//! - Vacation requests for unknown fellows or outside the year
//! - Rule parameters and the rotation names each enabled rule needs
//! - A zero solver time limit

use std::collections::HashSet;

use crate::config::RosterConfig;
use crate::models::{Roster, WEEKS};
use crate::rules::RuleContext;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A rule references a rotation missing from the vocabulary.
    MissingRotation,
    /// The vocabulary lists a rotation twice.
    DuplicateRotation,
    /// A cohort some rule depends on has no fellows.
    EmptyCohort,
    /// Two fellows share a name.
    DuplicateFellow,
    /// A vacation request names nobody on the roster.
    UnknownFellow,
    /// A week index outside `[0, 52)`.
    WeekOutOfRange,
    /// A rule parameter is out of range or inconsistent.
    InvalidParameter,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster configuration.
///
/// Checks:
/// 1. Fellow names are unique and non-blank, and the roster is not empty
/// 2. Rotation names are unique and non-blank
/// 3. Vacation requests name known fellows and weeks in `[0, 52)`
/// 4. Every enabled rule accepts its parameters (only when 1 and 2 pass,
///    since rule checks resolve names)
/// 5. The solver time limit, when set, is positive
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &RosterConfig) -> ValidationResult {
    let mut errors = Vec::new();

    // Fellows
    let mut names = HashSet::new();
    for cohort in crate::models::Cohort::ALL {
        for name in config.fellows.names(cohort) {
            if name.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParameter,
                    format!("Blank fellow name in cohort {cohort}"),
                ));
            } else if !names.insert(name.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateFellow,
                    format!("Duplicate fellow name: {name}"),
                ));
            }
        }
    }
    if config.fellows.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCohort,
            "Roster has no fellows",
        ));
    }

    // Rotations
    let mut rotations = HashSet::new();
    for name in config.rotations.names() {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidParameter,
                "Blank rotation name",
            ));
        } else if !rotations.insert(name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRotation,
                format!("Duplicate rotation: {name}"),
            ));
        }
    }

    // Vacations
    for req in &config.vacations {
        if !names.contains(req.fellow.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownFellow,
                format!("Vacation request for unknown fellow '{}'", req.fellow),
            ));
        }
        for &w in req.weeks.iter().filter(|&&w| w >= WEEKS) {
            errors.push(ValidationError::new(
                ValidationErrorKind::WeekOutOfRange,
                format!("Vacation week {w} for '{}' is outside 0..{WEEKS}", req.fellow),
            ));
        }
    }

    // Rules
    if errors.is_empty() {
        let roster = Roster::from_lists(&config.fellows);
        let ctx = RuleContext::new(&roster, &config.rotations, &config.vacations);
        errors.extend(config.rules.check(&ctx));
    }

    // Solver
    if config.solver.time_limit_ms == Some(0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            "Solver time limit must be positive",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
