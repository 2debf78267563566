//! Error types for roster construction, solving, and decoding.

use std::time::Duration;

use thiserror::Error;

use crate::models::{CalendarError, Week};
use crate::validation::ValidationError;

/// Result alias for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Errors that can occur while building or solving a roster.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The configuration failed validation; nothing was generated.
    #[error("invalid configuration: {}", summarize(.0))]
    Config(Vec<ValidationError>),

    /// The engine proved that no assignment satisfies the active rules.
    #[error("no roster satisfies the active rules: {}", .active_rules.join(", "))]
    Infeasible {
        /// Names of the rules that were posted.
        active_rules: Vec<String>,
    },

    /// The engine did not answer within the time limit.
    #[error("solver gave up after {0:?}")]
    Timeout(Duration),

    /// The engine failed for a reason other than infeasibility.
    #[error("solver failure: {0}")]
    Engine(String),

    /// The assignment could not be decoded into a roster.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A date could not be mapped to a week.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// A JSON configuration could not be parsed.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Vec<ValidationError>> for RosterError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Config(errors)
    }
}

impl From<ValidationError> for RosterError {
    fn from(error: ValidationError) -> Self {
        Self::Config(vec![error])
    }
}

/// An assignment broke an invariant the decoder relies on.
///
/// These indicate a modelling defect upstream and are never patched
/// over by truncation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// More fellows on a capped slot than demotion can resolve.
    #[error("{rotation} has {} fellows in week {week}: {}", .fellows.len(), .fellows.join(", "))]
    Overstaffed {
        rotation: String,
        week: Week,
        fellows: Vec<String>,
    },

    /// A fellow holds more than one rotation in the same week.
    #[error("{fellow} holds {} in week {week}", .rotations.join(" and "))]
    MultipleRotations {
        fellow: String,
        week: Week,
        rotations: Vec<String>,
    },

    /// The engine's assignment violates posted constraints.
    #[error("assignment violates {count} constraint(s) of rule '{rule}'")]
    ModelViolation { rule: String, count: usize },

    /// The assignment does not cover the grid.
    #[error("assignment covers {actual} variables, grid has {expected}")]
    AssignmentSize { expected: usize, actual: usize },

    /// A roster slot column names a rotation outside the vocabulary.
    #[error("roster slot '{slot}' is not in the rotation vocabulary")]
    UnknownSlot { slot: String },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_config_message_lists_all() {
        let err = RosterError::Config(vec![
            ValidationError::new(ValidationErrorKind::MissingRotation, "no Swing"),
            ValidationError::new(ValidationErrorKind::EmptyCohort, "no juniors"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("no Swing"));
        assert!(msg.contains("no juniors"));
    }

    #[test]
    fn test_infeasible_is_distinct() {
        let err = RosterError::Infeasible {
            active_rules: vec!["slot_coverage".into(), "vacation".into()],
        };
        assert!(matches!(err, RosterError::Infeasible { .. }));
        assert!(err.to_string().contains("slot_coverage, vacation"));
    }

    #[test]
    fn test_decode_messages() {
        let err = DecodeError::Overstaffed {
            rotation: "NCC1".into(),
            week: 3,
            fellows: vec!["A".into(), "B".into(), "C".into()],
        };
        assert_eq!(err.to_string(), "NCC1 has 3 fellows in week 3: A, B, C");

        let wrapped: RosterError = err.into();
        assert!(matches!(wrapped, RosterError::Decode(_)));
    }
}
