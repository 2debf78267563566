//! Rotation vocabulary.
//!
//! Rotations are configuration, not policy: the caller supplies an
//! ordered list of names and the rule library looks them up by name.
//! A rule that needs a name missing from the vocabulary fails with a
//! [`ValidationErrorKind::MissingRotation`] before any constraint exists.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};

/// First core NCC slot.
pub const NCC1: &str = "NCC1";
/// Second core NCC slot.
pub const NCC2: &str = "NCC2";
/// Auxiliary NCC coverage slot.
pub const SWING: &str = "Swing";
/// Surgical ICU.
pub const SICU: &str = "SICU";
/// Medical ICU.
pub const MICU: &str = "MICU";
/// Elective time.
pub const ELECTIVE: &str = "Elec";
/// Vacation.
pub const VACATION: &str = "Vac";
/// Neurosurgery.
pub const NEUROSURGERY: &str = "NS";
/// Vascular neurology / clinic.
pub const VASCULAR_CLINIC: &str = "Vasc/Clin";
/// Anaesthesia.
pub const ANAESTHESIA: &str = "Anaesthesia";

/// Index of a rotation within a [`RotationSet`].
pub type RotationId = usize;

/// Ordered rotation vocabulary for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationSet {
    names: Vec<String>,
}

impl RotationSet {
    /// Creates a vocabulary from an ordered list of names.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The fellowship's standard ten rotations.
    pub fn standard() -> Self {
        Self::new([
            NCC1,
            NCC2,
            SWING,
            SICU,
            MICU,
            ELECTIVE,
            VACATION,
            NEUROSURGERY,
            VASCULAR_CLINIC,
            ANAESTHESIA,
        ])
    }

    /// Index of a rotation, if present.
    pub fn id_of(&self, name: &str) -> Option<RotationId> {
        self.names.iter().position(|n| n == name)
    }

    /// Index of a rotation a rule depends on.
    pub fn require(&self, name: &str) -> Result<RotationId, ValidationError> {
        self.id_of(name).ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::MissingRotation,
                format!("Rotation '{name}' is not in the configured vocabulary"),
            )
        })
    }

    /// Resolves several names at once, failing on the first missing one.
    pub fn require_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<RotationId>, ValidationError> {
        names.iter().map(|n| self.require(n.as_ref())).collect()
    }

    /// Name of a rotation.
    #[inline]
    pub fn name(&self, id: RotationId) -> &str {
        &self.names[id]
    }

    /// All names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of rotations.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for RotationSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_vocabulary() {
        let rs = RotationSet::standard();
        assert_eq!(rs.len(), 10);
        assert_eq!(rs.id_of(NCC1), Some(0));
        assert_eq!(rs.id_of(ANAESTHESIA), Some(9));
        assert_eq!(rs.name(4), MICU);
    }

    #[test]
    fn test_require_missing_fails_loudly() {
        let rs = RotationSet::new(["NCC1", "NCC2"]);
        let err = rs.require("Swing").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingRotation);
        assert!(err.message.contains("Swing"));
    }

    #[test]
    fn test_require_all() {
        let rs = RotationSet::standard();
        assert_eq!(rs.require_all(&[NCC2, SWING]).unwrap(), vec![1, 2]);
        assert!(rs.require_all(&[NCC2, "Night Float"]).is_err());
    }

    #[test]
    fn test_order_is_caller_defined() {
        let rs = RotationSet::new(["Vac", "NCC1"]);
        assert_eq!(rs.id_of("NCC1"), Some(1));
    }
}
