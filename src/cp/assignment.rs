//! Raw truth assignment returned by an engine.

use serde::{Deserialize, Serialize};

use crate::models::{AssignmentGrid, VarId, VarKey};

/// Truth value per grid variable, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAssignment {
    values: Vec<bool>,
}

impl RawAssignment {
    /// Wraps a flat value vector.
    pub fn new(values: Vec<bool>) -> Self {
        Self { values }
    }

    /// All-false assignment for a grid.
    pub fn empty(grid: &AssignmentGrid) -> Self {
        Self::new(vec![false; grid.len()])
    }

    /// Truth value of a variable; unknown variables read as false.
    #[inline]
    pub fn get(&self, var: VarId) -> bool {
        self.values.get(var.index()).copied().unwrap_or(false)
    }

    /// Sets a variable.
    ///
    /// Silently ignores out-of-range variables.
    #[inline]
    pub fn set(&mut self, var: VarId, value: bool) {
        if let Some(slot) = self.values.get_mut(var.index()) {
            *slot = value;
        }
    }

    /// Number of variables covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the assignment covers no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of true variables.
    pub fn count_true(&self) -> usize {
        self.values.iter().filter(|&&v| v).count()
    }

    /// Keys of all true variables, in variable order.
    pub fn true_keys<'a>(&'a self, grid: &'a AssignmentGrid) -> impl Iterator<Item = VarKey> + 'a {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v)
            .map(move |(i, _)| grid.key(VarId(i as u32)))
    }
}
