//! Decision-variable grid.
//!
//! One boolean decision per (fellow, week, rotation): "this fellow works
//! this rotation in this week". Variables are addressed by a dense
//! [`VarId`] and carry their structured [`VarKey`] all the way through
//! decoding; identity never round-trips through a formatted name.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::{FellowId, RotationId};

/// Number of weeks in the scheduling year.
pub const WEEKS: usize = 52;

/// Index of a week within the scheduling year, in `[0, WEEKS)`.
pub type Week = usize;

/// Dense variable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

impl VarId {
    /// Position in a flat value vector.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structured identity of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarKey {
    pub fellow: FellowId,
    pub week: Week,
    pub rotation: RotationId,
}

/// Shape of the decision space for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentGrid {
    fellows: usize,
    rotations: usize,
}

impl AssignmentGrid {
    /// Creates a grid over `fellows` x [`WEEKS`] x `rotations`.
    pub fn new(fellows: usize, rotations: usize) -> Self {
        Self { fellows, rotations }
    }

    /// Number of fellows.
    #[inline]
    pub fn fellows(&self) -> usize {
        self.fellows
    }

    /// Number of weeks (always [`WEEKS`]).
    #[inline]
    pub fn weeks(&self) -> usize {
        WEEKS
    }

    /// Number of rotations.
    #[inline]
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// Total number of decision variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.fellows * WEEKS * self.rotations
    }

    /// Whether the grid has no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Variable for (fellow, week, rotation).
    ///
    /// Indices are trusted; out-of-range arguments are a programming error
    /// and are caught in debug builds.
    #[inline]
    pub fn var(&self, fellow: FellowId, week: Week, rotation: RotationId) -> VarId {
        debug_assert!(fellow < self.fellows && week < WEEKS && rotation < self.rotations);
        VarId(((fellow * WEEKS + week) * self.rotations + rotation) as u32)
    }

    /// Variables for one (fellow, week) over several rotations.
    pub fn vars(&self, fellow: FellowId, week: Week, rotations: &[RotationId]) -> Vec<VarId> {
        rotations.iter().map(|&r| self.var(fellow, week, r)).collect()
    }

    /// Variables for one (fellow, week) over every rotation.
    pub fn week_vars(&self, fellow: FellowId, week: Week) -> Vec<VarId> {
        (0..self.rotations).map(|r| self.var(fellow, week, r)).collect()
    }

    /// Variables for one (fellow, rotation) over a span of weeks.
    pub fn span_vars(&self, fellow: FellowId, weeks: Range<Week>, rotation: RotationId) -> Vec<VarId> {
        weeks.map(|w| self.var(fellow, w, rotation)).collect()
    }

    /// Structured key of a variable.
    #[inline]
    pub fn key(&self, var: VarId) -> VarKey {
        let i = var.index();
        VarKey {
            fellow: i / (WEEKS * self.rotations),
            week: (i / self.rotations) % WEEKS,
            rotation: i % self.rotations,
        }
    }

    /// Iterates every variable with its key.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, VarKey)> + '_ {
        (0..self.len()).map(move |i| {
            let id = VarId(i as u32);
            (id, self.key(id))
        })
    }
}

/// Aligned blocks of `size` weeks covering the year, clipped at [`WEEKS`].
pub fn aligned_blocks(size: usize) -> impl Iterator<Item = Range<Week>> {
    let step = size.max(1);
    (0..WEEKS)
        .step_by(step)
        .map(move |start| start..(start + step).min(WEEKS))
}
