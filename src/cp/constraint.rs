//! Constraint sets over the assignment grid.
//!
//! Rules never post into a shared accumulator; each returns its own
//! [`ConstraintSet`], and the caller composes the sets into a
//! [`RosterModel`] before handing it to an engine. A model can evaluate
//! itself against any [`RawAssignment`], which is how rules are tested
//! in isolation and how engine answers are verified.

use std::fmt;

use super::{LinearExpr, RawAssignment, Term};
use crate::models::{AssignmentGrid, VarId};

/// Comparison between an expression and a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl Relation {
    #[inline]
    fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::Le => lhs <= rhs,
            Relation::Ge => lhs >= rhs,
            Relation::Eq => lhs == rhs,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "==",
        })
    }
}

/// `expr <relation> rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: i64,
}

impl LinearConstraint {
    /// Whether the constraint holds.
    pub fn is_satisfied(&self, assignment: &RawAssignment) -> bool {
        self.relation.holds(self.expr.value(assignment), self.rhs)
    }

    /// Whether the constraint holds for every 0/1 value of its terms.
    pub fn is_trivial(&self) -> bool {
        let (lo, hi) = self.expr.bounds();
        match self.relation {
            Relation::Le => hi <= self.rhs,
            Relation::Ge => lo >= self.rhs,
            Relation::Eq => lo == hi && lo == self.rhs,
        }
    }
}

/// A constraint over the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Unconditional linear constraint.
    Linear(LinearConstraint),
    /// `condition = 1` implies `then`.
    Implies {
        condition: Term,
        then: LinearConstraint,
    },
}

impl Constraint {
    /// `expr <= rhs`.
    pub fn le(expr: LinearExpr, rhs: i64) -> Self {
        Self::linear(expr, Relation::Le, rhs)
    }

    /// `expr >= rhs`.
    pub fn ge(expr: LinearExpr, rhs: i64) -> Self {
        Self::linear(expr, Relation::Ge, rhs)
    }

    /// `expr == rhs`.
    pub fn exactly(expr: LinearExpr, rhs: i64) -> Self {
        Self::linear(expr, Relation::Eq, rhs)
    }

    /// Generic linear constraint.
    pub fn linear(expr: LinearExpr, relation: Relation, rhs: i64) -> Self {
        Self::Linear(LinearConstraint { expr, relation, rhs })
    }

    /// Forces a variable true.
    pub fn pin(var: VarId) -> Self {
        Self::exactly(LinearExpr::sum([var]), 1)
    }

    /// Forces two terms to take the same value.
    pub fn same(a: impl Into<Term>, b: impl Into<Term>) -> Self {
        Self::exactly(LinearExpr::new().with_term(1, a).with_term(-1, b), 0)
    }

    /// `a <= b` for two 0/1 terms.
    pub fn at_most(a: impl Into<Term>, b: impl Into<Term>) -> Self {
        Self::le(LinearExpr::new().with_term(1, a).with_term(-1, b), 0)
    }

    /// `condition => expr <relation> rhs`.
    pub fn implies(condition: impl Into<Term>, expr: LinearExpr, relation: Relation, rhs: i64) -> Self {
        Self::Implies {
            condition: condition.into(),
            then: LinearConstraint { expr, relation, rhs },
        }
    }

    /// Whether the constraint holds.
    pub fn is_satisfied(&self, assignment: &RawAssignment) -> bool {
        match self {
            Constraint::Linear(c) => c.is_satisfied(assignment),
            Constraint::Implies { condition, then } => {
                condition.value(assignment) == 0 || then.is_satisfied(assignment)
            }
        }
    }
}

/// Constraints emitted by one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    origin: String,
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Creates an empty set attributed to `origin` (a rule name).
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            constraints: Vec::new(),
        }
    }

    /// Rule that produced the set.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Adds a constraint.
    pub fn push(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Moves all constraints of `other` into this set.
    pub fn append(&mut self, mut other: ConstraintSet) {
        self.constraints.append(&mut other.constraints);
    }

    /// Constraints in posting order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of constraints.
    #[inline]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraints violated by an assignment.
    pub fn violations<'a>(&'a self, assignment: &'a RawAssignment) -> impl Iterator<Item = &'a Constraint> + 'a {
        self.constraints
            .iter()
            .filter(move |c| !c.is_satisfied(assignment))
    }
}

impl Extend<Constraint> for ConstraintSet {
    fn extend<I: IntoIterator<Item = Constraint>>(&mut self, iter: I) {
        self.constraints.extend(iter);
    }
}

/// Violations of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule: String,
    pub count: usize,
}

/// A composed model: grid shape plus the constraint sets of every rule.
///
/// May carry a hint, an assignment engines can start their search from.
/// The hint never changes which assignments are feasible.
#[derive(Debug, Clone)]
pub struct RosterModel {
    grid: AssignmentGrid,
    sets: Vec<ConstraintSet>,
    hint: Option<RawAssignment>,
}

impl RosterModel {
    /// Creates a model with no constraints.
    pub fn new(grid: AssignmentGrid) -> Self {
        Self {
            grid,
            sets: Vec::new(),
            hint: None,
        }
    }

    /// Sets the search hint. Hints of the wrong size are dropped.
    pub fn set_hint(&mut self, hint: RawAssignment) {
        self.hint = (hint.len() == self.grid.len()).then_some(hint);
    }

    /// Builder form of [`set_hint`](Self::set_hint).
    pub fn with_hint(mut self, hint: RawAssignment) -> Self {
        self.set_hint(hint);
        self
    }

    /// Search hint, if any.
    pub fn hint(&self) -> Option<&RawAssignment> {
        self.hint.as_ref()
    }

    /// Adds a rule's constraints.
    pub fn add_set(&mut self, set: ConstraintSet) {
        self.sets.push(set);
    }

    /// Builder form of [`add_set`](Self::add_set).
    pub fn with_set(mut self, set: ConstraintSet) -> Self {
        self.add_set(set);
        self
    }

    /// Grid shape.
    #[inline]
    pub fn grid(&self) -> &AssignmentGrid {
        &self.grid
    }

    /// Constraint sets in composition order.
    pub fn sets(&self) -> &[ConstraintSet] {
        &self.sets
    }

    /// Every constraint across sets.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.sets.iter().flat_map(|s| s.constraints().iter())
    }

    /// Total number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.sets.iter().map(ConstraintSet::len).sum()
    }

    /// Per-rule violation counts; empty when the assignment satisfies the model.
    pub fn violations(&self, assignment: &RawAssignment) -> Vec<RuleViolation> {
        self.sets
            .iter()
            .filter_map(|s| {
                let count = s.violations(assignment).count();
                (count > 0).then(|| RuleViolation {
                    rule: s.origin().to_string(),
                    count,
                })
            })
            .collect()
    }

    /// Whether the assignment satisfies every constraint.
    pub fn is_satisfied_by(&self, assignment: &RawAssignment) -> bool {
        self.constraints().all(|c| c.is_satisfied(assignment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_relations() {
        let grid = AssignmentGrid::new(1, 2);
        let mut a = RawAssignment::empty(&grid);
        let x = grid.var(0, 0, 0);
        let y = grid.var(0, 0, 1);
        a.set(x, true);

        assert!(Constraint::ge(LinearExpr::sum([x, y]), 1).is_satisfied(&a));
        assert!(Constraint::le(LinearExpr::sum([x, y]), 1).is_satisfied(&a));
        assert!(!Constraint::exactly(LinearExpr::sum([x, y]), 2).is_satisfied(&a));
        assert!(!Constraint::same(x, y).is_satisfied(&a));
        assert!(!Constraint::at_most(x, y).is_satisfied(&a));
        assert!(Constraint::at_most(y, x).is_satisfied(&a));
    }

    #[test]
    fn test_hint_must_match_grid() {
        let grid = AssignmentGrid::new(1, 2);
        let model = RosterModel::new(grid).with_hint(RawAssignment::new(vec![true; 3]));
        assert!(model.hint().is_none());

        let mut hint = RawAssignment::empty(&grid);
        hint.set(grid.var(0, 3, 1), true);
        let model = RosterModel::new(grid).with_hint(hint.clone());
        assert_eq!(model.hint(), Some(&hint));
    }

    #[test]
    fn test_implication() {
        let grid = AssignmentGrid::new(1, 3);
        let mut a = RawAssignment::empty(&grid);
        let c = grid.var(0, 0, 0);
        let x = grid.var(0, 0, 1);
        let rule = Constraint::implies(c, LinearExpr::sum([x]), Relation::Ge, 1);

        assert!(rule.is_satisfied(&a)); // condition false
        a.set(c, true);
        assert!(!rule.is_satisfied(&a));
        a.set(x, true);
        assert!(rule.is_satisfied(&a));
    }

    #[test]
    fn test_trivial_detection() {
        let grid = AssignmentGrid::new(1, 2);
        let x = grid.var(0, 0, 0);
        let lc = LinearConstraint {
            expr: LinearExpr::sum([x]),
            relation: Relation::Ge,
            rhs: 0,
        };
        assert!(lc.is_trivial());
        let lc = LinearConstraint {
            expr: LinearExpr::sum([x]),
            relation: Relation::Ge,
            rhs: 1,
        };
        assert!(!lc.is_trivial());
    }

    #[test]
    fn test_model_violations_by_rule() {
        let grid = AssignmentGrid::new(1, 2);
        let x = grid.var(0, 3, 0);
        let mut pins = ConstraintSet::new("pins");
        pins.push(Constraint::pin(x));
        let mut caps = ConstraintSet::new("caps");
        caps.push(Constraint::le(LinearExpr::sum([x]), 1));

        let model = RosterModel::new(grid).with_set(pins).with_set(caps);
        assert_eq!(model.constraint_count(), 2);

        let a = RawAssignment::empty(&grid);
        let v = model.violations(&a);
        assert_eq!(
            v,
            vec![RuleViolation {
                rule: "pins".into(),
                count: 1
            }]
        );
        assert!(!model.is_satisfied_by(&a));
    }
}
