//! MILP engine backed by `good_lp`.
//!
//! # Formulation
//! - One binary per grid cell.
//! - One auxiliary binary `y` per distinct [`Term::AnyOf`] group, tied by
//!   `y >= x_i` for every member and `y <= Σ x_i`.
//! - Linear constraints map to rows directly; rows that hold for every
//!   0/1 value are dropped.
//! - `c => expr >= k` becomes `expr - M·c >= k - M` with `M = k - min(expr)`;
//!   `c => expr <= k` becomes `expr + M·c <= k + M` with `M = max(expr) - k`.
//!   Both `M` are exact, taken from the expression bounds.
//! - Zero objective: the search is pure feasibility.
//!
//! # Budget and warm start
//! The time limit is handed to `microlp`, which stops cooperatively; an
//! expired budget without an incumbent is reported as
//! [`RosterError::Timeout`]. A model hint is passed as the initial
//! solution over the cell variables.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming", Ch. 9

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable, WithInitialSolution, WithTimeLimit,
};
use tracing::debug;

use super::{
    Constraint, Engine, EngineOutcome, LinearConstraint, LinearExpr, RawAssignment, Relation,
    RosterModel, Term,
};
use crate::error::{RosterError, RosterResult};
use crate::models::VarId;

/// Pure-Rust mixed-integer engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpEngine {
    time_limit: Option<Duration>,
}

impl MilpEngine {
    /// Creates the engine with no time limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget of one check.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Configured budget.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

/// Variables of one formulation.
struct Formulation {
    cells: Vec<Variable>,
    groups: BTreeMap<Vec<VarId>, Variable>,
}

impl Formulation {
    /// Declares cells and one auxiliary per distinct group.
    fn declare(model: &RosterModel, vars: &mut ProblemVariables) -> Self {
        let cells = vars.add_vector(variable().binary(), model.grid().len());
        let mut groups = BTreeMap::new();

        let mut intern = |term: &Term| {
            if let Term::AnyOf(members) = term {
                if !groups.contains_key(members) {
                    groups.insert(members.clone(), vars.add(variable().binary()));
                }
            }
        };

        for c in model.constraints() {
            match c {
                Constraint::Linear(lc) => lc.expr.terms.iter().for_each(|(_, t)| intern(t)),
                Constraint::Implies { condition, then } => {
                    intern(condition);
                    then.expr.terms.iter().for_each(|(_, t)| intern(t));
                }
            }
        }

        Self { cells, groups }
    }

    fn var(&self, term: &Term) -> Variable {
        match term {
            Term::Var(v) => self.cells[v.index()],
            // Every group was interned by `declare`.
            Term::AnyOf(members) => self.groups[members],
        }
    }

    fn affine(&self, expr: &LinearExpr) -> Expression {
        let mut out = Expression::from_other_affine(expr.constant as f64);
        for (coef, term) in &expr.terms {
            out += (*coef as f64) * self.var(term);
        }
        out
    }

    /// Rows for one constraint.
    fn rows(&self, c: &Constraint) -> Vec<good_lp::Constraint> {
        match c {
            Constraint::Linear(lc) => {
                if lc.is_trivial() {
                    return Vec::new();
                }
                vec![self.row(self.affine(&lc.expr), lc.relation, lc.rhs)]
            }
            Constraint::Implies { condition, then } => self.implication(self.var(condition), then),
        }
    }

    fn row(&self, lhs: Expression, relation: Relation, rhs: i64) -> good_lp::Constraint {
        let rhs = Expression::from_other_affine(rhs as f64);
        match relation {
            Relation::Le => constraint::leq(lhs, rhs),
            Relation::Ge => constraint::geq(lhs, rhs),
            Relation::Eq => constraint::eq(lhs, rhs),
        }
    }

    fn implication(&self, cond: Variable, then: &LinearConstraint) -> Vec<good_lp::Constraint> {
        let (lo, hi) = then.expr.bounds();
        let mut rows = Vec::with_capacity(2);

        if matches!(then.relation, Relation::Ge | Relation::Eq) {
            let m = then.rhs - lo;
            if m > 0 {
                let mut lhs = self.affine(&then.expr);
                lhs += (-(m as f64)) * cond;
                rows.push(self.row(lhs, Relation::Ge, then.rhs - m));
            }
        }
        if matches!(then.relation, Relation::Le | Relation::Eq) {
            let m = hi - then.rhs;
            if m > 0 {
                let mut lhs = self.affine(&then.expr);
                lhs += (m as f64) * cond;
                rows.push(self.row(lhs, Relation::Le, then.rhs + m));
            }
        }
        rows
    }

    /// Linking rows for the auxiliary group indicators.
    fn group_rows(&self) -> Vec<good_lp::Constraint> {
        let mut rows = Vec::new();
        for (members, &y) in &self.groups {
            let mut total = Expression::from_other_affine(0.0);
            for v in members {
                let x = self.cells[v.index()];
                rows.push(constraint::geq(Expression::from(y), Expression::from(x)));
                total += Expression::from(x);
            }
            rows.push(constraint::leq(Expression::from(y), total));
        }
        rows
    }
}

impl Engine for MilpEngine {
    fn name(&self) -> &'static str {
        "milp"
    }

    fn check(&self, model: &RosterModel) -> RosterResult<EngineOutcome> {
        let started = Instant::now();
        let mut vars = ProblemVariables::new();
        let form = Formulation::declare(model, &mut vars);

        let mut rows = form.group_rows();
        for c in model.constraints() {
            rows.extend(form.rows(c));
        }
        debug!(
            cells = form.cells.len(),
            groups = form.groups.len(),
            rows = rows.len(),
            "milp formulation built"
        );

        let mut problem = vars
            .minimise(Expression::from_other_affine(0.0))
            .using(default_solver);
        for row in rows {
            problem = problem.with(row);
        }
        if let Some(limit) = self.time_limit {
            problem = problem.with_time_limit(limit.as_secs_f64());
        }
        if let Some(hint) = model.hint() {
            let start: Vec<(Variable, f64)> = form
                .cells
                .iter()
                .enumerate()
                .map(|(i, &v)| (v, if hint.get(VarId(i as u32)) { 1.0 } else { 0.0 }))
                .collect();
            debug!(ones = hint.count_true(), "milp warm start");
            problem = problem.with_initial_solution(start);
        }

        match problem.solve() {
            Ok(solution) => {
                let values = form
                    .cells
                    .iter()
                    .map(|&v| solution.value(v) > 0.5)
                    .collect();
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "milp satisfiable");
                Ok(EngineOutcome::Satisfiable(RawAssignment::new(values)))
            }
            Err(ResolutionError::Infeasible) => {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "milp infeasible");
                Ok(EngineOutcome::Unsatisfiable)
            }
            Err(ResolutionError::Other(reason)) => match self.time_limit {
                Some(limit) => {
                    debug!(reason, "milp stopped without incumbent");
                    Err(RosterError::Timeout(limit))
                }
                None => Err(RosterError::Engine(reason.to_string())),
            },
            Err(e) => Err(RosterError::Engine(e.to_string())),
        }
    }
}
