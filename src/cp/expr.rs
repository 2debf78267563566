//! Linear expressions over 0/1 grid terms.

use std::ops::{Add, Mul};

use super::RawAssignment;
use crate::models::VarId;

/// A 0/1-valued term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A single grid variable.
    Var(VarId),
    /// 1 iff at least one of the variables is true.
    AnyOf(Vec<VarId>),
}

impl Term {
    /// Indicator over a group; collapses to [`Term::Var`] for one variable.
    pub fn any_of(mut vars: Vec<VarId>) -> Self {
        if vars.len() == 1 {
            return Term::Var(vars[0]);
        }
        vars.sort_unstable();
        vars.dedup();
        Term::AnyOf(vars)
    }

    /// Value under an assignment.
    #[inline]
    pub fn value(&self, assignment: &RawAssignment) -> i64 {
        match self {
            Term::Var(v) => assignment.get(*v) as i64,
            Term::AnyOf(vs) => vs.iter().any(|&v| assignment.get(v)) as i64,
        }
    }
}

impl From<VarId> for Term {
    fn from(v: VarId) -> Self {
        Term::Var(v)
    }
}

/// `constant + Σ coef · term`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    pub terms: Vec<(i64, Term)>,
    pub constant: i64,
}

impl LinearExpr {
    /// The zero expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of terms with coefficient 1.
    pub fn sum<T: Into<Term>>(terms: impl IntoIterator<Item = T>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| (1, t.into())).collect(),
            constant: 0,
        }
    }

    /// Adds `coef · term`.
    pub fn add_term(&mut self, coef: i64, term: impl Into<Term>) {
        if coef != 0 {
            self.terms.push((coef, term.into()));
        }
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, coef: i64, term: impl Into<Term>) -> Self {
        self.add_term(coef, term);
        self
    }

    /// Appends `coef · other`.
    pub fn add_scaled(&mut self, coef: i64, other: &LinearExpr) {
        for (c, t) in &other.terms {
            self.add_term(coef * c, t.clone());
        }
        self.constant += coef * other.constant;
    }

    /// Value under an assignment.
    pub fn value(&self, assignment: &RawAssignment) -> i64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(c, t)| c * t.value(assignment))
                .sum::<i64>()
    }

    /// Tight `(min, max)` of the expression over all 0/1 term values.
    pub fn bounds(&self) -> (i64, i64) {
        self.terms
            .iter()
            .fold((self.constant, self.constant), |(lo, hi), (c, _)| {
                if *c >= 0 {
                    (lo, hi + c)
                } else {
                    (lo + c, hi)
                }
            })
    }

    /// Number of terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.add_scaled(1, &rhs);
        self
    }
}

impl Mul<LinearExpr> for i64 {
    type Output = LinearExpr;

    fn mul(self, rhs: LinearExpr) -> LinearExpr {
        let mut out = LinearExpr::new();
        out.add_scaled(self, &rhs);
        out
    }
}
