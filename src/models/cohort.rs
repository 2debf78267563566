//! Fellow cohorts.
//!
//! Every fellow belongs to exactly one cohort. The cohort decides which
//! rules apply to the fellow and where the fellow stands when an
//! over-staffed slot has to be resolved during decoding.
//!
//! # Ordering
//! Cohorts are laid out in the grid in a fixed order:
//! Junior-NCC, Senior-NCC, Stroke, CCM. [`Cohort::ALL`] follows it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fellowship cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    /// First-year neurocritical care fellows (fully scheduled).
    JuniorNcc,
    /// Second-year neurocritical care fellows (fully scheduled).
    SeniorNcc,
    /// Stroke fellows rotating through NCC (partially scheduled).
    Stroke,
    /// Critical care medicine fellows rotating through NCC (partially scheduled).
    Ccm,
}

impl Cohort {
    /// All cohorts in grid order.
    pub const ALL: [Cohort; 4] = [
        Cohort::JuniorNcc,
        Cohort::SeniorNcc,
        Cohort::Stroke,
        Cohort::Ccm,
    ];

    /// Position of this cohort in the grid ordering.
    #[inline]
    pub fn ordinal(self) -> usize {
        match self {
            Cohort::JuniorNcc => 0,
            Cohort::SeniorNcc => 1,
            Cohort::Stroke => 2,
            Cohort::Ccm => 3,
        }
    }

    /// Whether the program owns this cohort's entire year.
    ///
    /// Fully managed fellows have exactly one rotation every week;
    /// the others only have their NCC time assigned.
    pub fn is_fully_managed(self) -> bool {
        matches!(self, Cohort::JuniorNcc | Cohort::SeniorNcc)
    }

    /// Rank used to pick who moves to the "Extra" bucket.
    ///
    /// When two fellows share a capped slot, the one with the higher
    /// rank is demoted: CCM (3) > Stroke (2) > Senior-NCC (1) > Junior-NCC (0).
    /// Native NCC fellows therefore keep the named slot.
    pub fn demotion_rank(self) -> u8 {
        match self {
            Cohort::JuniorNcc => 0,
            Cohort::SeniorNcc => 1,
            Cohort::Stroke => 2,
            Cohort::Ccm => 3,
        }
    }

    /// Configuration key, identical to the serde name.
    pub fn key(self) -> &'static str {
        match self {
            Cohort::JuniorNcc => "junior_ncc",
            Cohort::SeniorNcc => "senior_ncc",
            Cohort::Stroke => "stroke",
            Cohort::Ccm => "ccm",
        }
    }

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Cohort::JuniorNcc => "Junior NCC",
            Cohort::SeniorNcc => "Senior NCC",
            Cohort::Stroke => "Stroke",
            Cohort::Ccm => "CCM",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_order() {
        for (i, c) in Cohort::ALL.iter().enumerate() {
            assert_eq!(c.ordinal(), i);
        }
    }

    #[test]
    fn test_demotion_rank_order() {
        assert!(Cohort::Ccm.demotion_rank() > Cohort::Stroke.demotion_rank());
        assert!(Cohort::Stroke.demotion_rank() > Cohort::SeniorNcc.demotion_rank());
        assert!(Cohort::SeniorNcc.demotion_rank() > Cohort::JuniorNcc.demotion_rank());
    }

    #[test]
    fn test_fully_managed() {
        assert!(Cohort::JuniorNcc.is_fully_managed());
        assert!(Cohort::SeniorNcc.is_fully_managed());
        assert!(!Cohort::Stroke.is_fully_managed());
        assert!(!Cohort::Ccm.is_fully_managed());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Cohort::JuniorNcc).unwrap();
        assert_eq!(json, "\"junior_ncc\"");
        let back: Cohort = serde_json::from_str("\"ccm\"").unwrap();
        assert_eq!(back, Cohort::Ccm);
        for c in Cohort::ALL {
            assert_eq!(serde_json::to_string(&c).unwrap(), format!("\"{}\"", c.key()));
        }
    }
}
