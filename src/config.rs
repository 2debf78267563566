//! Roster configuration.
//!
//! Everything a solve needs: cohort lists, the rotation vocabulary,
//! vacation requests, the rule book, the calendar anchor, and solver
//! settings. Loadable from JSON; every section but `fellows` defaults to
//! the fellowship's standard setup.
//!
//! ```
//! use u_roster::config::RosterConfig;
//!
//! let config = RosterConfig::from_json_str(r#"{
//!     "fellows": { "junior_ncc": ["Ana"], "senior_ncc": ["Ben"] },
//!     "vacations": [{ "fellow": "Ana", "weeks": [1, 7, 36] }],
//!     "solver": { "time_limit_ms": 600000 }
//! }"#).unwrap();
//! assert_eq!(config.fellows.len(), 2);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RosterResult;
use crate::models::{CohortLists, RotationSet, VacationRequest, WeekCalendar};
use crate::rules::RuleBook;
use crate::validation::{validate_config, ValidationResult};

/// Engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Wall-clock budget for the feasibility check in milliseconds;
    /// unbounded when absent. Zero is rejected by validation.
    pub time_limit_ms: Option<u64>,
}

impl SolverSettings {
    /// Budget as a duration.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

/// Full input of a roster solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub fellows: CohortLists,
    pub rotations: RotationSet,
    pub vacations: Vec<VacationRequest>,
    pub rules: RuleBook,
    pub calendar: WeekCalendar,
    pub solver: SolverSettings,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            fellows: CohortLists::default(),
            rotations: RotationSet::standard(),
            vacations: Vec::new(),
            rules: RuleBook::standard(),
            calendar: WeekCalendar::default(),
            solver: SolverSettings::default(),
        }
    }
}

impl RosterConfig {
    /// Standard configuration for the given roster.
    pub fn new(fellows: CohortLists) -> Self {
        Self {
            fellows,
            ..Self::default()
        }
    }

    /// Parses a JSON configuration.
    ///
    /// A missing `rules` section means the standard rule book; an explicit
    /// empty list means no rules.
    pub fn from_json_str(json: &str) -> RosterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> RosterResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replaces the rotation vocabulary.
    pub fn with_rotations(mut self, rotations: RotationSet) -> Self {
        self.rotations = rotations;
        self
    }

    /// Replaces the vacation requests.
    pub fn with_vacations(mut self, vacations: Vec<VacationRequest>) -> Self {
        self.vacations = vacations;
        self
    }

    /// Adds one vacation request.
    pub fn with_vacation(mut self, request: VacationRequest) -> Self {
        self.vacations.push(request);
        self
    }

    /// Adds a vacation request given as dates on the configured calendar.
    pub fn with_vacation_dates(
        mut self,
        fellow: impl Into<String>,
        dates: &[NaiveDate],
    ) -> RosterResult<Self> {
        let request = VacationRequest::from_dates(fellow, &self.calendar, dates)?;
        self.vacations.push(request);
        Ok(self)
    }

    /// Replaces the rule book.
    pub fn with_rules(mut self, rules: RuleBook) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the calendar anchor.
    pub fn with_calendar(mut self, calendar: WeekCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the solver time limit, kept at millisecond resolution.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        let ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        self.solver.time_limit_ms = Some(ms);
        self
    }

    /// Runs all configuration checks.
    pub fn validate(&self) -> ValidationResult {
        validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use crate::models::Cohort;

    #[test]
    fn test_new_uses_standard_setup() {
        let config = RosterConfig::new(CohortLists::new().with_junior(["A"]));
        assert_eq!(config.rotations, RotationSet::standard());
        assert_eq!(config.rules, RuleBook::standard());
        assert!(config.solver.time_limit().is_none());
    }

    #[test]
    fn test_json_defaults() {
        let config = RosterConfig::from_json_str(
            r#"{ "fellows": { "stroke": ["K1", "K2"], "ccm": ["C1"] } }"#,
        )
        .unwrap();
        assert_eq!(config.fellows.names(Cohort::Stroke), ["K1", "K2"]);
        assert_eq!(config.rules, RuleBook::standard());
        assert_eq!(config.calendar, WeekCalendar::default());
    }

    #[test]
    fn test_json_explicit_rules() {
        let config = RosterConfig::from_json_str(
            r#"{
                "fellows": { "junior_ncc": ["A"] },
                "rotations": ["NCC1", "NCC2", "Elec"],
                "rules": [
                    { "rule": "full_coverage" },
                    { "rule": "slot_coverage", "enabled": false, "swing_deficit": 4 }
                ],
                "calendar": { "anchor": "2026-06-29" },
                "solver": { "time_limit_ms": 30000 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.rules.entries().len(), 2);
        assert_eq!(config.rules.enabled_labels(), vec!["full_coverage"]);
        assert_eq!(config.solver.time_limit(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.calendar.anchor,
            NaiveDate::from_ymd_opt(2026, 6, 29).unwrap()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = RosterConfig::new(CohortLists::new().with_junior(["A"]).with_ccm(["C"]))
            .with_vacation(VacationRequest::new("A", [1, 7, 36]))
            .with_time_limit(Duration::from_secs(90));
        let json = config.to_json_string().unwrap();
        let back = RosterConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_sub_second_time_limit_kept() {
        let config = RosterConfig::new(CohortLists::new().with_junior(["A"]))
            .with_time_limit(Duration::from_millis(500));
        assert_eq!(config.solver.time_limit_ms, Some(500));
        assert_eq!(config.solver.time_limit(), Some(Duration::from_millis(500)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_time_limit_rejected() {
        let config = RosterConfig::new(CohortLists::new().with_junior(["A"]))
            .with_time_limit(Duration::from_micros(300));
        assert_eq!(config.solver.time_limit_ms, Some(0));
        let errors = config.validate().unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == crate::validation::ValidationErrorKind::InvalidParameter
                && e.message.contains("time limit")));
    }

    #[test]
    fn test_empty_rule_list_means_no_rules() {
        let config =
            RosterConfig::from_json_str(r#"{ "fellows": { "ccm": ["C"] }, "rules": [] }"#).unwrap();
        assert!(config.rules.entries().is_empty());
    }

    #[test]
    fn test_bad_json() {
        let err = RosterConfig::from_json_str("{ fellows: }").unwrap_err();
        assert!(matches!(err, RosterError::Json(_)));
    }

    #[test]
    fn test_vacation_dates() {
        let config = RosterConfig::new(CohortLists::new().with_junior(["A"]))
            .with_vacation_dates(
                "A",
                &[
                    NaiveDate::from_ymd_opt(2025, 7, 7).unwrap(),
                    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                ],
            )
            .unwrap();
        assert_eq!(config.vacations[0].weeks, vec![1, 26]);

        let err = RosterConfig::new(CohortLists::new())
            .with_vacation_dates("A", &[NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()])
            .unwrap_err();
        assert!(matches!(err, RosterError::Calendar(_)));
    }
}
