//! Vacation requests.
//!
//! Each fellow submits an ordered list of requested weeks. The first
//! `quota` distinct weeks are honoured as Vacation; anything beyond the
//! quota is still protected from clinical duty but lands on the overflow
//! rotation (Elective) instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CalendarError, Week, WeekCalendar};

/// Requested weeks off for one fellow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRequest {
    /// Fellow display name.
    pub fellow: String,
    /// Requested weeks in priority order.
    pub weeks: Vec<Week>,
}

/// Requested weeks split by the quota.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacationSplit {
    /// Weeks pinned to Vacation.
    pub granted: Vec<Week>,
    /// Weeks pinned to the overflow rotation.
    pub overflow: Vec<Week>,
}

impl VacationRequest {
    /// Creates a request from week indices.
    pub fn new(fellow: impl Into<String>, weeks: impl IntoIterator<Item = Week>) -> Self {
        Self {
            fellow: fellow.into(),
            weeks: weeks.into_iter().collect(),
        }
    }

    /// Creates a request from calendar dates ("the week of ...").
    pub fn from_dates(
        fellow: impl Into<String>,
        calendar: &WeekCalendar,
        dates: &[NaiveDate],
    ) -> Result<Self, CalendarError> {
        let weeks = dates
            .iter()
            .map(|&d| calendar.week_index(d))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(fellow, weeks))
    }

    /// Distinct requested weeks, first occurrence wins.
    pub fn distinct_weeks(&self) -> Vec<Week> {
        let mut seen = Vec::with_capacity(self.weeks.len());
        for &w in &self.weeks {
            if !seen.contains(&w) {
                seen.push(w);
            }
        }
        seen
    }

    /// Splits the request into granted and overflow weeks.
    pub fn split(&self, quota: usize) -> VacationSplit {
        let mut weeks = self.distinct_weeks();
        let overflow = if weeks.len() > quota {
            weeks.split_off(quota)
        } else {
            Vec::new()
        };
        VacationSplit {
            granted: weeks,
            overflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_within_quota() {
        let req = VacationRequest::new("NCC Prash", [1, 7, 36]);
        let split = req.split(3);
        assert_eq!(split.granted, vec![1, 7, 36]);
        assert!(split.overflow.is_empty());
    }

    #[test]
    fn test_split_overflow_goes_last() {
        let req = VacationRequest::new("NCC Prash", [1, 7, 36, 40, 41]);
        let split = req.split(3);
        assert_eq!(split.granted, vec![1, 7, 36]);
        assert_eq!(split.overflow, vec![40, 41]);
    }

    #[test]
    fn test_duplicates_count_once() {
        let req = VacationRequest::new("NCC David", [5, 6, 5, 28]);
        let split = req.split(3);
        assert_eq!(split.granted, vec![5, 6, 28]);
        assert!(split.overflow.is_empty());
    }

    #[test]
    fn test_from_dates() {
        let cal = WeekCalendar::default();
        let dates = [
            NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        ];
        let req = VacationRequest::from_dates("NCC Raya", &cal, &dates).unwrap();
        assert_eq!(req.weeks, vec![25, 27]);
    }

    #[test]
    fn test_from_dates_rejects_out_of_year() {
        let cal = WeekCalendar::default();
        let dates = [NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()];
        assert!(VacationRequest::from_dates("NCC Raya", &cal, &dates).is_err());
    }
}
