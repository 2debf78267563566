//! Calendar date to week index mapping.
//!
//! The scheduling year is [`WEEKS`] contiguous weeks starting at a fixed
//! anchor date. A date maps to `floor(days since anchor / 7)`; dates in
//! the following calendar year are measured through year end, so the
//! mapping wraps naturally across 31 December.
//!
//! # Time Model
//! Weeks start on the anchor's weekday. Week 0 is `[anchor, anchor + 7d)`.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Week, WEEKS};

/// Errors raised when mapping dates to weeks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The date precedes the start of the scheduling year.
    #[error("{date} is before the scheduling year starting {anchor}")]
    BeforeAnchor { date: NaiveDate, anchor: NaiveDate },

    /// The date falls after the last scheduled week.
    #[error("{date} is past week {last} of the scheduling year starting {anchor}", last = WEEKS - 1)]
    PastYearEnd { date: NaiveDate, anchor: NaiveDate },

    /// A week index outside `[0, WEEKS)`.
    #[error("week {0} is outside the scheduling year")]
    WeekOutOfRange(Week),
}

/// Maps calendar dates onto the week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCalendar {
    /// First day of week 0.
    pub anchor: NaiveDate,
}

impl WeekCalendar {
    /// Creates a calendar anchored at `anchor`.
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    /// Week index containing `date`.
    pub fn week_index(&self, date: NaiveDate) -> Result<Week, CalendarError> {
        let days = date.signed_duration_since(self.anchor).num_days();
        if days < 0 {
            return Err(CalendarError::BeforeAnchor {
                date,
                anchor: self.anchor,
            });
        }
        let week = (days / 7) as usize;
        if week >= WEEKS {
            return Err(CalendarError::PastYearEnd {
                date,
                anchor: self.anchor,
            });
        }
        Ok(week)
    }

    /// First day of a week.
    pub fn week_start(&self, week: Week) -> Result<NaiveDate, CalendarError> {
        if week >= WEEKS {
            return Err(CalendarError::WeekOutOfRange(week));
        }
        Ok(self.anchor + Duration::days(7 * week as i64))
    }
}

impl Default for WeekCalendar {
    /// The 2025-26 academic year, starting Monday 30 June 2025.
    fn default() -> Self {
        Self {
            anchor: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_known_weeks() {
        let cal = WeekCalendar::default();
        assert_eq!(cal.week_index(d(2025, 6, 30)).unwrap(), 0);
        assert_eq!(cal.week_index(d(2025, 10, 6)).unwrap(), 14);
        assert_eq!(cal.week_index(d(2025, 10, 12)).unwrap(), 14);
        assert_eq!(cal.week_index(d(2025, 12, 25)).unwrap(), 25);
    }

    #[test]
    fn test_wraps_into_next_year() {
        let cal = WeekCalendar::default();
        assert_eq!(cal.week_index(d(2026, 1, 1)).unwrap(), 26);
        assert_eq!(cal.week_index(d(2026, 1, 5)).unwrap(), 27);
        assert_eq!(cal.week_index(d(2026, 3, 2)).unwrap(), 35);
    }

    #[test]
    fn test_out_of_year() {
        let cal = WeekCalendar::default();
        assert!(matches!(
            cal.week_index(d(2025, 6, 29)),
            Err(CalendarError::BeforeAnchor { .. })
        ));
        // 52 * 7 = 364 days after the anchor is week 52.
        assert!(matches!(
            cal.week_index(d(2026, 6, 29)),
            Err(CalendarError::PastYearEnd { .. })
        ));
        assert_eq!(cal.week_index(d(2026, 6, 28)).unwrap(), 51);
    }

    #[test]
    fn test_week_start_inverse() {
        let cal = WeekCalendar::default();
        for w in [0, 1, 25, 26, 51] {
            let start = cal.week_start(w).unwrap();
            assert_eq!(cal.week_index(start).unwrap(), w);
        }
        assert_eq!(cal.week_start(52), Err(CalendarError::WeekOutOfRange(52)));
    }

    #[test]
    fn test_custom_anchor() {
        let cal = WeekCalendar::new(d(2026, 7, 6));
        assert_eq!(cal.week_index(d(2026, 7, 13)).unwrap(), 1);
    }
}
