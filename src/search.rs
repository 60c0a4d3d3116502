/// Rollover search of the upcoming schedule event.
use crate::{
    pattern::{NextValue, PatternValueType},
    utils, CronError, Result, Schedule,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Number of years the search looks through before giving up.
pub const SEARCH_HORIZON_YEARS: i32 = 11;

/// Candidate date/time of the search, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SearchCursor {
    year: i32,
    month: PatternValueType,
    day: PatternValueType,
    hour: PatternValueType,
    minute: PatternValueType,
}

impl SearchCursor {
    /// Starts from the `reference` with seconds truncated.
    fn new(reference: &NaiveDateTime) -> Self {
        Self {
            year: reference.year(),
            month: reference.month() as PatternValueType,
            day: reference.day() as PatternValueType,
            hour: reference.hour() as PatternValueType,
            minute: reference.minute() as PatternValueType,
        }
    }

    /// Day of month and day of week both have to match.
    fn matches(&self, schedule: &Schedule) -> bool {
        schedule.minute.contains(self.minute)
            && schedule.hour.contains(self.hour)
            && self.day <= utils::days_in_month(self.year, self.month)
            && schedule.dom.contains(self.day)
            && schedule.dow.contains(utils::day_of_week(self.year, self.month, self.day))
            && schedule.month.contains(self.month)
    }

    fn inc_minute(&mut self, schedule: &Schedule) {
        match schedule.minute.next_or_wrap(self.minute) {
            NextValue::Following(minute) => self.minute = minute,
            NextValue::Wrapped(minute) => {
                self.minute = minute;
                self.inc_hour(schedule);
            }
        }
    }

    fn inc_hour(&mut self, schedule: &Schedule) {
        match schedule.hour.next_or_wrap(self.hour) {
            NextValue::Following(hour) => self.hour = hour,
            NextValue::Wrapped(hour) => {
                self.hour = hour;
                self.inc_dom(schedule);
            }
        }
    }

    /// Only days which exist in the current month are taken into account.
    fn inc_dom(&mut self, schedule: &Schedule) {
        let days_in_month = utils::days_in_month(self.year, self.month);
        match schedule.dom.next_after(self.day, days_in_month) {
            Some(NextValue::Following(day)) => self.day = day,
            Some(NextValue::Wrapped(day)) => {
                self.day = day;
                self.inc_month(schedule);
            }
            None => self.inc_month(schedule),
        }
    }

    fn inc_month(&mut self, schedule: &Schedule) {
        match schedule.month.next_or_wrap(self.month) {
            NextValue::Following(month) => self.month = month,
            NextValue::Wrapped(month) => {
                self.month = month;
                self.year += 1;
            }
        }
    }

    fn to_datetime(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)?.and_hms_opt(
            self.hour as u32,
            self.minute as u32,
            0,
        )
    }
}

/// Returns the first time at or after `reference` (truncated to the whole minute) matching the `schedule`.
///
/// Fails with [`CronError::NotFound`] when the cursor leaves the search horizon.
pub(crate) fn next_occurrence(schedule: &Schedule, reference: &NaiveDateTime) -> Result<NaiveDateTime> {
    let horizon = reference.year().saturating_add(SEARCH_HORIZON_YEARS);
    let not_found = || CronError::NotFound {
        schedule: schedule.to_string(),
        years: SEARCH_HORIZON_YEARS,
    };

    let mut cursor = SearchCursor::new(reference);
    let mut steps = 0_usize;
    while cursor.year < horizon {
        if cursor.matches(schedule) {
            tracing::trace!(%reference, steps, "upcoming event found");
            return cursor.to_datetime().ok_or_else(not_found);
        }
        cursor.inc_minute(schedule);
        steps += 1;
    }

    tracing::debug!(%reference, steps, schedule = %schedule, "search horizon exhausted");
    Err(not_found())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(year: i32, month: u16, day: u16, hour: u16, minute: u16) -> SearchCursor {
        SearchCursor {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    #[test]
    fn test_cursor_truncates_seconds() {
        let reference = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        assert_eq!(SearchCursor::new(&reference), cursor(2024, 2, 29, 23, 59));
    }

    #[test]
    fn test_inc_minute() {
        let schedule = Schedule::new("0,30 * * * *").unwrap();

        let mut c = cursor(2024, 1, 1, 0, 0);
        c.inc_minute(&schedule);
        assert_eq!(c, cursor(2024, 1, 1, 0, 30));

        let mut c = cursor(2024, 1, 1, 0, 45);
        c.inc_minute(&schedule);
        assert_eq!(c, cursor(2024, 1, 1, 1, 0));

        let mut c = cursor(2024, 12, 31, 23, 30);
        c.inc_minute(&schedule);
        assert_eq!(c, cursor(2025, 1, 1, 0, 0));
    }

    #[test]
    fn test_inc_hour() {
        let schedule = Schedule::new("0 4-15 * * *").unwrap();

        let mut c = cursor(2024, 1, 1, 3, 0);
        c.inc_hour(&schedule);
        assert_eq!(c, cursor(2024, 1, 1, 4, 0));

        let mut c = cursor(2024, 1, 1, 23, 0);
        c.inc_hour(&schedule);
        assert_eq!(c, cursor(2024, 1, 2, 4, 0));
    }

    #[test]
    fn test_inc_dom() {
        let schedule = Schedule::new("0 0 15,31 * *").unwrap();

        let mut c = cursor(2024, 1, 1, 0, 0);
        c.inc_dom(&schedule);
        assert_eq!(c, cursor(2024, 1, 15, 0, 0));

        let mut c = cursor(2024, 1, 15, 0, 0);
        c.inc_dom(&schedule);
        assert_eq!(c, cursor(2024, 1, 31, 0, 0));

        // 31 doesn't exist in April
        let mut c = cursor(2024, 4, 15, 0, 0);
        c.inc_dom(&schedule);
        assert_eq!(c, cursor(2024, 5, 15, 0, 0));

        let mut c = cursor(2024, 12, 31, 0, 0);
        c.inc_dom(&schedule);
        assert_eq!(c, cursor(2025, 1, 15, 0, 0));
    }

    #[test]
    fn test_inc_dom_without_existing_days_keeps_day() {
        let schedule = Schedule::new("0 0 30,31 * *").unwrap();

        let mut c = cursor(2024, 2, 10, 0, 0);
        c.inc_dom(&schedule);
        assert_eq!(c, cursor(2024, 3, 10, 0, 0));
    }

    #[test]
    fn test_inc_month() {
        let schedule = Schedule::new("0 0 1 3,9 *").unwrap();

        let mut c = cursor(2024, 1, 1, 0, 0);
        c.inc_month(&schedule);
        assert_eq!(c, cursor(2024, 3, 1, 0, 0));

        let mut c = cursor(2024, 9, 1, 0, 0);
        c.inc_month(&schedule);
        assert_eq!(c, cursor(2025, 3, 1, 0, 0));
    }

    #[test]
    fn test_matches_requires_both_day_and_weekday() {
        // 2024-01-01 is Monday
        let schedule = Schedule::new("0 0 1 * 1").unwrap();
        assert!(cursor(2024, 1, 1, 0, 0).matches(&schedule));
        assert!(!cursor(2024, 2, 1, 0, 0).matches(&schedule));
        assert!(!cursor(2024, 1, 8, 0, 0).matches(&schedule));
        assert!(!cursor(2024, 1, 1, 0, 1).matches(&schedule));
    }

    #[test]
    fn test_matches_rejects_nonexistent_days() {
        let schedule = Schedule::new("0 0 31 * *").unwrap();
        assert!(cursor(2024, 1, 31, 0, 0).matches(&schedule));
        assert!(!cursor(2024, 2, 31, 0, 0).matches(&schedule));
        assert!(!cursor(2024, 4, 31, 0, 0).matches(&schedule));
    }

    #[test]
    fn test_search_horizon_boundary() {
        // February 29th falls on Monday in 2044 for the first time after 2024
        let schedule = Schedule::new("0 0 29 2 1").unwrap();

        let reference = NaiveDate::from_ymd_opt(2034, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(
            next_occurrence(&schedule, &reference).unwrap(),
            NaiveDate::from_ymd_opt(2044, 2, 29).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );

        let reference = NaiveDate::from_ymd_opt(2033, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert!(next_occurrence(&schedule, &reference).unwrap_err().is_not_found());
    }
}
