//! Cron expressions parser and upcoming occurrences calculator.
#![deny(unsafe_code, missing_docs)]

//! This is a small crate, intended to:
//! - parse classic 5-fields cron schedule expressions into sets of values;
//! - find the upcoming time(s) matching the schedule, starting from the provided reference time.
//!
//! _This is not a cron jobs scheduler or runner._
//!
//! ## Cron schedule format
//!
//! Schedule expression has five fields, separated by single spaces: minutes, hours, days of month,
//! months and days of week. An optional sixth token is treated as a free-text command and stored as is.
//!
//! | Field        | Allowed values | Allowed special characters |
//! |--------------|----------------|----------------------------|
//! | Minutes      | 0-59           | * , - /                    |
//! | Hours        | 0-23           | * , - /                    |
//! | Day of Month | 1-31           | * , - /                    |
//! | Month        | 1-12           | * , - /                    |
//! | Day of Week  | 0-6 (0 is SUN) | * , - /                    |
//!
//! Patterns meanings:
//! - `*` - each possible value, i.e. `0,1,2,...,59` for minutes;
//! - `,` - list of values or patterns, i.e. `1,7,12`, `1-5,10`;
//! - `-` - range of values, i.e. `0-15`, `1-5`;
//! - `/` - repeating values, i.e. `*/12`, `10/5`, `30-59/2`, where `10/5` means `10-59/5` for minutes.
//!
//! Day of month and day of week are combined with _AND_: an event happens on the day
//! which satisfies both fields, so `0 0 1 * 1` fires on the first day of month only when it's Monday.
//!
//! Names of months or weekdays, aliases like `@daily`, seconds or years fields aren't supported.
//!
//! ## How to use
//!
//! The central entity of the crate is a [`Schedule`] structure, which has these basic methods:
//! - [new()](Schedule::new): constructor to parse and validate provided schedule;
//! - [next_occurrence()](Schedule::next_occurrence): returns time of the next schedule's event,
//!   starting from the provided reference time;
//! - [next_occurrences()](Schedule::next_occurrences): returns a list of the next events;
//! - [iter()](Schedule::iter): returns an `Iterator` which produces a series of events.
//!
//! The search of the next event looks through [`SEARCH_HORIZON_YEARS`] years after the reference year
//! at most, so impossible schedules like `0 0 30 2 *` end up with [`CronError::NotFound`].
//!
//! All calculations are done in the civil calendar, without timezone conversions:
//! [`Schedule::upcoming`] takes the local time of the zoned instant and returns the result in the same zone.
//!
//! ### Example with `next_occurrence`
//! ```rust
//! use chrono::NaiveDate;
//! use cron_lookahead::{Result, Schedule};
//!
//! fn next_occurrence() -> Result<()> {
//!     let schedule = Schedule::new("0 0 31 1 *")?;
//!     let reference = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//!     let next = schedule.next_occurrence(&reference)?;
//!     assert_eq!(next.to_string(), "2025-01-31 00:00:00");
//!
//!     Ok(())
//! }
//! # next_occurrence().unwrap();
//! ```
//!
//! ### Example with `next_occurrences`
//! ```rust
//! use chrono::NaiveDate;
//! use cron_lookahead::{Result, Schedule};
//!
//! fn next_occurrences() -> Result<()> {
//!     let schedule = Schedule::new("0 0 29 2 *")?;
//!     let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//!     // Leap days only
//!     for next in schedule.next_occurrences(&reference, 3) {
//!         println!("next: {next}");
//!     }
//!
//!     Ok(())
//! }
//! # next_occurrences().unwrap();
//! ```
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementation for [`Schedule`].
//! * `cli`: builds the `cron-lookahead` command line tool.

use chrono::NaiveDateTime;

/// Crate specific Error implementation.
pub mod error;
mod pattern;
/// Cron schedule parser and upcoming event search.
pub mod schedule;
mod search;
mod series;
mod utils;

// Re-export of public entities.
pub use error::CronError;
pub use pattern::parse_field;
pub use schedule::Schedule;
pub use search::SEARCH_HORIZON_YEARS;

/// Convenient alias for `Result`.
pub type Result<T, E = CronError> = std::result::Result<T, E>;

/// Format of the events returned by [`next_occurrences`], i.e. `2/29/2024, 12:00:00 AM`.
pub const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Default number of events to show.
pub const DEFAULT_OCCURRENCES: usize = 5;

/// Parses the cron `expression`, see [`Schedule::new`].
#[inline]
pub fn parse(expression: &str) -> Result<Schedule> {
    Schedule::new(expression)
}

/// Parses the cron `expression` and returns time of its upcoming event starting from `reference`.
///
/// Fails if the expression is invalid or there is no event within the search horizon.
pub fn next_occurrence(expression: &str, reference: &NaiveDateTime) -> Result<NaiveDateTime> {
    parse(expression)?.next_occurrence(reference)
}

/// Parses the cron `expression` and returns up to `count` upcoming events formatted with [`DISPLAY_FORMAT`].
///
/// This never fails: an invalid expression yields an empty list, and the list is truncated
/// when the schedule runs out of events within the search horizon.
///
/// ```rust
/// use chrono::NaiveDate;
/// use cron_lookahead::{next_occurrences, DEFAULT_OCCURRENCES};
///
/// let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let events = next_occurrences("30 9 29 2 *", &reference, DEFAULT_OCCURRENCES);
/// assert_eq!(events[0], "2/29/2024, 9:30:00 AM");
/// assert_eq!(events[1], "2/29/2028, 9:30:00 AM");
///
/// assert!(next_occurrences("30 9 29 2", &reference, DEFAULT_OCCURRENCES).is_empty());
/// ```
pub fn next_occurrences(expression: &str, reference: &NaiveDateTime, count: usize) -> Vec<String> {
    match parse(expression) {
        Ok(schedule) => schedule
            .next_occurrences(reference, count)
            .iter()
            .map(|event| event.format(DISPLAY_FORMAT).to_string())
            .collect(),
        Err(e) => {
            tracing::debug!(%expression, error = %e, "invalid expression, no events");
            Vec::new()
        }
    }
}
