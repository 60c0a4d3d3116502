use crate::{
    pattern::{Pattern, PatternType, PatternValueType},
    search, CronError, Result,
};
use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use std::{collections::BTreeSet, fmt::Display, iter::FusedIterator, str::FromStr};

/// Represents a parsed cron schedule with its methods.
///
/// For cron schedule clarification and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub struct Schedule {
    pub(crate) minute: Pattern,
    pub(crate) hour: Pattern,
    pub(crate) dom: Pattern,
    pub(crate) month: Pattern,
    pub(crate) dow: Pattern,
    command: Option<String>,
}

impl Schedule {
    /// Parses and validates provided `pattern` and constructs [`Schedule`] instance.
    ///
    /// The pattern consists of five fields separated by single spaces,
    /// optionally followed by a sixth free-text command token.
    ///
    /// Alternative way to construct [`Schedule`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`CronError`] in a case provided pattern is unparsable or has format errors.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let elements: Vec<&str> = pattern.split(' ').collect();

        if elements.len() != 5 && elements.len() != 6 {
            return Err(CronError::InvalidCronSchedule(pattern));
        }

        let schedule = Self {
            minute: Pattern::parse(PatternType::Minutes, elements[0])?,
            hour: Pattern::parse(PatternType::Hours, elements[1])?,
            dom: Pattern::parse(PatternType::Doms, elements[2])?,
            month: Pattern::parse(PatternType::Months, elements[3])?,
            dow: Pattern::parse(PatternType::Dows, elements[4])?,
            command: elements.get(5).filter(|c| !c.is_empty()).map(|c| c.to_string()),
        };

        tracing::debug!(%pattern, schedule = %schedule, "schedule parsed");
        Ok(schedule)
    }

    /// Minutes of the hour, `0..=59`.
    pub fn minutes(&self) -> &BTreeSet<PatternValueType> {
        self.minute.values()
    }

    /// Hours of the day, `0..=23`.
    pub fn hours(&self) -> &BTreeSet<PatternValueType> {
        self.hour.values()
    }

    /// Days of the month, `1..=31`.
    pub fn days(&self) -> &BTreeSet<PatternValueType> {
        self.dom.values()
    }

    /// Months of the year, `1..=12`.
    pub fn months(&self) -> &BTreeSet<PatternValueType> {
        self.month.values()
    }

    /// Days of the week, `0..=6` where `0` is Sunday.
    pub fn weekdays(&self) -> &BTreeSet<PatternValueType> {
        self.dow.values()
    }

    /// Trailing command token, if any.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Returns time of the upcoming event, starting from the provided `reference` (inclusively).
    ///
    /// Seconds of the `reference` are ignored. Day of month and day of week constraints
    /// must both be satisfied by the event.
    ///
    /// Returns [`CronError::NotFound`] if there is no event
    /// within [`SEARCH_HORIZON_YEARS`](crate::SEARCH_HORIZON_YEARS) after the reference year.
    #[inline]
    pub fn next_occurrence(&self, reference: &NaiveDateTime) -> Result<NaiveDateTime> {
        search::next_occurrence(self, reference)
    }

    /// Same as [`Schedule::next_occurrence`] for the local civil time of `current`.
    ///
    /// The found time is converted back to the timezone of `current`:
    /// - time which doesn't exist in the timezone (DST gap) is skipped;
    /// - ambiguous time resolves to the earliest instance not before `current`.
    pub fn upcoming<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Result<DateTime<Tz>> {
        let timezone = current.timezone();
        let mut reference = current.naive_local();

        loop {
            let next = self.next_occurrence(&reference)?;
            match timezone.from_local_datetime(&next) {
                LocalResult::Single(next) => return Ok(next),
                LocalResult::Ambiguous(earliest, latest) => {
                    return Ok(if earliest >= *current { earliest } else { latest });
                }
                LocalResult::None => {
                    tracing::trace!(%next, "skipping nonexistent local time");
                    reference = next + TimeDelta::minutes(1);
                }
            }
        }
    }

    /// Returns up to `count` upcoming events, starting from `reference` (inclusively).
    ///
    /// This is best-effort: the list is truncated when the search horizon is exhausted,
    /// so a schedule without upcoming events yields an empty list instead of an error.
    pub fn next_occurrences(&self, reference: &NaiveDateTime, count: usize) -> Vec<NaiveDateTime> {
        self.iter(reference).take(count).collect()
    }

    /// Returns iterator of events starting from `reference` (inclusively).
    ///
    /// Each following event is searched from one minute after the previous one.
    /// The iterator ends when there's no event within the search horizon.
    #[inline]
    pub fn iter(&self, reference: &NaiveDateTime) -> impl FusedIterator<Item = NaiveDateTime> {
        ScheduleIterator {
            schedule: self.clone(),
            reference: Some(*reference),
        }
    }

    /// Consumes [`Schedule`] and returns iterator of events starting from `reference` (inclusively).
    #[inline]
    pub fn into_iter(self, reference: &NaiveDateTime) -> impl FusedIterator<Item = NaiveDateTime> {
        ScheduleIterator {
            schedule: self,
            reference: Some(*reference),
        }
    }
}

/// Contains iterator state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct ScheduleIterator {
    schedule: Schedule,
    reference: Option<NaiveDateTime>,
}

impl Iterator for ScheduleIterator {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let reference = self.reference.take()?;
        match self.schedule.next_occurrence(&reference) {
            Ok(next) => {
                self.reference = next.checked_add_signed(TimeDelta::minutes(1));
                Some(next)
            }
            Err(e) => {
                tracing::debug!(error = %e, "no more events");
                None
            }
        }
    }
}

impl FusedIterator for ScheduleIterator {}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.to_string()
    }
}

impl From<&Schedule> for String {
    fn from(value: &Schedule) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Schedule {
    type Error = CronError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Schedule {
    type Error = CronError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Schedule {
    type Error = CronError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Schedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.dom, self.month, self.dow
        )?;
        if let Some(command) = &self.command {
            write!(f, " {command}")?;
        }
        Ok(())
    }
}
