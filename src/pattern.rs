use crate::{series::SeriesWithStep, utils, CronError, Result};
use std::{
    collections::BTreeSet,
    fmt::Display,
    ops::Bound::{Excluded, Included},
};

pub(crate) type PatternValueType = u16;

/// Parses a single cron field expression into the ordered set of its values.
///
/// The field is a comma-separated list of parts, each part is one of:
/// - `*`: every value from `min` to `max`;
/// - `v`: the single value;
/// - `a-b`: every value from `a` to `b` inclusively;
/// - any of the above followed by `/step`: every `step`-th value of the range,
///   where `v/step` means range from `v` to `max`.
///
/// All values must be within `min..=max`, otherwise [`CronError`] is returned.
///
/// ```rust
/// use cron_lookahead::parse_field;
///
/// let values = parse_field("1-10/5,3-12/3", 1, 31).unwrap();
/// assert_eq!(values.into_iter().collect::<Vec<_>>(), vec![1, 3, 6, 9, 12]);
/// ```
pub fn parse_field(input: &str, min: u16, max: u16) -> Result<BTreeSet<u16>> {
    let mut values = BTreeSet::new();
    for part in input.split(',') {
        let (start, end, step) = parse_part(part, min, max)?;
        values.extend(SeriesWithStep::new(start, end, step));
    }

    Ok(values)
}

/// Returns `(start, end, step)` of the single part of the field.
fn parse_part(
    part: &str,
    min: PatternValueType,
    max: PatternValueType,
) -> Result<(PatternValueType, PatternValueType, PatternValueType)> {
    let mut splitted = part.split('/');
    let range = splitted.next().unwrap_or_default();
    let step = splitted.next();
    if splitted.next().is_some() {
        return Err(CronError::TooManySlashes(part.to_owned()));
    }

    let step = match step {
        None => 1,
        Some(step) => match utils::parse_step_value(step) {
            Some(step) if step > 0 => step,
            _ => return Err(CronError::InvalidStepValue(part.to_owned())),
        },
    };

    let has_step = part.contains('/');
    let (start, end) = if range == "*" {
        (min, max)
    } else if let Some((start, end)) = range.split_once('-') {
        if end.contains('-') {
            return Err(CronError::InvalidRangeValue(part.to_owned()));
        }
        let start = utils::parse_digital_value(start).ok_or_else(|| CronError::InvalidRangeValue(part.to_owned()))?;
        let end = utils::parse_digital_value(end).ok_or_else(|| CronError::InvalidRangeValue(part.to_owned()))?;
        if start > end {
            return Err(CronError::InvalidRangeValue(part.to_owned()));
        }
        (start, end)
    } else {
        let value = utils::parse_digital_value(range).ok_or_else(|| CronError::InvalidDigitalValue(part.to_owned()))?;
        if has_step {
            (value, max)
        } else {
            (value, value)
        }
    };

    if start < min || end > max || start > end {
        return Err(CronError::ValueOutOfBounds {
            part: part.to_owned(),
            min,
            max,
        });
    }

    Ok((start, end, step))
}

/// Result of looking up the next value of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NextValue {
    /// Next value within the same period.
    Following(PatternValueType),
    /// No greater value, the first one starts the next period.
    Wrapped(PatternValueType),
}

/// Parsed values of a single schedule field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Pattern {
    type_: PatternType,
    values: BTreeSet<PatternValueType>,
}

impl Pattern {
    pub(crate) fn parse(type_: PatternType, input: &str) -> Result<Self> {
        let (min, max) = type_.min_max();
        let values = parse_field(input, min, max).map_err(|e| CronError::InvalidField {
            field: type_.name(),
            error: Box::new(e),
        })?;

        Ok(Self { type_, values })
    }

    #[inline]
    pub(crate) fn values(&self) -> &BTreeSet<PatternValueType> {
        &self.values
    }

    #[inline]
    pub(crate) fn contains(&self, value: PatternValueType) -> bool {
        self.values.contains(&value)
    }

    /// Looks up the smallest value greater than `current` which doesn't exceed `limit`.
    ///
    /// Returns `None` if no value is under the `limit` at all.
    pub(crate) fn next_after(&self, current: PatternValueType, limit: PatternValueType) -> Option<NextValue> {
        let first = self.values.first().copied().filter(|v| *v <= limit)?;
        let following = if current < limit {
            self.values.range((Excluded(current), Included(limit))).next().copied()
        } else {
            None
        };

        Some(match following {
            Some(value) => NextValue::Following(value),
            None => NextValue::Wrapped(first),
        })
    }

    /// Same as [`Pattern::next_after`] bounded by the field's maximum.
    #[inline]
    pub(crate) fn next_or_wrap(&self, current: PatternValueType) -> NextValue {
        let (min, max) = self.type_.min_max();
        self.next_after(current, max)
            .unwrap_or(NextValue::Wrapped(self.values.first().copied().unwrap_or(min)))
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values = self.values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        write!(f, "{}", values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum PatternType {
    Minutes = 0,
    Hours = 1,
    Doms = 2,
    Months = 3,
    Dows = 4,
}

impl PatternType {
    pub(crate) fn min_max(&self) -> (PatternValueType, PatternValueType) {
        match self {
            Self::Minutes => (0, 59),
            Self::Hours => (0, 23),
            Self::Doms => (1, 31),
            Self::Months => (1, 12),
            Self::Dows => (0, 6),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Minutes => "minute",
            Self::Hours => "hour",
            Self::Doms => "day",
            Self::Months => "month",
            Self::Dows => "weekday",
        }
    }
}
