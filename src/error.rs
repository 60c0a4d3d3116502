use thiserror::Error;

/// Crate specific Errors implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CronError {
    /// Wrong number of fields in the cron schedule expression.
    #[error("invalid cron expression: {0}. Expected format: minutes hours days months weekdays [command]")]
    InvalidCronSchedule(String),
    /// One of the schedule fields can't be parsed.
    #[error("invalid {field} field: {error}")]
    InvalidField {
        /// Name of the field.
        field: &'static str,
        /// Underlying field error, already included into the message.
        error: Box<CronError>,
    },
    /// Field part with more than one slash.
    #[error("invalid field syntax: {0}, a part can't have more than one slash")]
    TooManySlashes(String),
    /// Step after slash is absent or isn't a positive number.
    #[error("invalid step value in the part: {0}, step must be a positive number")]
    InvalidStepValue(String),
    /// Malformed or inverted range.
    #[error("invalid range in the part: {0}")]
    InvalidRangeValue(String),
    /// Value isn't a number, `*` or a range.
    #[error("invalid value in the part: {0}, must be a number, `*` or a range")]
    InvalidDigitalValue(String),
    /// Value is outside of the field's bounds.
    #[error("invalid value in the part: {part}, values must be within the allowed range {min}-{max}")]
    ValueOutOfBounds {
        /// Offending part of the field.
        part: String,
        /// Lower bound of the field.
        min: u16,
        /// Upper bound of the field.
        max: u16,
    },
    /// No upcoming event within the search horizon.
    #[error("unable to find occurrences within {years} years of the schedule: {schedule}")]
    NotFound {
        /// Canonical form of the schedule.
        schedule: String,
        /// Length of the search horizon.
        years: i32,
    },
}

impl CronError {
    /// Returns `true` if the error is caused by a malformed expression.
    pub fn is_syntax(&self) -> bool {
        !self.is_not_found()
    }

    /// Returns `true` if the schedule has no upcoming events within the search horizon.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
