/// Common utility functions.
use crate::pattern::PatternValueType;
use std::num::IntErrorKind;

/// Converts string into unsigned number.
pub(crate) fn parse_digital_value(input: &str) -> Option<PatternValueType> {
    input.parse::<PatternValueType>().ok()
}

/// Converts string into a step value, too big numbers saturate to the maximum.
pub(crate) fn parse_step_value(input: &str) -> Option<PatternValueType> {
    match input.parse::<PatternValueType>() {
        Ok(value) => Some(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(PatternValueType::MAX),
        Err(_) => None,
    }
}

/// Returns `true` if provided year is leap.
#[inline]
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in specified month.
pub(crate) fn days_in_month(year: i32, month: PatternValueType) -> PatternValueType {
    if month == 0 || month > 12 {
        panic!("Invalid month: {month}");
    }

    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => unreachable!(),
    }
}

/// Calculates day of week for specified date, `0` is Sunday.
pub(crate) fn day_of_week(year: i32, month: PatternValueType, day: PatternValueType) -> PatternValueType {
    if day == 0 || month == 0 || month > 12 || day > days_in_month(year, month) {
        panic!("Invalid date: {year:04}-{month:02}-{day:02}");
    }

    let month_offset: i32 = if is_leap_year(year) {
        [0, 3, 4, 0, 2, 5, 0, 3, 6, 1, 4, 6]
    } else {
        [0, 3, 3, 6, 1, 4, 6, 2, 5, 0, 3, 5]
    }[(month - 1) as usize];

    let year = year - 1;
    let dow = day as i32
        + month_offset
        + 5 * year.rem_euclid(4)
        + 4 * year.rem_euclid(100)
        + 6 * year.rem_euclid(400);

    dow.rem_euclid(7) as PatternValueType
}
