use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;
use thiserror::Error;

/// Input format for dates typed at the menu prompt.
pub const INPUT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Offset of Thursday in a Monday-based week.
const THURSDAY: i64 = 3;
/// Thursday..=Tuesday spans six calendar days.
const WEEK_SPAN_DAYS: i64 = 5;

/// Thursday-to-Tuesday window of one NFL round, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every calendar day from `start` through `end`, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bis {}",
            self.start.format(INPUT_DATE_FORMAT),
            self.end.format(INPUT_DATE_FORMAT)
        )
    }
}

/// Map a date to its NFL week.
///
/// Thursday through Tuesday belong to the week starting on the most recent
/// Thursday. Wednesday sits between two rounds and maps to the upcoming one.
pub fn week_range(date: NaiveDate) -> WeekRange {
    let start = if date.weekday() == Weekday::Wed {
        date + Duration::days(1)
    } else {
        let weekday = date.weekday().num_days_from_monday() as i64;
        date - Duration::days((weekday - THURSDAY).rem_euclid(7))
    };
    WeekRange {
        start,
        end: start + Duration::days(WEEK_SPAN_DAYS),
    }
}

#[derive(Debug, Error)]
#[error("invalid date {input:?}, expected DD.MM.YYYY")]
pub struct DateInputError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

pub fn parse_date_input(raw: &str) -> Result<NaiveDate, DateInputError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, INPUT_DATE_FORMAT).map_err(|source| DateInputError {
        input: trimmed.to_string(),
        source,
    })
}
