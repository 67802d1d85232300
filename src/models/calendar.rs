//! Season calendar and weekday models.
//!
//! Pure date arithmetic: no store access, no randomness.
//!
//! # Week Model
//! Week 1 starts on the season start date (a Monday by convention).
//! Week N starts `7 * (N - 1)` days later and covers 7 days inclusive.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ScheduleError, ScheduleResult};

/// Day of the week, indexed Mon=1 .. Sun=7.
///
/// Serialized as its short name so it can key TOML and JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    /// All days in index order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
        DayOfWeek::Sun,
    ];

    /// Looks up a day by index (1 = Mon .. 7 = Sun).
    pub fn from_index(index: u32) -> ScheduleResult<Self> {
        match index {
            1..=7 => Ok(Self::ALL[(index - 1) as usize]),
            _ => Err(ScheduleError::InvalidArgument(format!(
                "day of week index {index} out of range 1..=7"
            ))),
        }
    }

    /// Index of this day (1 = Mon .. 7 = Sun).
    #[inline]
    pub fn index(self) -> u32 {
        self as u32 + 1
    }

    /// Three-letter name ("Mon").
    pub fn short_name(self) -> &'static str {
        match self {
            DayOfWeek::Mon => "Mon",
            DayOfWeek::Tue => "Tue",
            DayOfWeek::Wed => "Wed",
            DayOfWeek::Thu => "Thu",
            DayOfWeek::Fri => "Fri",
            DayOfWeek::Sat => "Sat",
            DayOfWeek::Sun => "Sun",
        }
    }

    /// Full name ("Monday").
    pub fn long_name(self) -> &'static str {
        match self {
            DayOfWeek::Mon => "Monday",
            DayOfWeek::Tue => "Tuesday",
            DayOfWeek::Wed => "Wednesday",
            DayOfWeek::Thu => "Thursday",
            DayOfWeek::Fri => "Friday",
            DayOfWeek::Sat => "Saturday",
            DayOfWeek::Sun => "Sunday",
        }
    }

    /// Day of the week a date falls on.
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Mon => Weekday::Mon,
            DayOfWeek::Tue => Weekday::Tue,
            DayOfWeek::Wed => Weekday::Wed,
            DayOfWeek::Thu => Weekday::Thu,
            DayOfWeek::Fri => Weekday::Fri,
            DayOfWeek::Sat => Weekday::Sat,
            DayOfWeek::Sun => Weekday::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for DayOfWeek {
    type Err = ScheduleError;

    /// Accepts either the short ("Tue") or long ("Tuesday") name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.short_name() == s || d.long_name() == s)
            .ok_or_else(|| ScheduleError::InvalidArgument(format!("unknown day of week name: {s}")))
    }
}

impl Serialize for DayOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short_name())
    }
}

impl<'de> Deserialize<'de> for DayOfWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// The 7-day span [start, end] covered by one season week.
///
/// Both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSpan {
    /// Week number (1-based).
    pub week: u32,
    /// First day of the week.
    pub start: NaiveDate,
    /// Last day of the week.
    pub end: NaiveDate,
}

impl WeekSpan {
    /// Whether a date falls within this week.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The 7 dates of this week in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }

    /// First day of the lookback window reaching `weeks` whole weeks back.
    pub fn lookback_start(&self, weeks: u32) -> NaiveDate {
        self.start - Duration::weeks(i64::from(weeks))
    }
}

/// Maps season week numbers onto calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    /// First day of week 1.
    pub start_date: NaiveDate,
}

impl SeasonCalendar {
    /// Creates a calendar whose week 1 starts on `start_date`.
    pub fn new(start_date: NaiveDate) -> Self {
        Self { start_date }
    }

    /// Returns the span of the given week.
    ///
    /// Weeks are 1-based; week 0 and weeks past the last representable
    /// date are rejected.
    pub fn week_span(&self, week: u32) -> ScheduleResult<WeekSpan> {
        if week == 0 {
            return Err(ScheduleError::InvalidArgument(
                "week numbers start at 1".to_string(),
            ));
        }
        let out_of_range =
            || ScheduleError::InvalidArgument(format!("week {week} is past the end of the calendar"));
        let start = self
            .start_date
            .checked_add_days(Days::new(7 * u64::from(week - 1)))
            .ok_or_else(out_of_range)?;
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or_else(out_of_range)?;
        Ok(WeekSpan { week, start, end })
    }

    /// Week number containing `date`, or `None` before the season starts.
    pub fn week_of(&self, date: NaiveDate) -> Option<u32> {
        let offset = (date - self.start_date).num_days();
        if offset < 0 {
            return None;
        }
        u32::try_from(offset / 7 + 1).ok()
    }
}
