//! Team model and scheduling preferences.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{DayOfWeek, DivisionCode, TeamId};
use crate::error::ScheduleError;

/// A team in the league.
///
/// Loaded before a run; never modified by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team identifier.
    pub id: TeamId,
    /// Division the team plays in.
    pub division: DivisionCode,
    /// Display name.
    pub name: String,
    /// Position within the division (1-based), referenced by templates.
    pub division_slot: u32,
    /// Scheduling preferences, applied in order.
    pub preferences: Vec<TeamPreference>,
}

impl Team {
    /// Creates a team with no preferences.
    pub fn new(
        id: TeamId,
        division: impl Into<DivisionCode>,
        name: impl Into<String>,
        division_slot: u32,
    ) -> Self {
        Self {
            id,
            division: division.into(),
            name: name.into(),
            division_slot,
            preferences: Vec::new(),
        }
    }

    /// Adds a preference rule.
    pub fn with_preference(mut self, preference: TeamPreference) -> Self {
        self.preferences.push(preference);
        self
    }
}

/// What a preference rule asks the scheduler to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferenceAction {
    /// Avoid slots on this weekday at this time.
    Exclude,
}

/// A weekday + time-of-day preference.
///
/// Textual form is `<action><day><HH:MM>`, e.g. `-Tue18:30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPreference {
    pub action: PreferenceAction,
    pub day: DayOfWeek,
    pub time: NaiveTime,
}

impl TeamPreference {
    /// Creates an exclusion rule.
    pub fn exclude(day: DayOfWeek, time: NaiveTime) -> Self {
        Self {
            action: PreferenceAction::Exclude,
            day,
            time,
        }
    }
}

impl fmt::Display for TeamPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            PreferenceAction::Exclude => '-',
        };
        write!(f, "{action}{}{}", self.day, self.time.format("%H:%M"))
    }
}

impl FromStr for TeamPreference {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidArgument(format!("malformed team preference: {s}"));

        let mut chars = s.chars();
        let action = match chars.next() {
            Some('-') => PreferenceAction::Exclude,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let day = rest.get(..3).ok_or_else(invalid)?.parse::<DayOfWeek>()?;
        let time = rest
            .get(3..)
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
            .ok_or_else(invalid)?;

        Ok(Self { action, day, time })
    }
}
