//! Scheduled slot (solution) model.
//!
//! A slot is a concrete (date, time, venue) opening. It starts open and
//! is assigned a game exactly once. The open/assigned split is carried by
//! [`SlotState`], so a slot can never hold half a game.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{DayOfWeek, DivisionCode, GameToSchedule, SlotId, TeamId};
use crate::error::{ScheduleError, ScheduleResult};

/// The game placed in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAssignment {
    pub division: DivisionCode,
    pub home_team: TeamId,
    pub visiting_team: TeamId,
    /// Template week the game came from.
    pub template_week: u32,
}

impl GameAssignment {
    /// Whether `team` plays in this game.
    #[inline]
    pub fn involves(&self, team: TeamId) -> bool {
        self.home_team == team || self.visiting_team == team
    }
}

impl From<&GameToSchedule> for GameAssignment {
    fn from(game: &GameToSchedule) -> Self {
        Self {
            division: game.division.clone(),
            home_team: game.home_team,
            visiting_team: game.visiting_team,
            template_week: game.week,
        }
    }
}

/// Whether a slot is free or holds a game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotState {
    #[default]
    Open,
    Assigned(GameAssignment),
}

/// A concrete (date, time, venue) opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSlot {
    /// Surrogate id assigned by the store.
    pub id: SlotId,
    pub date: NaiveDate,
    /// Game start time.
    pub time: NaiveTime,
    pub venue: String,
    pub state: SlotState,
}

impl ScheduledSlot {
    /// Creates an open slot.
    pub fn open(id: SlotId, date: NaiveDate, time: NaiveTime, venue: impl Into<String>) -> Self {
        Self {
            id,
            date,
            time,
            venue: venue.into(),
            state: SlotState::Open,
        }
    }

    /// Day of the week the slot falls on.
    #[inline]
    pub fn day(&self) -> DayOfWeek {
        DayOfWeek::of(self.date)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self.state, SlotState::Open)
    }

    /// The game held by this slot, if any.
    pub fn assignment(&self) -> Option<&GameAssignment> {
        match &self.state {
            SlotState::Open => None,
            SlotState::Assigned(a) => Some(a),
        }
    }

    /// Whether `team` plays in this slot.
    pub fn involves(&self, team: TeamId) -> bool {
        self.assignment().is_some_and(|a| a.involves(team))
    }

    /// Places a game in this slot.
    ///
    /// # Errors
    /// `SlotAlreadyAssigned` if the slot already holds a game; the slot is
    /// left unchanged.
    pub fn assign(&mut self, game: &GameToSchedule) -> ScheduleResult<()> {
        if !self.is_open() {
            return Err(ScheduleError::SlotAlreadyAssigned(self.id));
        }
        self.state = SlotState::Assigned(GameAssignment::from(game));
        Ok(())
    }
}

impl fmt::Display for ScheduledSlot {
    /// One-line slot summary, e.g. `Tue 2024-04-02 18:30 @ Field 1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {}",
            self.day(),
            self.date.format("%Y-%m-%d"),
            self.time.format("%H:%M"),
            self.venue
        )
    }
}
