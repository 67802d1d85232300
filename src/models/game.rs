//! Template rows and games waiting for a slot.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DivisionCode, GameId, TeamId};

/// One row of a default round-robin schedule.
///
/// Teams are referenced by their position within the division
/// (`Team::division_slot`), so the same template serves every division
/// of the same size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultScheduleEntry {
    /// Number of teams in the divisions this row applies to.
    pub division_size: usize,
    /// Template week (1-based).
    pub week: u32,
    /// Home team position within the division.
    pub home_slot: u32,
    /// Visiting team position within the division.
    pub visiting_slot: u32,
}

impl DefaultScheduleEntry {
    pub fn new(division_size: usize, week: u32, home_slot: u32, visiting_slot: u32) -> Self {
        Self {
            division_size,
            week,
            home_slot,
            visiting_slot,
        }
    }
}

/// A game resolved to real teams, not yet placed in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameToSchedule {
    pub division: DivisionCode,
    /// Template week the game belongs to.
    pub week: u32,
    pub home_team: TeamId,
    pub visiting_team: TeamId,
    pub notes: Option<String>,
}

impl GameToSchedule {
    pub fn new(
        division: impl Into<DivisionCode>,
        week: u32,
        home_team: TeamId,
        visiting_team: TeamId,
    ) -> Self {
        Self {
            division: division.into(),
            week,
            home_team,
            visiting_team,
            notes: None,
        }
    }

    /// Attaches a free-form note.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Home team first, then visiting team.
    #[inline]
    pub fn teams(&self) -> [TeamId; 2] {
        [self.home_team, self.visiting_team]
    }
}

/// A [`GameToSchedule`] as held in the pending pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingGame {
    /// Surrogate id assigned by the store.
    pub id: GameId,
    pub game: GameToSchedule,
}

impl fmt::Display for PendingGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.game;
        write!(
            f,
            "game {} (week {}, division {}): team {} @ team {}",
            self.id, g.week, g.division, g.visiting_team, g.home_team
        )?;
        if let Some(notes) = &g.notes {
            write!(f, " [{notes}]")?;
        }
        Ok(())
    }
}
