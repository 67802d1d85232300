//! Data access for the scheduling core.
//!
//! The core never touches storage directly. It reads the roster,
//! templates and venue windows through [`ScheduleStore`] and writes
//! pending games and slots back through it. [`MemoryStore`] is the
//! in-process implementation.

mod memory;

pub use memory::MemoryStore;

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::error::StoreResult;
use crate::models::{
    AvailabilityWindow, DayOfWeek, DefaultScheduleEntry, DivisionCode, GameId, GameToSchedule,
    PendingGame, ScheduledSlot, SlotId, Team, TeamId, TeamPreference,
};

/// Read/write operations the scheduler needs from its data layer.
///
/// All date ranges are inclusive on both ends. Calls are synchronous;
/// a run holds the store exclusively for its whole duration.
pub trait ScheduleStore {
    // ---- roster ----

    /// Distinct division codes, sorted.
    fn list_divisions(&self) -> StoreResult<Vec<DivisionCode>>;

    /// Teams of a division, ordered by in-division slot.
    fn teams_in_division(&self, division: &str) -> StoreResult<Vec<Team>>;

    fn team(&self, team_id: TeamId) -> StoreResult<Option<Team>>;

    fn team_preferences(&self, team_id: TeamId) -> StoreResult<Vec<TeamPreference>>;

    /// Maps an in-division position to the global team id.
    fn resolve_team_id(&self, division_slot: u32, division: &str) -> StoreResult<TeamId>;

    // ---- templates ----

    /// Number of distinct weeks in the template for a division size.
    /// Zero means no template exists.
    fn default_schedule_length_weeks(&self, division_size: usize) -> StoreResult<u32>;

    fn default_schedule_template(
        &self,
        division_size: usize,
    ) -> StoreResult<Vec<DefaultScheduleEntry>>;

    // ---- venues ----

    /// Windows that open slots on the given weekday.
    fn add_on_availability_windows(&self, day: DayOfWeek) -> StoreResult<Vec<AvailabilityWindow>>;

    /// Dates on which no games may be played.
    fn skip_dates(&self) -> StoreResult<Vec<NaiveDate>>;

    // ---- pending games ----

    fn save_pending_game(&mut self, game: GameToSchedule) -> StoreResult<GameId>;

    fn pending_games(&self, division: &str, week: u32) -> StoreResult<Vec<PendingGame>>;

    fn remove_pending_game(&mut self, id: GameId) -> StoreResult<()>;

    fn pending_game_count(&self) -> StoreResult<usize>;

    fn truncate_pending_games(&mut self) -> StoreResult<()>;

    // ---- slots ----

    /// Creates an open slot.
    fn create_slot(&mut self, date: NaiveDate, time: NaiveTime, venue: &str) -> StoreResult<SlotId>;

    /// Persists a slot's current state.
    fn save_slot(&mut self, slot: &ScheduledSlot) -> StoreResult<()>;

    /// Open slots dated within [start, end], ordered by date then time.
    fn open_slots_in_range(&self, start: NaiveDate, end: NaiveDate)
        -> StoreResult<Vec<ScheduledSlot>>;

    /// Assigned slots involving the team within [start, end], oldest first.
    fn past_games_for_team(
        &self,
        team_id: TeamId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<ScheduledSlot>>;

    /// Games played per weekday by the team so far. Every weekday is present.
    fn weekday_breakdown_for_team(&self, team_id: TeamId) -> StoreResult<BTreeMap<DayOfWeek, u32>>;

    /// Deletes every slot, open or assigned, on the date. Returns the count removed.
    fn purge_slots_on_date(&mut self, date: NaiveDate) -> StoreResult<usize>;

    fn truncate_slots(&mut self) -> StoreResult<()>;
}
