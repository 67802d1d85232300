//! In-memory [`ScheduleStore`].

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use super::ScheduleStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{
    AvailabilityWindow, DayOfWeek, DefaultScheduleEntry, DivisionCode, GameId, GameToSchedule,
    PendingGame, ScheduledSlot, SlotId, Team, TeamId, TeamPreference,
};

/// League data held in ordered maps.
///
/// Ids are handed out sequentially from 1 and restart after a truncate.
///
/// # Example
/// ```
/// use league_slotter::models::{DefaultScheduleEntry, Team};
/// use league_slotter::store::{MemoryStore, ScheduleStore};
///
/// let store = MemoryStore::new()
///     .with_team(Team::new(1, "A", "Hawks", 1))
///     .with_team(Team::new(2, "A", "Owls", 2))
///     .with_template_entry(DefaultScheduleEntry::new(2, 1, 1, 2));
///
/// assert_eq!(store.list_divisions().unwrap(), vec!["A".to_string()]);
/// assert_eq!(store.default_schedule_length_weeks(2).unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    teams: BTreeMap<TeamId, Team>,
    templates: Vec<DefaultScheduleEntry>,
    windows: Vec<AvailabilityWindow>,
    skip_dates: Vec<NaiveDate>,
    pending: BTreeMap<GameId, GameToSchedule>,
    slots: BTreeMap<SlotId, ScheduledSlot>,
    next_game_id: GameId,
    next_slot_id: SlotId,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            teams: BTreeMap::new(),
            templates: Vec::new(),
            windows: Vec::new(),
            skip_dates: Vec::new(),
            pending: BTreeMap::new(),
            slots: BTreeMap::new(),
            next_game_id: 1,
            next_slot_id: 1,
        }
    }

    /// Adds (or replaces) a team.
    pub fn with_team(mut self, team: Team) -> Self {
        self.teams.insert(team.id, team);
        self
    }

    /// Adds a template row.
    pub fn with_template_entry(mut self, entry: DefaultScheduleEntry) -> Self {
        self.templates.push(entry);
        self
    }

    /// Adds a set of template rows.
    pub fn with_template(mut self, entries: impl IntoIterator<Item = DefaultScheduleEntry>) -> Self {
        self.templates.extend(entries);
        self
    }

    /// Adds a venue window.
    pub fn with_window(mut self, window: AvailabilityWindow) -> Self {
        self.windows.push(window);
        self
    }

    /// Marks a date on which no games may be played.
    pub fn with_skip_date(mut self, date: NaiveDate) -> Self {
        self.skip_dates.push(date);
        self
    }

    /// Every slot, in id order.
    pub fn all_slots(&self) -> Vec<ScheduledSlot> {
        self.slots.values().cloned().collect()
    }

    /// Every pending game, in id order.
    pub fn all_pending_games(&self) -> Vec<PendingGame> {
        self.pending
            .iter()
            .map(|(&id, game)| PendingGame {
                id,
                game: game.clone(),
            })
            .collect()
    }

    /// Assigned slots ordered by date, time and venue.
    pub fn assigned_slots(&self) -> Vec<ScheduledSlot> {
        let mut assigned: Vec<ScheduledSlot> = self
            .slots
            .values()
            .filter(|s| !s.is_open())
            .cloned()
            .collect();
        assigned.sort_by(|a, b| (a.date, a.time, &a.venue).cmp(&(b.date, b.time, &b.venue)));
        assigned
    }

    /// (home, away) game counts for a team.
    pub fn home_away_counts(&self, team_id: TeamId) -> (usize, usize) {
        self.slots
            .values()
            .filter_map(ScheduledSlot::assignment)
            .fold((0, 0), |(home, away), a| {
                (
                    home + usize::from(a.home_team == team_id),
                    away + usize::from(a.visiting_team == team_id),
                )
            })
    }

    fn sorted_by_kickoff(mut slots: Vec<ScheduledSlot>) -> Vec<ScheduledSlot> {
        slots.sort_by_key(|s| (s.date, s.time, s.id));
        slots
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleStore for MemoryStore {
    fn list_divisions(&self) -> StoreResult<Vec<DivisionCode>> {
        let mut divisions: Vec<DivisionCode> =
            self.teams.values().map(|t| t.division.clone()).collect();
        divisions.sort();
        divisions.dedup();
        Ok(divisions)
    }

    fn teams_in_division(&self, division: &str) -> StoreResult<Vec<Team>> {
        let mut teams: Vec<Team> = self
            .teams
            .values()
            .filter(|t| t.division == division)
            .cloned()
            .collect();
        teams.sort_by_key(|t| t.division_slot);
        Ok(teams)
    }

    fn team(&self, team_id: TeamId) -> StoreResult<Option<Team>> {
        Ok(self.teams.get(&team_id).cloned())
    }

    fn team_preferences(&self, team_id: TeamId) -> StoreResult<Vec<TeamPreference>> {
        Ok(self
            .teams
            .get(&team_id)
            .map(|t| t.preferences.clone())
            .unwrap_or_default())
    }

    fn resolve_team_id(&self, division_slot: u32, division: &str) -> StoreResult<TeamId> {
        self.teams
            .values()
            .find(|t| t.division == division && t.division_slot == division_slot)
            .map(|t| t.id)
            .ok_or_else(|| StoreError::UnknownTeamSlot {
                division: division.to_string(),
                slot: division_slot,
            })
    }

    fn default_schedule_length_weeks(&self, division_size: usize) -> StoreResult<u32> {
        let mut weeks: Vec<u32> = self
            .templates
            .iter()
            .filter(|e| e.division_size == division_size)
            .map(|e| e.week)
            .collect();
        weeks.sort_unstable();
        weeks.dedup();
        Ok(weeks.len() as u32)
    }

    fn default_schedule_template(
        &self,
        division_size: usize,
    ) -> StoreResult<Vec<DefaultScheduleEntry>> {
        Ok(self
            .templates
            .iter()
            .filter(|e| e.division_size == division_size)
            .copied()
            .collect())
    }

    fn add_on_availability_windows(&self, day: DayOfWeek) -> StoreResult<Vec<AvailabilityWindow>> {
        Ok(self
            .windows
            .iter()
            .filter(|w| w.day == day)
            .cloned()
            .collect())
    }

    fn skip_dates(&self) -> StoreResult<Vec<NaiveDate>> {
        Ok(self.skip_dates.clone())
    }

    fn save_pending_game(&mut self, game: GameToSchedule) -> StoreResult<GameId> {
        let id = self.next_game_id;
        self.next_game_id += 1;
        self.pending.insert(id, game);
        Ok(id)
    }

    fn pending_games(&self, division: &str, week: u32) -> StoreResult<Vec<PendingGame>> {
        Ok(self
            .pending
            .iter()
            .filter(|(_, g)| g.division == division && g.week == week)
            .map(|(&id, game)| PendingGame {
                id,
                game: game.clone(),
            })
            .collect())
    }

    fn remove_pending_game(&mut self, id: GameId) -> StoreResult<()> {
        self.pending
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "pending game",
                id,
            })
    }

    fn pending_game_count(&self) -> StoreResult<usize> {
        Ok(self.pending.len())
    }

    fn truncate_pending_games(&mut self) -> StoreResult<()> {
        self.pending.clear();
        self.next_game_id = 1;
        Ok(())
    }

    fn create_slot(&mut self, date: NaiveDate, time: NaiveTime, venue: &str) -> StoreResult<SlotId> {
        let id = self.next_slot_id;
        self.next_slot_id += 1;
        self.slots
            .insert(id, ScheduledSlot::open(id, date, time, venue));
        Ok(id)
    }

    fn save_slot(&mut self, slot: &ScheduledSlot) -> StoreResult<()> {
        match self.slots.get_mut(&slot.id) {
            Some(stored) => {
                *stored = slot.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "slot",
                id: slot.id,
            }),
        }
    }

    fn open_slots_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<ScheduledSlot>> {
        let open = self
            .slots
            .values()
            .filter(|s| s.is_open() && s.date >= start && s.date <= end)
            .cloned()
            .collect();
        Ok(Self::sorted_by_kickoff(open))
    }

    fn past_games_for_team(
        &self,
        team_id: TeamId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<ScheduledSlot>> {
        let played = self
            .slots
            .values()
            .filter(|s| s.involves(team_id) && s.date >= start && s.date <= end)
            .cloned()
            .collect();
        Ok(Self::sorted_by_kickoff(played))
    }

    fn weekday_breakdown_for_team(&self, team_id: TeamId) -> StoreResult<BTreeMap<DayOfWeek, u32>> {
        let mut breakdown: BTreeMap<DayOfWeek, u32> =
            DayOfWeek::ALL.into_iter().map(|d| (d, 0)).collect();
        for slot in self.slots.values().filter(|s| s.involves(team_id)) {
            *breakdown.entry(slot.day()).or_insert(0) += 1;
        }
        Ok(breakdown)
    }

    fn purge_slots_on_date(&mut self, date: NaiveDate) -> StoreResult<usize> {
        let before = self.slots.len();
        self.slots.retain(|_, s| s.date != date);
        Ok(before - self.slots.len())
    }

    fn truncate_slots(&mut self) -> StoreResult<()> {
        self.slots.clear();
        self.next_slot_id = 1;
        Ok(())
    }
}
