//! Season orchestrator.

use std::fmt;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use super::randomize_division_order;
use crate::config::SchedulerConfig;
use crate::error::ScheduleResult;
use crate::expand::{expand_templates, season_length_weeks, ExpansionSummary};
use crate::filtering::{FilterContext, FilterEngine, SchedulingNotes};
use crate::materialize::SlotMaterializer;
use crate::models::{DivisionCode, PendingGame, SlotId};
use crate::store::ScheduleStore;

/// One game's pass through the filter engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameAttempt {
    /// The game as it stood in the pending pool.
    pub game: PendingGame,
    /// Slot the game was placed in, if any.
    pub slot: Option<SlotId>,
    /// Decisions taken while narrowing.
    pub notes: SchedulingNotes,
}

impl GameAttempt {
    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.slot.is_some()
    }
}

/// Report of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonOutcome {
    /// Weeks looped over.
    pub season_weeks: u32,
    /// Template expansion, when setup ran.
    pub expansion: Option<ExpansionSummary>,
    /// Open slots created during setup.
    pub slots_created: usize,
    /// Slots removed for skip dates during setup.
    pub slots_purged: usize,
    /// Division order of week 1.
    pub division_order: Vec<DivisionCode>,
    pub games_scheduled: usize,
    /// Games still in the pending pool after the run.
    pub games_left: usize,
    /// Every game attempted, in processing order.
    pub attempts: Vec<GameAttempt>,
    /// Soft conditions, such as a division with nothing to play in a week.
    pub week_notes: Vec<String>,
}

impl SeasonOutcome {
    /// Attempts that found no slot.
    pub fn unscheduled(&self) -> impl Iterator<Item = &GameAttempt> {
        self.attempts.iter().filter(|a| !a.is_scheduled())
    }
}

impl fmt::Display for SeasonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for note in &self.week_notes {
            writeln!(f, "{note}")?;
        }
        for attempt in self.unscheduled() {
            writeln!(f, "No slots available for {}", attempt.game)?;
        }
        writeln!(f, "Total games scheduled: {}", self.games_scheduled)?;
        write!(f, "Games left to schedule: {}", self.games_left)
    }
}

/// Builds a season's schedule against a store.
///
/// Holds the store mutably for the whole run.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use league_slotter::config::{SchedulerConfig, SeasonConfig};
/// use league_slotter::models::{AvailabilityWindow, DayOfWeek, DefaultScheduleEntry, Team};
/// use league_slotter::scheduler::SeasonScheduler;
/// use league_slotter::store::MemoryStore;
///
/// let mut store = MemoryStore::new()
///     .with_team(Team::new(1, "A", "Ants", 1))
///     .with_team(Team::new(2, "A", "Apes", 2))
///     .with_template_entry(DefaultScheduleEntry::new(2, 1, 1, 2))
///     .with_window(AvailabilityWindow::new(
///         "Field 1",
///         DayOfWeek::Mon,
///         NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
///         NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
///     ));
///
/// let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
/// let config = SchedulerConfig::new(SeasonConfig::new(start, 90).with_regenerate(true));
///
/// let outcome = SeasonScheduler::new(&mut store, config).run().unwrap();
/// assert_eq!(outcome.games_scheduled, 1);
/// assert_eq!(outcome.games_left, 0);
/// ```
#[derive(Debug)]
pub struct SeasonScheduler<'a, S: ScheduleStore> {
    store: &'a mut S,
    config: SchedulerConfig,
    engine: FilterEngine,
}

impl<'a, S: ScheduleStore> SeasonScheduler<'a, S> {
    /// Creates a scheduler with the standard filter chain.
    pub fn new(store: &'a mut S, config: SchedulerConfig) -> Self {
        Self {
            store,
            config,
            engine: FilterEngine::standard(),
        }
    }

    /// Replaces the filter chain.
    pub fn with_engine(mut self, engine: FilterEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs with the thread-local generator.
    pub fn run(&mut self) -> ScheduleResult<SeasonOutcome> {
        let mut rng = rand::rng();
        self.generate(&mut rng)
    }

    /// Runs setup (if configured) and the assignment loop.
    ///
    /// # Errors
    /// Configuration errors, a missing template, an unusable division list,
    /// or any store failure. Games that find no slot are not errors; they
    /// are reported in the outcome.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> ScheduleResult<SeasonOutcome> {
        self.config.validate()?;
        let season = &self.config.season;
        let calendar = season.calendar();
        let materializer = SlotMaterializer::new(calendar, season.game_length_minutes)?;

        let mut outcome = SeasonOutcome::default();

        if season.regenerate {
            info!("clearing previous season");
            self.store.truncate_pending_games()?;
            self.store.truncate_slots()?;

            let expansion = expand_templates(&mut *self.store)?;
            outcome.season_weeks = expansion.season_weeks;
            outcome.expansion = Some(expansion);

            outcome.slots_created = materializer.materialize(&mut *self.store, expansion.season_weeks)?;
            outcome.slots_purged = materializer.purge_skip_dates(&mut *self.store)?;
            info!(
                games = expansion.games_created,
                slots = outcome.slots_created,
                purged = outcome.slots_purged,
                "season setup complete"
            );
        } else {
            outcome.season_weeks = season_length_weeks(&*self.store)?;
        }

        let divisions = self.store.list_divisions()?;
        let mut order = randomize_division_order(divisions, rng)?;
        info!(order = ?order, "division order");
        outcome.division_order = order.clone();

        for week in 1..=outcome.season_weeks {
            let span = calendar.week_span(week)?;
            info!(week, start = %span.start, end = %span.end, "scheduling week");

            for division in &order {
                let pending = self.store.pending_games(division, week)?;
                if pending.is_empty() {
                    let note = format!("No games to schedule for division {division} in week {week}");
                    debug!("{note}");
                    outcome.week_notes.push(note);
                    continue;
                }

                for game in pending {
                    let open = self.store.open_slots_in_range(span.start, span.end)?;

                    let (pool, notes) = {
                        let mut context =
                            FilterContext::new(&*self.store, &self.config.filters, span, rng);
                        let pool = self.engine.narrow(&game.game, open, &mut context)?;
                        (pool, context.into_notes())
                    };
                    debug!(game = %game, notes = %notes, "slots narrowed");

                    let slot = match pool.choose(rng) {
                        Some(chosen) => {
                            let mut slot = chosen.clone();
                            slot.assign(&game.game)?;
                            self.store.save_slot(&slot)?;
                            self.store.remove_pending_game(game.id)?;
                            outcome.games_scheduled += 1;
                            debug!(game = %game, slot = %slot, "game scheduled");
                            Some(slot.id)
                        }
                        None => {
                            warn!(game = %game, "no slots available");
                            None
                        }
                    };

                    outcome.attempts.push(GameAttempt { game, slot, notes });
                }
            }

            order.rotate_left(1);
        }

        outcome.games_left = self.store.pending_game_count()?;
        info!(
            scheduled = outcome.games_scheduled,
            left = outcome.games_left,
            "season scheduling finished"
        );
        Ok(outcome)
    }
}
