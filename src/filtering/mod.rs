//! Slot filters and the filter engine.
//!
//! Narrows the open slots of a week down to the ones acceptable for one
//! game: team preference exclusions, weekday balance, and recent
//! same-day / same-time streaks.
//!
//! # Usage
//!
//! ```
//! use league_slotter::filtering::{FilterEngine, rules};
//!
//! let engine = FilterEngine::new()
//!     .with_filter(rules::TeamPreferenceFilter)
//!     .with_filter(rules::RecentDayStreak);
//! assert_eq!(engine.filter_names(), vec!["team-preferences", "recent-day-streak"]);
//! ```
//!
//! # Relaxation
//! Filters never backfill. A filter that empties the pool hands an empty
//! pool to the caller; only preference exclusions are softened, by
//! keeping a random share of the slots they match.

mod context;
mod engine;
pub mod rules;

pub use context::{FilterContext, SchedulingNotes};
pub use engine::FilterEngine;

use std::fmt::Debug;

use crate::error::StoreResult;
use crate::models::{GameToSchedule, ScheduledSlot};

/// One narrowing step over a game's candidate slots.
pub trait SlotFilter: Send + Sync + Debug {
    /// Filter name, used in notes.
    fn name(&self) -> &'static str;

    /// Whether the filter applies in the current context.
    fn is_active(&self, _context: &FilterContext<'_>) -> bool {
        true
    }

    /// Returns the candidates that survive this filter.
    ///
    /// Implementations only remove slots; they never add any.
    fn filter(
        &self,
        game: &GameToSchedule,
        candidates: Vec<ScheduledSlot>,
        context: &mut FilterContext<'_>,
    ) -> StoreResult<Vec<ScheduledSlot>>;

    /// Filter description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
