//! Filter engine: runs slot filters in sequence.
//!
//! Filters apply in registration order. Once the pool is down to a
//! single slot (or none) the remaining filters are skipped, since there
//! is nothing left to choose between.

use std::sync::Arc;

use super::{rules, FilterContext, SlotFilter};
use crate::error::StoreResult;
use crate::models::{GameToSchedule, ScheduledSlot};

/// An ordered chain of slot filters.
///
/// # Example
/// ```
/// use league_slotter::filtering::FilterEngine;
///
/// let engine = FilterEngine::standard();
/// assert_eq!(engine.filter_names().len(), 4);
/// ```
#[derive(Clone, Default)]
pub struct FilterEngine {
    filters: Vec<Arc<dyn SlotFilter>>,
}

impl FilterEngine {
    /// Creates an empty engine. Candidates pass through unchanged.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard chain: preferences, weekday balance, day streak,
    /// time streak.
    pub fn standard() -> Self {
        Self::new()
            .with_filter(rules::TeamPreferenceFilter)
            .with_filter(rules::WeekdayBalanceFilter)
            .with_filter(rules::RecentDayStreak)
            .with_filter(rules::RecentTimeStreak)
    }

    /// Appends a filter to the chain.
    pub fn with_filter<F: SlotFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Names of the filters in order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Narrows `candidates` for `game`.
    ///
    /// Returns whatever survives, possibly nothing.
    pub fn narrow(
        &self,
        game: &GameToSchedule,
        mut candidates: Vec<ScheduledSlot>,
        context: &mut FilterContext<'_>,
    ) -> StoreResult<Vec<ScheduledSlot>> {
        context.note(format!(
            "Number of available slots to begin with: {}",
            candidates.len()
        ));

        for filter in &self.filters {
            if candidates.len() <= 1 {
                break;
            }
            if !filter.is_active(context) {
                continue;
            }
            let before = candidates.len();
            candidates = filter.filter(game, candidates, context)?;
            context.note(format!(
                "Slots after {}: {} -> {}",
                filter.name(),
                before,
                candidates.len()
            ));
        }

        Ok(candidates)
    }
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("filters", &self.filter_names())
            .finish()
    }
}
