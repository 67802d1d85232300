//! Venue availability windows.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::DayOfWeek;

/// A recurring weekly opening at a venue.
///
/// Every week of the season, the interval [start, end) on `day` is cut
/// into back-to-back games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub venue: String,
    pub day: DayOfWeek,
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    pub fn new(
        venue: impl Into<String>,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            venue: venue.into(),
            day,
            start,
            end,
        }
    }

    /// Length of the window in minutes. Negative if `end < start`.
    #[inline]
    pub fn available_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Number of whole games of `game_minutes` that fit in the window.
    pub fn slot_count(&self, game_minutes: u32) -> u32 {
        if game_minutes == 0 {
            return 0;
        }
        let available = self.available_minutes();
        if available <= 0 {
            return 0;
        }
        (available / i64::from(game_minutes)) as u32
    }
}
