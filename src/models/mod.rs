//! League scheduling domain models.
//!
//! Provides the data types shared by every stage of a run: the season
//! calendar, teams and their preferences, template rows, pending games,
//! venue windows and the slots games are placed into.
//!
//! # Domain Mappings
//!
//! | league-slotter | Meaning |
//! |----------------|---------|
//! | DefaultScheduleEntry | Round-robin pairing by in-division position |
//! | GameToSchedule | Pairing resolved to real teams, waiting for a slot |
//! | AvailabilityWindow | Recurring weekly venue opening |
//! | ScheduledSlot | One concrete (date, time, venue) opening |

mod calendar;
mod game;
mod slot;
mod team;
mod venue;

pub use calendar::{DayOfWeek, SeasonCalendar, WeekSpan};
pub use game::{DefaultScheduleEntry, GameToSchedule, PendingGame};
pub use slot::{GameAssignment, ScheduledSlot, SlotState};
pub use team::{PreferenceAction, Team, TeamPreference};
pub use venue::AvailabilityWindow;

/// Team identifier.
pub type TeamId = u32;

/// Opaque division grouping key.
pub type DivisionCode = String;

/// Pending-game identifier assigned by the store.
pub type GameId = u64;

/// Slot identifier assigned by the store.
pub type SlotId = u64;
