//! Weekly league game scheduling.
//!
//! Turns recurring venue availability and per-division round-robin
//! templates into a season of dated games, honoring team preferences and
//! keeping teams off the same weekday or start time for too many games in
//! a row.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `TeamPreference`, `GameToSchedule`,
//!   `ScheduledSlot`, `AvailabilityWindow`, `SeasonCalendar`
//! - **`store`**: The `ScheduleStore` data-access trait and an in-memory store
//! - **`expand`**: Template expansion into the pending-game pool
//! - **`materialize`**: Venue windows into dated open slots
//! - **`filtering`**: Slot filters and the filter engine
//! - **`scheduler`**: The season orchestrator
//! - **`config`**: Run parameters and filter tuning, loadable from TOML
//! - **`validation`**: Roster and template integrity checks
//!
//! # Logging
//!
//! Progress is reported through `tracing`. The crate never installs a
//! subscriber.

pub mod config;
pub mod error;
pub mod expand;
pub mod filtering;
pub mod materialize;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use error::{ConfigError, ScheduleError, ScheduleResult, StoreError, StoreResult};
