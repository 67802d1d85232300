//! Error types.
//!
//! Fatal conditions (missing templates, an unusable division list, bad
//! arguments) surface as [`ScheduleError`] and abort a run. Soft conditions
//! (a division with no games in a week, a game with no usable slot) are never
//! errors; they are recorded in the run outcome instead.

use crate::models::{DivisionCode, SlotId};

/// Result type for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Result type for data-access operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Unrecoverable scheduling failure.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// No default schedule exists for a division of this size.
    #[error("no default schedule for division {division} containing {size} teams")]
    MissingTemplate { division: DivisionCode, size: usize },

    /// The division processing order could not be produced.
    #[error("unable to create random order of divisions: {0}")]
    DivisionOrder(String),

    /// A caller-supplied value is out of range or unrecognized.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A slot that already holds a game was offered for assignment.
    #[error("slot {0} is already assigned")]
    SlotAlreadyAssigned(SlotId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure reported by a [`ScheduleStore`](crate::store::ScheduleStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("no team occupies slot {slot} in division {division}")]
    UnknownTeamSlot { division: DivisionCode, slot: u32 },

    #[error("backend error: {0}")]
    Backend(String),
}

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
