//! Run configuration.
//!
//! Season parameters plus the tuning constants of the slot filters. Every
//! field has a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! [season]
//! start_date = "2024-04-01"
//! game_length_minutes = 90
//! regenerate = true
//!
//! [filters]
//! slot_preservation_limit = 20
//!
//! [filters.balance_factors.Thu]
//! low = 10
//! high = 25
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{DayOfWeek, SeasonCalendar};

/// Longest game accepted, in minutes.
pub const MAX_GAME_LENGTH_MINUTES: u32 = 24 * 60;

/// Complete configuration for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub season: SeasonConfig,
    #[serde(default)]
    pub filters: FilterConfig,
}

/// Season parameters supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// First day of week 1 (a Monday by convention).
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// Uniform game length.
    #[serde(default = "default_game_length")]
    pub game_length_minutes: u32,
    /// Wipe pending games and slots, then rebuild both before assigning.
    #[serde(default)]
    pub regenerate: bool,
}

/// Weekday usage limits, as a percentage of a team's games to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceFactor {
    /// Low-water mark. Reserved: carried in configuration and checked by
    /// `validate`, but no filter reads it.
    pub low: u32,
    /// High-water mark; usage above it removes the weekday.
    pub high: u32,
}

/// Tuning constants for the slot filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Games in a row on one weekday before that weekday is avoided.
    #[serde(default = "default_max_same_day")]
    pub max_consecutive_same_day: u32,
    /// Games in a row at one time before that time is avoided.
    #[serde(default = "default_max_same_time")]
    pub max_consecutive_same_time: u32,
    /// Chance (out of 100) that a slot excluded by a team preference is kept.
    #[serde(default = "default_preservation_limit")]
    pub slot_preservation_limit: u32,
    /// First week in which weekday balance is enforced.
    #[serde(default = "default_balance_from_week")]
    pub balance_from_week: u32,
    /// Games making up half a season.
    #[serde(default = "default_midpoint_games")]
    pub midpoint_games: u32,
    /// Extra percentage allowed while a team is at or below the midpoint.
    #[serde(default = "default_early_season_allowance")]
    pub early_season_allowance: u32,
    /// Weekdays subject to balancing, with their limits.
    #[serde(default = "default_balance_factors")]
    pub balance_factors: BTreeMap<DayOfWeek, BalanceFactor>,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::default()
}

fn default_game_length() -> u32 {
    90
}

fn default_max_same_day() -> u32 {
    4
}

fn default_max_same_time() -> u32 {
    3
}

fn default_preservation_limit() -> u32 {
    10
}

fn default_balance_from_week() -> u32 {
    4
}

fn default_midpoint_games() -> u32 {
    8
}

fn default_early_season_allowance() -> u32 {
    10
}

fn default_balance_factors() -> BTreeMap<DayOfWeek, BalanceFactor> {
    BTreeMap::from([
        (DayOfWeek::Mon, BalanceFactor { low: 15, high: 30 }),
        (DayOfWeek::Tue, BalanceFactor { low: 30, high: 60 }),
        (DayOfWeek::Wed, BalanceFactor { low: 30, high: 60 }),
    ])
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            game_length_minutes: default_game_length(),
            regenerate: false,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_consecutive_same_day: default_max_same_day(),
            max_consecutive_same_time: default_max_same_time(),
            slot_preservation_limit: default_preservation_limit(),
            balance_from_week: default_balance_from_week(),
            midpoint_games: default_midpoint_games(),
            early_season_allowance: default_early_season_allowance(),
            balance_factors: default_balance_factors(),
        }
    }
}

impl SeasonConfig {
    /// Creates season parameters with setup disabled.
    pub fn new(start_date: NaiveDate, game_length_minutes: u32) -> Self {
        Self {
            start_date,
            game_length_minutes,
            regenerate: false,
        }
    }

    /// Enables or disables the setup phase.
    pub fn with_regenerate(mut self, regenerate: bool) -> Self {
        self.regenerate = regenerate;
        self
    }

    /// Calendar anchored on the start date.
    pub fn calendar(&self) -> SeasonCalendar {
        SeasonCalendar::new(self.start_date)
    }
}

impl SchedulerConfig {
    /// Creates a configuration with default filter tuning.
    pub fn new(season: SeasonConfig) -> Self {
        Self {
            season,
            filters: FilterConfig::default(),
        }
    }

    /// Replaces the filter tuning.
    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let minutes = self.season.game_length_minutes;
        if minutes == 0 || minutes > MAX_GAME_LENGTH_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "game length must be between 1 and {MAX_GAME_LENGTH_MINUTES} minutes: {minutes}"
            )));
        }

        let f = &self.filters;
        if f.slot_preservation_limit > 100 {
            return Err(ConfigError::Invalid(format!(
                "slot preservation limit is a percentage: {}",
                f.slot_preservation_limit
            )));
        }
        for (day, factor) in &f.balance_factors {
            if factor.low > factor.high || factor.high > 100 {
                return Err(ConfigError::Invalid(format!(
                    "balance factor for {day} must satisfy low <= high <= 100"
                )));
            }
        }
        Ok(())
    }
}
