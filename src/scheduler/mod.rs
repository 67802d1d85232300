//! Season scheduling.
//!
//! Places every pending game of a season into an open slot of its week.
//!
//! # Algorithm
//!
//! 1. Optional setup: clear the previous season, expand the templates,
//!    materialize slots, purge skip dates.
//! 2. Shuffle the divisions once.
//! 3. For each week, for each division in order, for each pending game:
//!    narrow the week's open slots with the filter engine and pick one at
//!    random. A game with nothing left stays pending.
//! 4. After each week, rotate the division order left by one so no
//!    division always picks first.
//!
//! The pass is greedy: no retries, no backtracking.

mod order;
mod season;

pub use order::randomize_division_order;
pub use season::{GameAttempt, SeasonOutcome, SeasonScheduler};
