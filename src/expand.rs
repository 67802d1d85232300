//! Default-schedule template expansion.
//!
//! Templates pair teams by their position in a division, so one template
//! serves every division of the same size. Expansion resolves those
//! positions to real teams and fills the pending pool.
//!
//! A division whose size has no template is fatal: the operator has to
//! load one before a season can be built.

use tracing::info;

use crate::error::{ScheduleError, ScheduleResult, StoreError};
use crate::models::GameToSchedule;
use crate::store::ScheduleStore;

/// Result of expanding every division's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionSummary {
    /// Pending games created.
    pub games_created: usize,
    /// Season length: the longest template among the divisions.
    pub season_weeks: u32,
}

/// Season length in weeks, without creating any games.
///
/// # Errors
/// `MissingTemplate` if some division's size has no template.
pub fn season_length_weeks<S: ScheduleStore + ?Sized>(store: &S) -> ScheduleResult<u32> {
    let mut season_weeks = 0;
    for division in store.list_divisions()? {
        season_weeks = season_weeks.max(template_length(store, &division)?.1);
    }
    Ok(season_weeks)
}

/// Fills the pending pool from the templates of every division.
///
/// Every division is checked and resolved before the first game is saved,
/// so a failure leaves the pending pool untouched.
///
/// # Errors
/// `MissingTemplate` if some division's size has no template; a store
/// error if a template slot resolves to no team.
pub fn expand_templates<S: ScheduleStore + ?Sized>(store: &mut S) -> ScheduleResult<ExpansionSummary> {
    let divisions = store.list_divisions()?;

    let mut sized = Vec::with_capacity(divisions.len());
    let mut season_weeks = 0;
    for division in divisions {
        let (size, weeks) = template_length(&*store, &division)?;
        season_weeks = season_weeks.max(weeks);
        sized.push((division, size, weeks));
    }

    let mut games = Vec::new();
    for (division, size, weeks) in &sized {
        info!(%division, size, weeks, "preparing division games");
        for entry in store.default_schedule_template(*size)? {
            let visiting_team = store.resolve_team_id(entry.visiting_slot, division)?;
            let home_team = store.resolve_team_id(entry.home_slot, division)?;
            let home = store.team(home_team)?.ok_or(StoreError::NotFound {
                entity: "team",
                id: u64::from(home_team),
            })?;
            games.push(GameToSchedule::new(home.division, entry.week, home_team, visiting_team));
        }
    }

    let games_created = games.len();
    for game in games {
        store.save_pending_game(game)?;
    }

    info!(weeks = season_weeks, games = games_created, "season length determined");
    Ok(ExpansionSummary {
        games_created,
        season_weeks,
    })
}

/// (division size, template weeks) for one division.
fn template_length<S: ScheduleStore + ?Sized>(
    store: &S,
    division: &str,
) -> ScheduleResult<(usize, u32)> {
    let size = store.teams_in_division(division)?.len();
    let weeks = store.default_schedule_length_weeks(size)?;
    if weeks == 0 {
        return Err(ScheduleError::MissingTemplate {
            division: division.to_string(),
            size,
        });
    }
    Ok((size, weeks))
}
