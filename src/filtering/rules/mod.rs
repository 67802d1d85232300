//! Built-in slot filters.
//!
//! # Filters
//!
//! - **Preference**: `TeamPreferenceFilter` drops slots a team asked to
//!   avoid, keeping a random share so no team is starved.
//! - **Balance**: `WeekdayBalanceFilter` drops a weekday a team has
//!   already played too often this season.
//! - **Recency**: `RecentDayStreak` and `RecentTimeStreak` drop the weekday
//!   or start time a team has played on several games in a row.
//!
//! Each filter looks at the home team first, then the visiting team, and
//! stops early once one candidate is left.

use rand::Rng;

use super::{FilterContext, SlotFilter};
use crate::error::StoreResult;
use crate::models::{GameToSchedule, PreferenceAction, ScheduledSlot, TeamId};

/// (role, team) pairs in review order.
fn roles(game: &GameToSchedule) -> [(&'static str, TeamId); 2] {
    [("home", game.home_team), ("visiting", game.visiting_team)]
}

/// Removes every candidate for which `matches` holds.
///
/// Each match survives if a draw in 1..=100 lands at or below
/// `preservation_limit`; a limit of 0 removes every match.
fn remove_matching<F>(
    candidates: Vec<ScheduledSlot>,
    matches: F,
    preservation_limit: u32,
    context: &mut FilterContext<'_>,
) -> Vec<ScheduledSlot>
where
    F: Fn(&ScheduledSlot) -> bool,
{
    candidates
        .into_iter()
        .filter(|slot| {
            if !matches(slot) {
                return true;
            }
            if preservation_limit > 0 {
                let draw: u32 = context.rng.random_range(1..=100);
                if draw <= preservation_limit {
                    context.note(format!("Preserved ({draw}): {slot}"));
                    return true;
                }
            }
            context.note(format!("Removing [{preservation_limit}]: {slot}"));
            false
        })
        .collect()
}

/// Length of the run of most recent games sharing a key, and that key.
///
/// `games` must be oldest first.
fn trailing_streak<K, F>(games: &[ScheduledSlot], key: F) -> Option<(K, usize)>
where
    K: PartialEq + Copy,
    F: Fn(&ScheduledSlot) -> K,
{
    let last = key(games.last()?);
    let run = games.iter().rev().take_while(|g| key(g) == last).count();
    Some((last, run))
}

// ======================== Preference ========================

/// Team preference exclusions.
///
/// For each `Exclude` rule of the home team, then the visiting team,
/// removes candidates on that weekday at that exact time. Every match
/// has a `slot_preservation_limit` percent chance of being kept.
#[derive(Debug, Clone, Copy)]
pub struct TeamPreferenceFilter;

impl SlotFilter for TeamPreferenceFilter {
    fn name(&self) -> &'static str {
        "team-preferences"
    }

    fn filter(
        &self,
        game: &GameToSchedule,
        mut candidates: Vec<ScheduledSlot>,
        context: &mut FilterContext<'_>,
    ) -> StoreResult<Vec<ScheduledSlot>> {
        let limit = context.config.slot_preservation_limit;

        for (role, team) in roles(game) {
            if candidates.len() <= 1 {
                break;
            }
            let preferences = context.store.team_preferences(team)?;
            if preferences.is_empty() {
                continue;
            }

            context.note(format!("Working on {role} team's preferences (team {team})"));
            for pref in preferences {
                match pref.action {
                    PreferenceAction::Exclude => {
                        context.note(format!(
                            "Processing exclusion: {} @ {}",
                            pref.day,
                            pref.time.format("%H:%M")
                        ));
                        candidates = remove_matching(
                            candidates,
                            |s| s.day() == pref.day && s.time == pref.time,
                            limit,
                            context,
                        );
                    }
                }
            }
        }

        Ok(candidates)
    }

    fn description(&self) -> &'static str {
        "Drop slots a team asked to avoid, keeping a random share"
    }
}

// ======================== Balance ========================

/// Weekday balance review.
///
/// Active from week `balance_from_week` onward. For each balanced weekday,
/// if its share of the team's games to date (floored percent) is above the
/// weekday's high-water mark, every candidate on that weekday is removed.
/// While the team has played `midpoint_games` or fewer, the mark is raised
/// by `early_season_allowance`.
#[derive(Debug, Clone, Copy)]
pub struct WeekdayBalanceFilter;

impl SlotFilter for WeekdayBalanceFilter {
    fn name(&self) -> &'static str {
        "weekday-balance"
    }

    fn is_active(&self, context: &FilterContext<'_>) -> bool {
        context.week.week >= context.config.balance_from_week
    }

    fn filter(
        &self,
        game: &GameToSchedule,
        mut candidates: Vec<ScheduledSlot>,
        context: &mut FilterContext<'_>,
    ) -> StoreResult<Vec<ScheduledSlot>> {
        let config = context.config;

        for (role, team) in roles(game) {
            if candidates.len() <= 1 {
                break;
            }
            context.note(format!("Balancing {role} team's schedule (team {team})"));

            let breakdown = context.store.weekday_breakdown_for_team(team)?;
            let total: u32 = breakdown.values().sum();
            if total == 0 {
                continue;
            }
            let allowance = if total <= config.midpoint_games {
                config.early_season_allowance
            } else {
                0
            };

            for (&day, factor) in &config.balance_factors {
                let played = breakdown.get(&day).copied().unwrap_or(0);
                let share = played * 100 / total;
                if share > factor.high + allowance {
                    context.note(format!(
                        "After {total} game(s), removing {day} slots due to excessive usage [{share}]"
                    ));
                    candidates = remove_matching(candidates, |s| s.day() == day, 0, context);
                }
            }
        }

        Ok(candidates)
    }

    fn description(&self) -> &'static str {
        "Drop weekdays a team has played on too often"
    }
}

// ======================== Recency ========================

/// Same-weekday streak review.
///
/// Looks back `max_consecutive_same_day` weeks from the start of the
/// current week. If a team's most recent games in that window all fell on
/// one weekday, and there are at least `max_consecutive_same_day` of them,
/// that weekday is removed. A limit of 0 disables the filter.
#[derive(Debug, Clone, Copy)]
pub struct RecentDayStreak;

impl SlotFilter for RecentDayStreak {
    fn name(&self) -> &'static str {
        "recent-day-streak"
    }

    fn is_active(&self, context: &FilterContext<'_>) -> bool {
        context.config.max_consecutive_same_day > 0
    }

    fn filter(
        &self,
        game: &GameToSchedule,
        mut candidates: Vec<ScheduledSlot>,
        context: &mut FilterContext<'_>,
    ) -> StoreResult<Vec<ScheduledSlot>> {
        let limit = context.config.max_consecutive_same_day;
        let start = context.week.lookback_start(limit);
        let end = context.week.end;

        for (role, team) in roles(game) {
            if candidates.len() <= 1 {
                break;
            }
            let past = context.store.past_games_for_team(team, start, end)?;
            if let Some((day, run)) = trailing_streak(&past, ScheduledSlot::day) {
                if run >= limit as usize {
                    context.note(format!(
                        "Removing consecutive day issue for {role} team: {day} ({run} in a row)"
                    ));
                    candidates =
                        remove_matching(candidates, |s: &ScheduledSlot| s.day() == day, 0, context);
                }
            }
        }

        Ok(candidates)
    }

    fn description(&self) -> &'static str {
        "Drop a weekday a team has played on several times in a row"
    }
}

/// Same-start-time streak review.
///
/// Same technique as [`RecentDayStreak`], keyed on start time and
/// limited by `max_consecutive_same_time`.
#[derive(Debug, Clone, Copy)]
pub struct RecentTimeStreak;

impl SlotFilter for RecentTimeStreak {
    fn name(&self) -> &'static str {
        "recent-time-streak"
    }

    fn is_active(&self, context: &FilterContext<'_>) -> bool {
        context.config.max_consecutive_same_time > 0
    }

    fn filter(
        &self,
        game: &GameToSchedule,
        mut candidates: Vec<ScheduledSlot>,
        context: &mut FilterContext<'_>,
    ) -> StoreResult<Vec<ScheduledSlot>> {
        let limit = context.config.max_consecutive_same_time;
        let start = context.week.lookback_start(limit);
        let end = context.week.end;

        for (role, team) in roles(game) {
            if candidates.len() <= 1 {
                break;
            }
            let past = context.store.past_games_for_team(team, start, end)?;
            if let Some((time, run)) = trailing_streak(&past, |s: &ScheduledSlot| s.time) {
                if run >= limit as usize {
                    context.note(format!(
                        "Removing consecutive time slot issue for {role} team: {} ({run} in a row)",
                        time.format("%H:%M")
                    ));
                    candidates = remove_matching(
                        candidates,
                        |s: &ScheduledSlot| s.time == time,
                        0,
                        context,
                    );
                }
            }
        }

        Ok(candidates)
    }

    fn description(&self) -> &'static str {
        "Drop a start time a team has played at several times in a row"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::models::{DayOfWeek, SeasonCalendar, Team, TeamPreference, WeekSpan};
    use crate::store::{MemoryStore, ScheduleStore};
    use chrono::{NaiveDate, NaiveTime};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// Season starting Monday 2024-04-01.
    fn week(n: u32) -> WeekSpan {
        SeasonCalendar::new(date(4, 1)).week_span(n).unwrap()
    }

    fn league() -> MemoryStore {
        MemoryStore::new()
            .with_team(Team::new(1, "A", "Ants", 1))
            .with_team(Team::new(2, "A", "Apes", 2))
            .with_team(Team::new(3, "A", "Asps", 3))
    }

    fn candidate(id: u64, date: NaiveDate, time: NaiveTime) -> ScheduledSlot {
        ScheduledSlot::open(id, date, time, "Field 1")
    }

    /// Records a played game for `home` vs `visiting`.
    fn play(store: &mut MemoryStore, date: NaiveDate, time: NaiveTime, home: TeamId, visiting: TeamId) {
        let id = store.create_slot(date, time, "Field 1").unwrap();
        let mut slot = ScheduledSlot::open(id, date, time, "Field 1");
        slot.assign(&GameToSchedule::new("A", 1, home, visiting)).unwrap();
        store.save_slot(&slot).unwrap();
    }

    fn run<F: SlotFilter>(
        filter: &F,
        store: &MemoryStore,
        config: &FilterConfig,
        week: WeekSpan,
        game: &GameToSchedule,
        candidates: Vec<ScheduledSlot>,
        seed: u64,
    ) -> Vec<ScheduledSlot> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ctx = FilterContext::new(store, config, week, &mut rng);
        if !filter.is_active(&ctx) {
            return candidates;
        }
        filter.filter(game, candidates, &mut ctx).unwrap()
    }

    #[test]
    fn test_trailing_streak() {
        let games = vec![
            candidate(1, date(4, 2), hm(18, 0)),
            candidate(2, date(4, 8), hm(18, 0)),
            candidate(3, date(4, 15), hm(19, 30)),
        ];
        assert_eq!(
            trailing_streak(&games, ScheduledSlot::day),
            Some((DayOfWeek::Mon, 2))
        );
        assert_eq!(
            trailing_streak(&games, |s: &ScheduledSlot| s.time),
            Some((hm(19, 30), 1))
        );
        assert_eq!(trailing_streak(&[], ScheduledSlot::day), None);
    }

    #[test]
    fn test_preference_exclusion_without_preservation() {
        let store = MemoryStore::new()
            .with_team(
                Team::new(1, "A", "Ants", 1)
                    .with_preference(TeamPreference::exclude(DayOfWeek::Mon, hm(18, 0))),
            )
            .with_team(Team::new(2, "A", "Apes", 2));
        let config = FilterConfig {
            slot_preservation_limit: 0,
            ..FilterConfig::default()
        };
        let game = GameToSchedule::new("A", 1, 1, 2);
        let candidates = vec![
            candidate(1, date(4, 1), hm(18, 0)),
            candidate(2, date(4, 1), hm(19, 30)),
            candidate(3, date(4, 2), hm(18, 0)),
        ];

        let out = run(&TeamPreferenceFilter, &store, &config, week(1), &game, candidates, 7);
        let ids: Vec<u64> = out.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_preference_applies_to_visiting_team() {
        let store = MemoryStore::new()
            .with_team(Team::new(1, "A", "Ants", 1))
            .with_team(
                Team::new(2, "A", "Apes", 2)
                    .with_preference("-Tue18:00".parse().unwrap()),
            );
        let config = FilterConfig {
            slot_preservation_limit: 0,
            ..FilterConfig::default()
        };
        let game = GameToSchedule::new("A", 1, 1, 2);
        let candidates = vec![
            candidate(1, date(4, 1), hm(18, 0)),
            candidate(2, date(4, 2), hm(18, 0)),
        ];

        let out = run(&TeamPreferenceFilter, &store, &config, week(1), &game, candidates, 7);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn test_preference_visitor_skipped_at_one_candidate() {
        let store = MemoryStore::new()
            .with_team(
                Team::new(1, "A", "Ants", 1)
                    .with_preference(TeamPreference::exclude(DayOfWeek::Mon, hm(18, 0))),
            )
            .with_team(
                Team::new(2, "A", "Apes", 2)
                    .with_preference(TeamPreference::exclude(DayOfWeek::Tue, hm(18, 0))),
            );
        let config = FilterConfig {
            slot_preservation_limit: 0,
            ..FilterConfig::default()
        };
        let game = GameToSchedule::new("A", 1, 1, 2);
        let candidates = vec![
            candidate(1, date(4, 1), hm(18, 0)),
            candidate(2, date(4, 2), hm(18, 0)),
        ];

        let out = run(&TeamPreferenceFilter, &store, &config, week(1), &game, candidates, 7);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
    }

    #[test]
    fn test_preservation_rate_tracks_limit() {
        let store = MemoryStore::new()
            .with_team(
                Team::new(1, "A", "Ants", 1)
                    .with_preference(TeamPreference::exclude(DayOfWeek::Mon, hm(18, 0))),
            )
            .with_team(Team::new(2, "A", "Apes", 2));
        let config = FilterConfig::default();
        assert_eq!(config.slot_preservation_limit, 10);
        let game = GameToSchedule::new("A", 1, 1, 2);

        let mut rng = SmallRng::seed_from_u64(42);
        let trials = 2000;
        let mut kept = 0;
        for _ in 0..trials {
            let candidates = vec![
                candidate(1, date(4, 1), hm(18, 0)),
                candidate(2, date(4, 1), hm(19, 30)),
            ];
            let mut ctx = FilterContext::new(&store, &config, week(1), &mut rng);
            let out = TeamPreferenceFilter.filter(&game, candidates, &mut ctx).unwrap();
            if out.iter().any(|s| s.id == 1) {
                kept += 1;
            }
        }

        let rate = kept as f64 / trials as f64;
        assert!((rate - 0.10).abs() < 0.03, "preservation rate {rate}");
    }

    #[test]
    fn test_balance_inactive_early_in_season() {
        let store = league();
        let config = FilterConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let ctx = FilterContext::new(&store, &config, week(3), &mut rng);
        assert!(!WeekdayBalanceFilter.is_active(&ctx));
    }

    #[test]
    fn test_balance_removes_overused_day() {
        let mut store = league();
        play(&mut store, date(4, 1), hm(18, 0), 1, 2);
        play(&mut store, date(4, 8), hm(18, 0), 3, 1);
        play(&mut store, date(4, 15), hm(18, 0), 1, 3);
        play(&mut store, date(4, 16), hm(18, 0), 2, 1);

        let config = FilterConfig::default();
        let game = GameToSchedule::new("A", 4, 1, 2);
        let candidates = vec![
            candidate(10, date(4, 22), hm(18, 0)),
            candidate(11, date(4, 23), hm(18, 0)),
        ];

        // team 1: Mon 3/4 = 75% against a mark of 30 + 10
        let out = run(&WeekdayBalanceFilter, &store, &config, week(4), &game, candidates, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].day(), DayOfWeek::Tue);
    }

    #[test]
    fn test_balance_allows_share_within_mark() {
        let mut store = league();
        play(&mut store, date(4, 1), hm(18, 0), 1, 2);
        play(&mut store, date(4, 2), hm(18, 0), 3, 1);
        play(&mut store, date(4, 11), hm(18, 0), 1, 3);

        let config = FilterConfig::default();
        let game = GameToSchedule::new("A", 4, 1, 3);
        let candidates = vec![
            candidate(10, date(4, 22), hm(18, 0)),
            candidate(11, date(4, 23), hm(18, 0)),
        ];

        // Mon 33%, Tue 33%: both under their marks of 40 and 70
        let out = run(&WeekdayBalanceFilter, &store, &config, week(4), &game, candidates, 1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_balance_allowance_ends_after_midpoint() {
        let mut store = league();
        for (m, d) in [(4, 1), (4, 8), (4, 15), (4, 22)] {
            play(&mut store, date(m, d), hm(18, 0), 1, 2);
        }
        for (m, d) in [(4, 4), (4, 11), (4, 18), (4, 25), (5, 2), (5, 9)] {
            play(&mut store, date(m, d), hm(18, 0), 1, 2);
        }

        let config = FilterConfig::default();
        let game = GameToSchedule::new("A", 11, 1, 3);
        let week = week(11);
        let candidates = vec![
            candidate(10, week.start, hm(18, 0)),
            candidate(11, week.start.succ_opt().unwrap(), hm(18, 0)),
        ];

        // 10 games, past the midpoint of 8: Mon 40% against a bare mark of 30
        let out = run(&WeekdayBalanceFilter, &store, &config, week, &game, candidates, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].day(), DayOfWeek::Tue);
    }

    #[test]
    fn test_balance_ignores_low_mark() {
        let mut store = league();
        for d in [1, 8] {
            play(&mut store, date(4, d), hm(18, 0), 1, 2);
        }
        for d in [4, 11, 18] {
            play(&mut store, date(4, d), hm(18, 0), 1, 2);
        }

        // Mon at 40% sits above any low mark; only `high` decides
        let mut config = FilterConfig::default();
        for factor in config.balance_factors.values_mut() {
            factor.low = 0;
        }
        let game = GameToSchedule::new("A", 4, 1, 2);
        let candidates = vec![
            candidate(10, date(4, 22), hm(18, 0)),
            candidate(11, date(4, 23), hm(18, 0)),
        ];

        let out = run(&WeekdayBalanceFilter, &store, &config, week(4), &game, candidates, 1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_balance_share_equal_to_mark_kept() {
        let mut store = league();
        for d in [1, 8] {
            play(&mut store, date(4, d), hm(18, 0), 1, 2);
        }
        for d in [4, 11, 18] {
            play(&mut store, date(4, d), hm(18, 0), 1, 2);
        }

        let config = FilterConfig::default();
        let game = GameToSchedule::new("A", 4, 1, 2);
        let candidates = vec![
            candidate(10, date(4, 22), hm(18, 0)),
            candidate(11, date(4, 23), hm(18, 0)),
        ];

        // 5 games: Mon 2/5 = 40%, exactly 30 + 10
        let out = run(&WeekdayBalanceFilter, &store, &config, week(4), &game, candidates, 1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_day_streak_at_limit() {
        let mut store = league();
        for day in [1, 8, 15, 22] {
            play(&mut store, date(4, day), hm(18, 0), 1, 2);
        }
        let config = FilterConfig::default();
        let game = GameToSchedule::new("A", 5, 1, 3);
        let candidates = vec![
            candidate(10, date(4, 29), hm(19, 30)),
            candidate(11, date(4, 30), hm(19, 30)),
        ];

        let out = run(&RecentDayStreak, &store, &config, week(5), &game, candidates, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].day(), DayOfWeek::Tue);
    }

    #[test]
    fn test_day_streak_below_limit() {
        let mut store = league();
        play(&mut store, date(4, 2), hm(18, 0), 1, 2);
        for day in [8, 15, 22] {
            play(&mut store, date(4, day), hm(18, 0), 1, 2);
        }
        let config = FilterConfig::default();
        let game = GameToSchedule::new("A", 5, 1, 3);
        let candidates = vec![
            candidate(10, date(4, 29), hm(19, 30)),
            candidate(11, date(4, 30), hm(19, 30)),
        ];

        let out = run(&RecentDayStreak, &store, &config, week(5), &game, candidates, 1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_time_streak_removes_start_time() {
        let mut store = league();
        play(&mut store, date(4, 1), hm(18, 0), 3, 2);
        play(&mut store, date(4, 9), hm(18, 0), 2, 1);
        play(&mut store, date(4, 15), hm(18, 0), 3, 2);

        let config = FilterConfig::default();
        // visiting team 2 has three 18:00 games in a row
        let game = GameToSchedule::new("A", 4, 1, 2);
        let candidates = vec![
            candidate(10, date(4, 22), hm(18, 0)),
            candidate(11, date(4, 22), hm(19, 30)),
            candidate(12, date(4, 23), hm(18, 0)),
        ];

        let out = run(&RecentTimeStreak, &store, &config, week(4), &game, candidates, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].time, hm(19, 30));
    }

    #[test]
    fn test_streaks_disabled_at_zero() {
        let store = league();
        let config = FilterConfig {
            max_consecutive_same_day: 0,
            max_consecutive_same_time: 0,
            ..FilterConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let ctx = FilterContext::new(&store, &config, week(5), &mut rng);
        assert!(!RecentDayStreak.is_active(&ctx));
        assert!(!RecentTimeStreak.is_active(&ctx));
    }
}
