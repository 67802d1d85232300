//! Availability-to-slot materialization.
//!
//! # Algorithm
//!
//! 1. For each week of the season, for each of its 7 days, fetch the venue
//!    windows open on that weekday.
//! 2. Cut each window into `floor(minutes / game_length)` back-to-back
//!    games starting at the window start, and create an open slot for each.
//! 3. Purge every slot dated on a skip date.
//!
//! No slot starts at or after a window's end, and none runs past it.

use chrono::{Duration, NaiveTime};
use tracing::{debug, info};

use crate::config::MAX_GAME_LENGTH_MINUTES;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{AvailabilityWindow, DayOfWeek, SeasonCalendar};
use crate::store::ScheduleStore;

/// Turns recurring venue windows into dated open slots.
#[derive(Debug, Clone, Copy)]
pub struct SlotMaterializer {
    calendar: SeasonCalendar,
    game_length_minutes: u32,
}

impl SlotMaterializer {
    /// Creates a materializer.
    ///
    /// # Errors
    /// `InvalidArgument` unless `1 <= game_length_minutes <= 1440`.
    pub fn new(calendar: SeasonCalendar, game_length_minutes: u32) -> ScheduleResult<Self> {
        if game_length_minutes == 0 || game_length_minutes > MAX_GAME_LENGTH_MINUTES {
            return Err(ScheduleError::InvalidArgument(format!(
                "game length must be between 1 and {MAX_GAME_LENGTH_MINUTES} minutes: {game_length_minutes}"
            )));
        }
        Ok(Self {
            calendar,
            game_length_minutes,
        })
    }

    /// Start times of the games that fit in one window.
    pub fn slot_times(&self, window: &AvailabilityWindow) -> Vec<NaiveTime> {
        let step = i64::from(self.game_length_minutes);
        (0..window.slot_count(self.game_length_minutes))
            .map(|i| window.start + Duration::minutes(i64::from(i) * step))
            .collect()
    }

    /// Creates open slots for weeks `1..=weeks`. Returns the number created.
    pub fn materialize<S: ScheduleStore + ?Sized>(
        &self,
        store: &mut S,
        weeks: u32,
    ) -> ScheduleResult<usize> {
        let mut created = 0;

        for week in 1..=weeks {
            let span = self.calendar.week_span(week)?;
            info!(week, start = %span.start, "materializing slots");

            for date in span.days() {
                let windows = store.add_on_availability_windows(DayOfWeek::of(date))?;
                for window in &windows {
                    let times = self.slot_times(window);
                    debug!(
                        %date,
                        venue = %window.venue,
                        minutes = window.available_minutes(),
                        slots = times.len(),
                        "window expanded"
                    );
                    for time in times {
                        store.create_slot(date, time, &window.venue)?;
                        created += 1;
                    }
                }
            }
        }

        Ok(created)
    }

    /// Deletes all slots on skip dates. Returns the number removed.
    pub fn purge_skip_dates<S: ScheduleStore + ?Sized>(&self, store: &mut S) -> ScheduleResult<usize> {
        let mut purged = 0;
        for date in store.skip_dates()? {
            let removed = store.purge_slots_on_date(date)?;
            info!(%date, removed, "skip date purged");
            purged += removed;
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduledSlot;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn calendar() -> SeasonCalendar {
        SeasonCalendar::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap())
    }

    #[test]
    fn test_rejects_bad_game_length() {
        assert!(SlotMaterializer::new(calendar(), 0).is_err());
        assert!(SlotMaterializer::new(calendar(), 1441).is_err());
        assert!(SlotMaterializer::new(calendar(), 1440).is_ok());
    }

    #[test]
    fn test_slot_times_floor_and_spacing() {
        let m = SlotMaterializer::new(calendar(), 70).unwrap();
        let window = AvailabilityWindow::new("Field 1", DayOfWeek::Tue, hm(18, 0), hm(22, 0));
        let times = m.slot_times(&window);

        // 240 / 70 = 3
        assert_eq!(times, vec![hm(18, 0), hm(19, 10), hm(20, 20)]);
        for pair in times.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_minutes(), 70);
        }
        let last = *times.last().unwrap();
        assert!(last + Duration::minutes(70) <= window.end);
    }

    #[test]
    fn test_materialize_every_week() {
        let mut store = MemoryStore::new()
            .with_window(AvailabilityWindow::new(
                "Field 1",
                DayOfWeek::Mon,
                hm(18, 0),
                hm(21, 0),
            ))
            .with_window(AvailabilityWindow::new(
                "Field 2",
                DayOfWeek::Wed,
                hm(19, 0),
                hm(20, 30),
            ));
        let m = SlotMaterializer::new(calendar(), 90).unwrap();

        let created = m.materialize(&mut store, 3).unwrap();
        assert_eq!(created, 3 * (2 + 1));

        let slots = store.all_slots();
        assert!(slots.iter().all(ScheduledSlot::is_open));
        let last_day = calendar().week_span(3).unwrap().end;
        assert!(slots
            .iter()
            .all(|s| s.date >= calendar().start_date && s.date <= last_day));
        assert!(slots
            .iter()
            .filter(|s| s.venue == "Field 2")
            .all(|s| s.day() == DayOfWeek::Wed && s.time == hm(19, 0)));
    }

    #[test]
    fn test_empty_window_creates_nothing() {
        let mut store = MemoryStore::new().with_window(AvailabilityWindow::new(
            "Field 1",
            DayOfWeek::Mon,
            hm(21, 0),
            hm(18, 0),
        ));
        let m = SlotMaterializer::new(calendar(), 60).unwrap();
        assert_eq!(m.materialize(&mut store, 2).unwrap(), 0);
    }

    #[test]
    fn test_purge_skip_dates() {
        let skip = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();
        let mut store = MemoryStore::new()
            .with_window(AvailabilityWindow::new(
                "Field 1",
                DayOfWeek::Mon,
                hm(18, 0),
                hm(21, 0),
            ))
            .with_skip_date(skip);
        let m = SlotMaterializer::new(calendar(), 90).unwrap();
        m.materialize(&mut store, 3).unwrap();

        assert_eq!(m.purge_skip_dates(&mut store).unwrap(), 2);
        let slots = store.all_slots();
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.date != skip));
    }
}
