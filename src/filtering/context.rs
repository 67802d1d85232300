//! Per-game filtering context.

use std::fmt;

use rand::RngCore;

use crate::config::FilterConfig;
use crate::models::WeekSpan;
use crate::store::ScheduleStore;

/// Everything a filter may consult while narrowing one game's slots.
///
/// Built fresh for every game and owned by the caller, so nothing
/// carries over between games except what is in the store.
pub struct FilterContext<'a> {
    /// Read access to the season's data.
    pub store: &'a dyn ScheduleStore,
    /// Tuning constants.
    pub config: &'a FilterConfig,
    /// The week being scheduled.
    pub week: WeekSpan,
    /// Source for preservation draws.
    pub rng: &'a mut dyn RngCore,
    /// Decisions taken so far for this game.
    pub notes: SchedulingNotes,
}

impl<'a> FilterContext<'a> {
    /// Creates a context with empty notes.
    pub fn new(
        store: &'a dyn ScheduleStore,
        config: &'a FilterConfig,
        week: WeekSpan,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            store,
            config,
            week,
            rng,
            notes: SchedulingNotes::default(),
        }
    }

    /// Appends a note line.
    pub fn note(&mut self, line: impl Into<String>) {
        self.notes.record(line);
    }

    /// Consumes the context, keeping the notes.
    pub fn into_notes(self) -> SchedulingNotes {
        self.notes
    }
}

impl fmt::Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("week", &self.week)
            .field("notes", &self.notes.len())
            .finish()
    }
}

/// Human-readable trail of the decisions made for one game.
///
/// Observational only; nothing reads it back to make a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulingNotes {
    lines: Vec<String>,
}

impl SchedulingNotes {
    pub fn record(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for SchedulingNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
