use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("sprint start {start} is after sprint end {end}")]
pub struct InvertedSprintWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// The time box every chart series is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SprintWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl SprintWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, InvertedSprintWindow> {
        if start > end {
            return Err(InvertedSprintWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// The moment the "actual" lines stop: `now`, but never outside the window.
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.clamp(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendInterval {
    pub start: NaiveDateTime,
    pub duration: TimeDelta,
}

impl WeekendInterval {
    pub fn end(&self) -> NaiveDateTime {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    pub state: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub complete_date: Option<NaiveDateTime>,
}

impl Sprint {
    /// A completed sprint ends when it was completed, not when it was planned to.
    pub fn window(&self) -> Option<Result<SprintWindow, InvertedSprintWindow>> {
        let start = self.start_date?;
        let end = self.complete_date.or(self.end_date)?;
        Some(SprintWindow::new(start, end))
    }
}
