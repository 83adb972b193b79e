//! Visible week window.
//!
//! The calendar view always shows exactly 7 consecutive days, Monday
//! through Sunday (ISO week start). Navigation moves the window by whole
//! weeks, so paging forward and back round-trips to the identical window.
//!
//! The window is a pure function of a reference date: the engine never
//! reads a clock. "Jump to today" is `WeekWindow::containing(today)` with
//! the caller's notion of today.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The 7-day Monday-start window containing a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    monday: NaiveDate,
}

impl WeekWindow {
    /// The window of the ISO week containing `reference`.
    pub fn containing(reference: NaiveDate) -> Self {
        let back = reference.weekday().num_days_from_monday() as i64;
        Self {
            monday: reference - Duration::days(back),
        }
    }

    /// The window shifted by whole weeks (−1 back, +1 forward).
    pub fn shifted(&self, weeks: i64) -> Self {
        Self {
            monday: self.monday + Duration::days(7 * weeks),
        }
    }

    /// The 7 days of the window, Monday first.
    pub fn days(&self) -> [NaiveDate; 7] {
        let mut days = [self.monday; 7];
        for (i, day) in days.iter_mut().enumerate() {
            *day = self.monday + Duration::days(i as i64);
        }
        days
    }

    /// Monday of the window.
    pub fn first_day(&self) -> NaiveDate {
        self.monday
    }

    /// Sunday of the window.
    pub fn last_day(&self) -> NaiveDate {
        self.monday + Duration::days(6)
    }

    /// First instant of the window: Monday 00:00:00.
    pub fn start_instant(&self) -> NaiveDateTime {
        self.monday.and_hms_opt(0, 0, 0).unwrap_or_default()
    }

    /// Last instant of the window: Sunday 23:59:59.
    pub fn end_instant(&self) -> NaiveDateTime {
        self.last_day().and_hms_opt(23, 59, 59).unwrap_or_default()
    }

    /// 0-based day index of a date within the window, if inside.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.monday).num_days();
        (0..7).contains(&offset).then_some(offset as usize)
    }

    /// Whether an instant falls inside the window.
    pub fn contains_instant(&self, instant: NaiveDateTime) -> bool {
        self.start_instant() <= instant && instant <= self.end_instant()
    }

    /// Whether a closed interval intersects the window.
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.end_instant() && end >= self.start_instant()
    }
}
