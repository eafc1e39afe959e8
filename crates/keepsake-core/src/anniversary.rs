//! Time elapsed since the relationship started.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Whole days, hours, minutes and seconds since start-date midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeTogether {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeTogether {
    /// Zero when `now` is before the start date.
    pub fn between(start: NaiveDate, now: NaiveDateTime) -> Self {
        let elapsed = now - start.and_time(chrono::NaiveTime::default());
        let total = elapsed.num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for TimeTogether {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h {}m {}s", self.days, self.hours, self.minutes, self.seconds)
    }
}

/// Same month and day as the start date.
pub fn is_anniversary(start: NaiveDate, today: NaiveDate) -> bool {
    start.month() == today.month() && start.day() == today.day()
}
