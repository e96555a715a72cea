//! Meditation history: filtering fetched logs, the month calendar and
//! streak calculation.

mod calendar;
mod streak;

pub use calendar::{parse_month, sessions_per_day, MonthCalendar};
pub use streak::{compute_streak, streak_from_logs, Streak};

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::api::{DurationUnit, LogRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Ambience id, case-insensitive.
    pub theme: Option<String>,
    /// Exact session length in seconds.
    pub duration_secs: Option<u64>,
    /// Mood label, case-insensitive.
    pub mood: Option<String>,
    pub limit: Option<usize>,
}

impl HistoryFilter {
    /// Keep matching logs, newest first, truncated to `limit`.
    ///
    /// `unit` is the unit the backend stores durations in.
    pub fn apply(&self, mut logs: Vec<LogRecord>, unit: DurationUnit) -> Vec<LogRecord> {
        logs.retain(|log| self.matches(log, unit));
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = self.limit {
            logs.truncate(limit);
        }
        logs
    }

    /// Per-day counts of matching logs in one month of `tz`. `limit` is ignored.
    pub fn calendar<Tz: TimeZone>(
        &self,
        logs: &[LogRecord],
        unit: DurationUnit,
        tz: &Tz,
        year: i32,
        month: u32,
    ) -> MonthCalendar {
        let matching: Vec<LogRecord> = logs
            .iter()
            .filter(|log| self.matches(log, unit))
            .cloned()
            .collect();
        MonthCalendar::new(year, month, sessions_per_day(&matching, tz, year, month))
    }

    fn matches(&self, log: &LogRecord, unit: DurationUnit) -> bool {
        let theme_ok = self
            .theme
            .as_deref()
            .map_or(true, |t| log.theme.eq_ignore_ascii_case(t));
        let duration_ok = self
            .duration_secs
            .map_or(true, |secs| unit.decode(log.duration) == secs);
        let mood_ok = self.mood.as_deref().map_or(true, |m| {
            log.mood
                .as_deref()
                .is_some_and(|logged| logged.eq_ignore_ascii_case(m))
        });
        theme_ok && duration_ok && mood_ok
    }
}
