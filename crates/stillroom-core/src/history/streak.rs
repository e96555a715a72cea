//! Day-streak calculation over completed sessions.
//!
//! A streak is the run of consecutive calendar days with at least one
//! session, ending today or yesterday. Several sessions on one day count once.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::api::LogRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    /// Most recent day with a session, even when the streak has lapsed.
    pub last_date: Option<NaiveDate>,
}

pub fn compute_streak<I>(days: I, today: NaiveDate) -> Streak
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = days.into_iter().filter(|d| *d <= today).collect();
    let Some(&last) = days.iter().next_back() else {
        return Streak::default();
    };

    if last < today - Duration::days(1) {
        return Streak {
            count: 0,
            last_date: Some(last),
        };
    }

    let mut count = 0;
    let mut day = last;
    while days.contains(&day) {
        count += 1;
        day -= Duration::days(1);
    }
    Streak {
        count,
        last_date: Some(last),
    }
}

/// Streak over backend logs, bucketing timestamps into days of `tz`.
pub fn streak_from_logs<Tz: TimeZone>(logs: &[LogRecord], tz: &Tz, today: NaiveDate) -> Streak {
    compute_streak(
        logs.iter()
            .map(|log| log.timestamp.with_timezone(tz).date_naive()),
        today,
    )
}
