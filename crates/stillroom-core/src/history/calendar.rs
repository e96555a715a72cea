//! Month calendar of completed sessions.
//!
//! Logs are bucketed by the calendar day of their timestamp in a given zone,
//! so a session just after local midnight lands on the local day even when
//! its UTC date is the day before.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::api::LogRecord;
use crate::error::ValidationError;

/// Session counts per day for one month. Days without sessions are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCalendar {
    /// `YYYY-MM`
    pub month: String,
    pub total: usize,
    pub days: BTreeMap<NaiveDate, usize>,
}

impl MonthCalendar {
    pub fn new(year: i32, month: u32, days: BTreeMap<NaiveDate, usize>) -> Self {
        Self {
            month: format!("{year:04}-{month:02}"),
            total: days.values().sum(),
            days,
        }
    }
}

/// Count sessions per local day of `tz`, keeping only days in `year`-`month`.
pub fn sessions_per_day<Tz: TimeZone>(
    logs: &[LogRecord],
    tz: &Tz,
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, usize> {
    let mut days = BTreeMap::new();
    for log in logs {
        let day = log.timestamp.with_timezone(tz).date_naive();
        if day.year() == year && day.month() == month {
            *days.entry(day).or_insert(0) += 1;
        }
    }
    days
}

/// Parse a `YYYY-MM` month into `(year, month)`.
pub fn parse_month(input: &str) -> Result<(i32, u32), ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        field: "month".into(),
        message: format!("expected YYYY-MM, got '{input}'"),
    };
    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn log(id: &str, ts: &str) -> LogRecord {
        LogRecord {
            id: id.into(),
            user_id: Some("u1".into()),
            duration: 300.0,
            theme: "rain".into(),
            timestamp: ts.parse().unwrap(),
            mood: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn month_edges_follow_the_local_zone() {
        let logs = vec![
            log("a", "2026-09-30T22:30:00Z"),
            log("b", "2026-10-31T21:00:00Z"),
            log("c", "2026-10-31T23:30:00Z"),
        ];
        let plus2 = FixedOffset::east_opt(2 * 3600).unwrap();

        let utc = sessions_per_day(&logs, &Utc, 2026, 10);
        assert_eq!(utc.get(&day("2026-10-31")), Some(&2));
        assert!(!utc.contains_key(&day("2026-10-01")));

        let local = sessions_per_day(&logs, &plus2, 2026, 10);
        assert_eq!(local.get(&day("2026-10-01")), Some(&1));
        assert_eq!(local.get(&day("2026-10-31")), Some(&1));
        assert_eq!(local.values().sum::<usize>(), 2);

        let november = sessions_per_day(&logs, &plus2, 2026, 11);
        assert_eq!(november.into_iter().collect::<Vec<_>>(), vec![(day("2026-11-01"), 1)]);
    }

    #[test]
    fn sessions_on_different_utc_days_share_a_local_day() {
        let logs = vec![
            log("a", "2026-10-15T16:00:00Z"),
            log("b", "2026-10-16T10:00:00Z"),
            log("c", "2026-10-16T16:00:00Z"),
        ];
        let plus9 = FixedOffset::east_opt(9 * 3600).unwrap();

        let days = sessions_per_day(&logs, &plus9, 2026, 10);
        assert_eq!(
            days.into_iter().collect::<Vec<_>>(),
            vec![(day("2026-10-16"), 2), (day("2026-10-17"), 1)]
        );
    }

    #[test]
    fn other_years_are_excluded() {
        let logs = vec![log("a", "2025-10-10T07:00:00Z"), log("b", "2026-10-10T07:00:00Z")];
        let days = sessions_per_day(&logs, &Utc, 2026, 10);
        assert_eq!(days.len(), 1);
        assert!(days.contains_key(&day("2026-10-10")));
    }

    #[test]
    fn calendar_totals_its_days() {
        let days = BTreeMap::from([(day("2026-02-01"), 2), (day("2026-02-28"), 3)]);
        let cal = MonthCalendar::new(2026, 2, days);
        assert_eq!(cal.month, "2026-02");
        assert_eq!(cal.total, 5);
    }

    #[test]
    fn parse_month_accepts_year_dash_month() {
        assert_eq!(parse_month("2026-10").unwrap(), (2026, 10));
        assert_eq!(parse_month(" 2027-01 ").unwrap(), (2027, 1));
    }

    #[test]
    fn parse_month_rejects_bad_input() {
        for bad in ["2026-13", "2026-00", "october", "2026", "2026-1x"] {
            assert!(
                matches!(parse_month(bad), Err(ValidationError::InvalidValue { ref field, .. }) if field == "month"),
                "{bad} should be rejected"
            );
        }
    }
}
