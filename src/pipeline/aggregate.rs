use crate::models::{Period, Reading};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean watt value over one calendar period.
///
/// Buckets are keyed by `period_end`: the day itself, the Sunday closing the
/// ISO week, the last day of the month, or 31 December.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub mean_watt: f64,
    pub reading_count: usize,
}

/// Average `readings` per `period`. Output keys are strictly increasing.
pub fn aggregate(readings: &[Reading], period: Period) -> Vec<Bucket> {
    let mut groups: BTreeMap<NaiveDate, (NaiveDate, u64, usize)> = BTreeMap::new();

    for reading in readings {
        let (start, end) = bounds(reading.timestamp, period);
        let entry = groups.entry(end).or_insert((start, 0, 0));
        entry.1 += u64::from(reading.watt);
        entry.2 += 1;
    }

    groups
        .into_iter()
        .map(|(end, (start, sum, count))| Bucket {
            period_start: start,
            period_end: end,
            mean_watt: sum as f64 / count as f64,
            reading_count: count,
        })
        .collect()
}

fn bounds(day: NaiveDate, period: Period) -> (NaiveDate, NaiveDate) {
    match period {
        Period::Day => (day, day),
        Period::Week => {
            let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
            (monday, monday + Duration::days(6))
        }
        Period::Month => {
            let first = day.with_day(1).unwrap_or(day);
            (first, last_day_of_month(day.year(), day.month()).unwrap_or(day))
        }
        Period::Year => (
            NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day),
            NaiveDate::from_ymd_opt(day.year(), 12, 31).unwrap_or(day),
        ),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
