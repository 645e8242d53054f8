use crate::models::Reading;
use chrono::NaiveDate;
use serde::Serialize;

/// Headline metrics of a filtered slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub last_value: u32,
    pub last_timestamp: NaiveDate,
    /// Mean rounded to the nearest watt.
    pub mean_value: i64,
    pub mean_exact: f64,
    /// Sum of the daily values divided by 1000, one decimal, halves rounded up.
    pub annual_energy_kwh: f64,
    pub reading_count: usize,
}

/// `None` when there is nothing to summarize.
pub fn summarize(readings: &[Reading]) -> Option<Summary> {
    let last = readings.iter().max_by_key(|r| r.timestamp)?;

    let sum: u64 = readings.iter().map(|r| u64::from(r.watt)).sum();
    let count = readings.len();
    let mean = sum as f64 / count as f64;

    Some(Summary {
        last_value: last.watt,
        last_timestamp: last.timestamp,
        mean_value: mean.round() as i64,
        mean_exact: mean,
        annual_energy_kwh: kwh_tenths(sum) as f64 / 10.0,
        reading_count: count,
    })
}

// Rounded in integers so ties like 2550 Wh are exact before the float conversion.
fn kwh_tenths(watt_sum: u64) -> u64 {
    (watt_sum + 50) / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SeriesGenerator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading(day: NaiveDate, watt: u32) -> Reading {
        Reading {
            entity: "RTM-001".into(),
            timestamp: day,
            watt,
        }
    }

    #[test]
    fn test_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_small_slice() {
        let readings = vec![
            reading(date(2024, 1, 1), 200),
            reading(date(2024, 1, 2), 301),
            reading(date(2024, 1, 3), 450),
        ];
        let summary = summarize(&readings).unwrap();

        assert_eq!(summary.last_value, 450);
        assert_eq!(summary.last_timestamp, date(2024, 1, 3));
        assert_eq!(summary.mean_value, 317);
        assert!((summary.mean_exact - 317.0).abs() < 1e-9);
        assert_eq!(summary.annual_energy_kwh, 1.0);
        assert_eq!(summary.reading_count, 3);
    }

    #[test]
    fn test_mean_rounds_to_nearest() {
        let readings = vec![reading(date(2024, 1, 1), 200), reading(date(2024, 1, 2), 201)];
        assert_eq!(summarize(&readings).unwrap().mean_value, 201);

        let readings = vec![
            reading(date(2024, 1, 1), 200),
            reading(date(2024, 1, 2), 200),
            reading(date(2024, 1, 3), 201),
        ];
        assert_eq!(summarize(&readings).unwrap().mean_value, 200);
    }

    #[test]
    fn test_last_value_is_chronologically_last() {
        let readings = vec![reading(date(2024, 3, 1), 999), reading(date(2024, 2, 1), 250)];
        assert_eq!(summarize(&readings).unwrap().last_value, 999);
    }

    #[test]
    fn test_annual_energy_rounding() {
        let readings = vec![reading(date(2024, 1, 1), 1234), reading(date(2024, 1, 2), 1300)];
        // 2534 / 1000 = 2.534
        assert_eq!(summarize(&readings).unwrap().annual_energy_kwh, 2.5);
    }

    #[test]
    fn test_annual_energy_ties_round_up() {
        let readings = vec![reading(date(2024, 1, 1), 1250), reading(date(2024, 1, 2), 1300)];
        assert_eq!(summarize(&readings).unwrap().annual_energy_kwh, 2.6);

        let readings = vec![reading(date(2024, 1, 1), 1249), reading(date(2024, 1, 2), 1300)];
        assert_eq!(summarize(&readings).unwrap().annual_energy_kwh, 2.5);

        assert_eq!(kwh_tenths(0), 0);
        assert_eq!(kwh_tenths(49), 0);
        assert_eq!(kwh_tenths(150), 2);
    }

    #[test]
    fn test_leap_year_bounds() {
        let readings = SeriesGenerator::new(date(2020, 1, 1), date(2026, 12, 31), 200, 1500, 0)
            .unwrap()
            .year_segment("RTM-007", 2024);
        let summary = summarize(&readings).unwrap();

        assert_eq!(summary.reading_count, 366);
        assert!(summary.annual_energy_kwh >= 73.2);
        assert!(summary.annual_energy_kwh <= 549.0);

        let sum: u64 = readings.iter().map(|r| u64::from(r.watt)).sum();
        assert!((summary.annual_energy_kwh - sum as f64 / 1000.0).abs() <= 0.05 + 1e-9);
        assert_eq!(summary.last_value, readings[365].watt);
    }
}
