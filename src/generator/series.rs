use crate::config::DatasetConfig;
use crate::error::{AppError, Result};
use crate::models::{Location, Reading};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates daily watt readings over a fixed calendar range.
///
/// Each (entity, year) segment draws from its own RNG, seeded from the
/// entity's numeric suffix, the year and `salt`. A full series is the
/// concatenation of its yearly segments, so a year can be regenerated on
/// its own and still match the full series.
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    start: NaiveDate,
    end: NaiveDate,
    watt_min: u32,
    watt_max: u32,
    salt: u64,
}

impl SeriesGenerator {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        watt_min: u32,
        watt_max: u32,
        salt: u64,
    ) -> Result<Self> {
        if start > end {
            return Err(AppError::GenerationFailure(format!(
                "date range {start}..={end} is empty"
            )));
        }
        if watt_min > watt_max {
            return Err(AppError::GenerationFailure(format!(
                "watt range {watt_min}..={watt_max} is empty"
            )));
        }
        Ok(Self {
            start,
            end,
            watt_min,
            watt_max,
            salt,
        })
    }

    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        Self::new(
            config.start_date,
            config.end_date,
            config.watt_min,
            config.watt_max,
            config.series_seed,
        )
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// One reading per day for `entity` across the whole range.
    pub fn series(&self, entity: &str) -> Vec<Reading> {
        (self.start.year()..=self.end.year())
            .flat_map(|year| self.year_segment(entity, year))
            .collect()
    }

    /// Readings of `entity` for the days of `year` that fall inside the range.
    pub fn year_segment(&self, entity: &str, year: i32) -> Vec<Reading> {
        let (Some(jan_first), Some(dec_last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) else {
            return Vec::new();
        };
        let first = jan_first.max(self.start);
        let last = dec_last.min(self.end);
        if first > last {
            return Vec::new();
        }

        let mut rng = StdRng::seed_from_u64(self.seed(entity, year));
        first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|day| Reading {
                entity: entity.to_string(),
                timestamp: day,
                watt: rng.gen_range(self.watt_min..=self.watt_max),
            })
            .collect()
    }

    fn seed(&self, entity: &str, year: i32) -> u64 {
        // Identifiers without digits still get a stable seed from their bytes.
        let suffix = Location::numeric_suffix(entity).unwrap_or_else(|| {
            entity
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
        });
        ((suffix << 16) ^ year as u64) ^ self.salt.rotate_left(32)
    }
}
