use crate::error::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    8080
}

/// Bounding box that generated coordinates are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }
}

impl Default for BoundingBox {
    // Rotterdam
    fn default() -> Self {
        Self {
            lat_min: 51.88,
            lat_max: 51.95,
            lon_min: 4.42,
            lon_max: 4.52,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_location_count")]
    pub location_count: usize,
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_id_width")]
    pub id_width: usize,
    #[serde(default)]
    pub bounds: BoundingBox,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
    #[serde(default = "default_watt_min")]
    pub watt_min: u32,
    #[serde(default = "default_watt_max")]
    pub watt_max: u32,
    /// Only the first N locations carry a consumption series. `None` means all.
    #[serde(default)]
    pub simulated_entities: Option<usize>,
    /// Fixed seed for coordinates. Without it each session draws from entropy.
    #[serde(default)]
    pub location_seed: Option<u64>,
    /// Salt mixed into the per (entity, year) series seed.
    #[serde(default)]
    pub series_seed: u64,
    #[serde(default)]
    pub default_year: Option<i32>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            location_count: default_location_count(),
            id_prefix: default_id_prefix(),
            id_width: default_id_width(),
            bounds: BoundingBox::default(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            watt_min: default_watt_min(),
            watt_max: default_watt_max(),
            simulated_entities: None,
            location_seed: None,
            series_seed: 0,
            default_year: None,
        }
    }
}

impl DatasetConfig {
    /// Calendar years covered by `[start_date, end_date]`, ascending.
    pub fn supported_years(&self) -> Vec<i32> {
        use chrono::Datelike;
        if self.start_date > self.end_date {
            return Vec::new();
        }
        (self.start_date.year()..=self.end_date.year()).collect()
    }

    /// The year selected when a session starts: configured, else the last supported year.
    pub fn initial_year(&self) -> Option<i32> {
        let years = self.supported_years();
        match self.default_year {
            Some(year) if years.contains(&year) => Some(year),
            _ => years.last().copied(),
        }
    }
}

fn default_location_count() -> usize {
    200
}

fn default_id_prefix() -> String {
    "RTM".into()
}

fn default_id_width() -> usize {
    3
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or(NaiveDate::MIN)
}

fn default_watt_min() -> u32 {
    200
}

fn default_watt_max() -> u32 {
    1500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_max_sessions() -> usize {
    1000
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut cfg = Self::from_yaml(&raw)?;

        // Optional: allow DATASET_SEED env to pin the location seed
        if let Ok(seed) = std::env::var("DATASET_SEED") {
            let seed = seed
                .parse()
                .map_err(|_| AppError::Config(format!("DATASET_SEED is not a number: {seed}")))?;
            cfg.dataset.location_seed = Some(seed);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let expanded = expand_env_placeholders(raw)?;
        Ok(serde_yaml::from_str(&expanded)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let ds = &self.dataset;

        if self.api.port == 0 {
            return Err(AppError::Config("api.port cannot be 0".to_string()));
        }

        if ds.id_prefix.is_empty() {
            return Err(AppError::Config("dataset.id_prefix cannot be empty".to_string()));
        }

        if ds.start_date > ds.end_date {
            return Err(AppError::Config(format!(
                "dataset.start_date {} is after dataset.end_date {}",
                ds.start_date, ds.end_date
            )));
        }

        if ds.watt_min > ds.watt_max {
            return Err(AppError::Config(format!(
                "dataset.watt_min {} is above dataset.watt_max {}",
                ds.watt_min, ds.watt_max
            )));
        }

        if let Some(year) = ds.default_year {
            if !ds.supported_years().contains(&year) {
                return Err(AppError::Config(format!(
                    "dataset.default_year {year} is outside the generated range"
                )));
            }
        }

        if self.session.max_sessions == 0 {
            return Err(AppError::Config("session.max_sessions cannot be 0".to_string()));
        }

        Ok(())
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
fn expand_env_placeholders(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let close = match it.peek().copied() {
            Some('$') => {
                // "$$" -> "$"
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };
        it.next();
        let var = read_until(&mut it, close).ok_or_else(|| {
            AppError::Config(format!("unterminated env placeholder: missing '{close}'"))
        })?;
        let val = std::env::var(&var)
            .map_err(|_| AppError::Config(format!("missing environment variable: {var}")))?;
        out.push_str(&val);
    }

    Ok(out)
}

/// Read characters until we hit `end`, returning the collected string.
fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}
