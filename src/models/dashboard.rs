use super::{Period, Selection};
use crate::pipeline::{Bucket, Summary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters shared by the session endpoints.
///
/// Any parameter given replaces the session's stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub entity: Option<String>,
    pub year: Option<i32>,
    pub period: Option<Period>,
    #[serde(default)]
    pub include_id: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsView {
    pub years: Vec<i32>,
    pub periods: Vec<Period>,
    pub default_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub entities: Vec<String>,
    pub years: Vec<i32>,
    pub periods: Vec<Period>,
    pub selection: Selection,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: NaiveDate,
    pub value: f64,
}

impl From<&Bucket> for ChartPoint {
    fn from(bucket: &Bucket) -> Self {
        Self {
            timestamp: bucket.period_end,
            value: bucket.mean_watt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub selection: Selection,
    pub period: Period,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric<T> {
    pub label: &'static str,
    pub value: T,
    pub unit: &'static str,
}

/// The three metric tiles above the chart, plus the unrounded figures behind them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsView {
    pub last: Metric<u32>,
    pub mean: Metric<i64>,
    pub annual_total: Metric<f64>,
    pub last_reading_day: NaiveDate,
    pub mean_exact: f64,
    pub reading_count: usize,
}

impl From<&Summary> for MetricsView {
    fn from(summary: &Summary) -> Self {
        Self {
            last: Metric {
                label: "Last reading",
                value: summary.last_value,
                unit: "W",
            },
            mean: Metric {
                label: "Average",
                value: summary.mean_value,
                unit: "W",
            },
            annual_total: Metric {
                label: "Year total",
                value: summary.annual_energy_kwh,
                unit: "kWh",
            },
            last_reading_day: summary.last_timestamp,
            mean_exact: summary.mean_exact,
            reading_count: summary.reading_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardContent {
    Ready {
        metrics: MetricsView,
        map: Vec<MapPoint>,
        chart: Vec<ChartPoint>,
    },
    NoData {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub selection: Selection,
    pub period: Period,
    #[serde(flatten)]
    pub content: DashboardContent,
}
