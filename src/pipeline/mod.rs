//! The data pipeline behind the dashboard:
//! `generate -> filter(selection) -> aggregate(period) / summarize`.
//!
//! Every stage is a pure function over borrowed input; nothing is mutated
//! in place.

pub mod aggregate;
pub mod filter;
pub mod summary;

pub use aggregate::{aggregate, Bucket};
pub use filter::{filter, SeriesSlice};
pub use summary::{summarize, Summary};

use crate::error::{AppError, Result};
use crate::models::{Period, Reading, Selection};

/// Output of one pipeline run for a non-empty selection.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub slice: SeriesSlice,
    pub buckets: Vec<Bucket>,
    pub summary: Summary,
}

/// Filter `series` by `selection`, then aggregate and summarize the slice.
///
/// An empty slice becomes `AppError::NoDataForSelection`.
pub fn run(series: &[Reading], selection: &Selection, period: Period) -> Result<PipelineOutput> {
    let slice = filter(series, selection);
    let no_data = || AppError::NoDataForSelection {
        entity: selection.entity.clone(),
        year: selection.year,
    };

    let summary = summarize(&slice.readings).ok_or_else(no_data)?;
    let buckets = aggregate(&slice.readings, period);

    Ok(PipelineOutput {
        slice,
        buckets,
        summary,
    })
}
