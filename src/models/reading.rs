use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily consumption sample for a connection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub entity: String,
    pub timestamp: NaiveDate,
    pub watt: u32,
}
