use serde::{Deserialize, Serialize};

/// A simulated connection point ("aansluiting") on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Numeric part of an identifier such as `RTM-007`.
    pub fn numeric_suffix(id: &str) -> Option<u64> {
        let head = id.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        id[head..].parse().ok()
    }
}
