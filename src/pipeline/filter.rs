use crate::models::{Reading, Selection};
use chrono::Datelike;

/// The readings of one selection, ascending by day.
///
/// An empty slice is a normal outcome: the entity simply has no data for
/// the year. Callers decide how to present it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSlice {
    pub selection: Selection,
    pub readings: Vec<Reading>,
}

impl SeriesSlice {
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }
}

/// Keep the readings of `selection.entity` that fall in `selection.year`.
pub fn filter(readings: &[Reading], selection: &Selection) -> SeriesSlice {
    let mut selected: Vec<Reading> = readings
        .iter()
        .filter(|r| r.entity == selection.entity && r.timestamp.year() == selection.year)
        .cloned()
        .collect();
    selected.sort_by_key(|r| r.timestamp);

    SeriesSlice {
        selection: selection.clone(),
        readings: selected,
    }
}
