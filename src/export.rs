use crate::error::Result;
use crate::models::Reading;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One CSV row of an exported slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub connection_id: Option<String>,
    pub timestamp: NaiveDate,
    pub watt: u32,
}

/// Write `readings` as CSV with a header row.
///
/// With `include_id` the rows start with a `connection_id` column.
pub fn write_csv<W: Write>(writer: W, readings: &[Reading], include_id: bool) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in readings {
        wtr.serialize(ExportRow {
            connection_id: include_id.then(|| r.entity.clone()),
            timestamp: r.timestamp,
            watt: r.watt,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(readings: &[Reading], include_id: bool) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, readings, include_id)?;
    String::from_utf8(buf).map_err(|e| anyhow::anyhow!("CSV output is not UTF-8: {e}").into())
}

/// Read rows written by [`write_csv`], with or without the id column.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ExportRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr
        .deserialize::<ExportRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
