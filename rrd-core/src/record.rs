//! Primitives for reading the prediction CSV.
//!
//! The file is semicolon-delimited with a header row. Every data row is
//! decoded into a loosely-typed [`RawRecord`]; validation and coercion are
//! left to [`crate::normalize`].

use crate::error::LoadError;
use csv::{ByteRecord, ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::io::Read;

pub const DELIMITER: u8 = b';';

pub const COL_DATE: &str = "Fecha";
pub const COL_RAINFALL: &str = "Lluvia_Predicha_mm";
pub const COL_RISK: &str = "Riesgo_Predicho";
pub const COL_PROBABILITY: &str = "Probabilidad_Riesgo_Alto";
pub const COL_UNIT: &str = "Unidad_Vecinal";

/// Columns every upload must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] =
    [COL_DATE, COL_RAINFALL, COL_RISK, COL_PROBABILITY, COL_UNIT];

/// One data row keyed by header name. Empty cells come through as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Fecha")]
    pub date: Option<String>,
    #[serde(rename = "Lluvia_Predicha_mm")]
    pub rainfall: Option<String>,
    #[serde(rename = "Riesgo_Predicho")]
    pub risk: Option<String>,
    #[serde(rename = "Probabilidad_Riesgo_Alto")]
    pub probability: Option<String>,
    #[serde(rename = "Unidad_Vecinal")]
    pub unit: Option<String>,
}

/// Read every data row of a prediction file.
///
/// Checks are applied in upload order: any structural row error rejects the
/// file, then a file without data rows, then a header missing one of
/// [`REQUIRED_COLUMNS`]. Invalid UTF-8 is not an error; it is decoded lossily.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_reader(reader);

    let headers = StringRecord::from_byte_record_lossy(rdr.byte_headers()?.clone());
    let raw_rows = rdr
        .byte_records()
        .collect::<Result<Vec<ByteRecord>, csv::Error>>()?;

    // Non-UTF-8 bytes (e.g. Windows-1252 exports) become U+FFFD.
    let mut warned = false;
    let rows: Vec<StringRecord> = raw_rows
        .into_iter()
        .map(|row| {
            if !warned && row.iter().any(|field| std::str::from_utf8(field).is_err()) {
                warned = true;
                log::warn!(
                    "record: line {} is not valid UTF-8, invalid bytes replaced",
                    row.position().map(|p| p.line()).unwrap_or(0)
                );
            }
            StringRecord::from_byte_record_lossy(row)
        })
        .collect();

    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    let found: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    if !REQUIRED_COLUMNS
        .iter()
        .all(|col| found.iter().any(|h| h == col))
    {
        return Err(LoadError::MissingColumns {
            expected: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }

    let records = rows
        .iter()
        .map(|row| row.deserialize::<RawRecord>(Some(&headers)))
        .collect::<Result<Vec<RawRecord>, csv::Error>>()?;
    log::debug!("record: read {} rows with headers {:?}", records.len(), headers);
    Ok(records)
}
