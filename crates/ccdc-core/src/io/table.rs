use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::consts::GEOMETRY_COLUMN;
use crate::error::{CcdcError, Result};
use crate::extract::SampleFailure;

/// One row of a sampled table, fields in source order.
///
/// CSV cells are kept as JSON strings; array-valued cells are parsed lazily
/// during decoding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    pub row: usize,
    pub fields: Vec<(String, Value)>,
}

impl RawRecord {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

/// Rows read from a sampled table. Rows that could not be parsed are kept
/// as failures at their row index instead of failing the whole read.
#[derive(Debug, Default)]
pub struct SampledTable {
    pub records: Vec<RawRecord>,
    pub rejected: Vec<SampleFailure>,
}

impl SampledTable {
    /// Number of data rows in the source, parsed or not.
    pub fn row_count(&self) -> usize {
        self.records.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    GeoJson,
}

impl TableFormat {
    /// Choose a format from the file extension. Unknown extensions read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("geojson" | "json") => Self::GeoJson,
            _ => Self::Csv,
        }
    }
}

/// Read a sampled table, choosing the format from the file extension.
pub fn read_table(path: &Path) -> Result<SampledTable> {
    let file = BufReader::new(File::open(path)?);
    let table = match TableFormat::from_path(path) {
        TableFormat::Csv => read_csv(file)?,
        TableFormat::GeoJson => read_geojson(file)?,
    };
    debug!(
        rows = table.records.len(),
        rejected = table.rejected.len(),
        path = %path.display(),
        "Read sampled table"
    );
    Ok(table)
}

/// Read CSV rows with a header line.
///
/// A row with the wrong number of cells or invalid UTF-8 is rejected on its
/// own. I/O errors and an unreadable header still fail the read.
pub fn read_csv<R: Read>(reader: R) -> Result<SampledTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut table = SampledTable::default();
    for (row, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(row, error = %e, "Rejected malformed CSV row");
                table.rejected.push(SampleFailure {
                    row,
                    error: e.into(),
                });
                continue;
            }
        };
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();
        table.records.push(RawRecord { row, fields });
    }
    Ok(table)
}

/// Read a GeoJSON `FeatureCollection`. Feature properties become fields and
/// the geometry is appended as a JSON-text `.geo` field. A feature whose
/// `properties` is not an object is rejected on its own.
pub fn read_geojson<R: Read>(reader: R) -> Result<SampledTable> {
    let root: Value = serde_json::from_reader(reader)?;
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| CcdcError::MissingField("features".into()))?;

    let mut table = SampledTable::default();
    for (row, feature) in features.iter().enumerate() {
        let mut fields: Vec<(String, Value)> = match feature.get("properties") {
            Some(Value::Object(props)) => {
                props.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                warn!(row, "Rejected feature with non-object properties");
                table.rejected.push(SampleFailure {
                    row,
                    error: CcdcError::InvalidField {
                        field: "properties".into(),
                        reason: format!("feature {row} properties is not an object"),
                    },
                });
                continue;
            }
        };
        if let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) {
            fields.push((
                GEOMETRY_COLUMN.to_string(),
                Value::String(geometry.to_string()),
            ));
        }
        table.records.push(RawRecord { row, fields });
    }
    Ok(table)
}
