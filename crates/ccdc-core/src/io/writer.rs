use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::{NSEGS_COLUMN, SEG_COLUMN};
use crate::error::Result;
use crate::extract::{ExtractionResult, SampleFailure};
use crate::pipeline::config::{ExportConfig, ModelLayout};
use crate::unpack::attribute_keys;

/// Column layout of the exported table.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputSchema {
    pub metadata: Vec<String>,
    pub attributes: Vec<String>,
}

impl OutputSchema {
    pub fn new<S: AsRef<str>>(metadata: Vec<String>, bands: &[S]) -> Self {
        Self {
            metadata,
            attributes: attribute_keys(bands),
        }
    }

    /// Schema for a set of results. Metadata columns are the configured list,
    /// or every metadata field seen, in first-seen order.
    pub fn from_results(layout: &ModelLayout, results: &[ExtractionResult]) -> Self {
        let metadata = match &layout.metadata_fields {
            Some(fields) => fields.clone(),
            None => {
                let mut seen = HashSet::new();
                let mut names = Vec::new();
                for (name, _) in results.iter().flat_map(|r| r.metadata.iter()) {
                    if seen.insert(name.as_str()) {
                        names.push(name.clone());
                    }
                }
                names
            }
        };
        Self::new(metadata, &layout.bands)
    }

    pub fn columns(&self) -> Vec<String> {
        let mut cols = Vec::with_capacity(self.metadata.len() + 2 + self.attributes.len());
        cols.extend(self.metadata.iter().cloned());
        cols.push(SEG_COLUMN.to_string());
        cols.push(NSEGS_COLUMN.to_string());
        cols.extend(self.attributes.iter().cloned());
        cols
    }

    /// Cells for one result, aligned with [`columns`](Self::columns).
    /// Absent metadata and attributes render as empty cells.
    pub fn row(&self, result: &ExtractionResult, precision: Option<usize>) -> Vec<String> {
        let mut cells = Vec::with_capacity(self.metadata.len() + 2 + self.attributes.len());
        for name in &self.metadata {
            let value = result
                .metadata
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            cells.push(value);
        }
        cells.push(result.seg.map(|s| s.to_string()).unwrap_or_default());
        cells.push(result.nsegs.to_string());
        for key in &self.attributes {
            let value = result
                .attributes
                .get(key)
                .map(|v| v.format(precision))
                .unwrap_or_default();
            cells.push(value);
        }
        cells
    }
}

/// Path of the export chunk starting at row `offset`: `<stem>_<offset>.<ext>`.
pub fn chunk_path(path: &Path, offset: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{offset}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{offset}"),
    };
    path.with_file_name(name)
}

/// Write results as CSV, split into chunks when configured.
///
/// Returns the files written. Every chunk carries the full header.
pub fn write_results(
    path: &Path,
    schema: &OutputSchema,
    results: &[ExtractionResult],
    export: &ExportConfig,
) -> Result<Vec<PathBuf>> {
    let chunk_size = match export.chunk_size {
        Some(n) => n,
        None => {
            write_csv_file(path, schema, results, export.float_precision)?;
            return Ok(vec![path.to_path_buf()]);
        }
    };

    if results.is_empty() {
        let target = chunk_path(path, 0);
        write_csv_file(&target, schema, results, export.float_precision)?;
        return Ok(vec![target]);
    }

    let mut written = Vec::new();
    for (i, chunk) in results.chunks(chunk_size).enumerate() {
        let target = chunk_path(path, i * chunk_size);
        write_csv_file(&target, schema, chunk, export.float_precision)?;
        written.push(target);
    }
    Ok(written)
}

fn write_csv_file(
    path: &Path,
    schema: &OutputSchema,
    results: &[ExtractionResult],
    precision: Option<usize>,
) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut writer = csv::Writer::from_writer(file);
    write_rows(&mut writer, schema, results, precision)?;
    info!(rows = results.len(), path = %path.display(), "Wrote extraction table");
    Ok(())
}

/// Write a header and one row per result.
pub fn write_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    schema: &OutputSchema,
    results: &[ExtractionResult],
    precision: Option<usize>,
) -> Result<()> {
    writer.write_record(schema.columns())?;
    for result in results {
        writer.write_record(schema.row(result, precision))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a `row,error` report of failed samples.
pub fn write_failures(path: &Path, failures: &[SampleFailure]) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["row", "error"])?;
    for failure in failures {
        writer.write_record([failure.row.to_string(), failure.error.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
