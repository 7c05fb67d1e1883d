use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{CcdcError, Result};
use crate::extract::{extract_batch, ExtractionResult, SampleFailure, SampledPixel};
use crate::io::decode::{decode_record, missing_fields};
use crate::io::table::{read_table, RawRecord, TableFormat};
use crate::io::writer::{write_failures, write_results, OutputSchema};

use super::config::{ExtractConfig, ModelLayout};
use super::types::{ExtractionSummary, NoOpReporter, PipelineStage, ProgressReporter};

/// Decode table rows into sampled pixels, collecting per-row failures.
pub fn decode_records(
    records: &[RawRecord],
    layout: &ModelLayout,
) -> (Vec<SampledPixel>, Vec<SampleFailure>) {
    let mut pixels = Vec::with_capacity(records.len());
    let mut failures = Vec::new();
    for record in records {
        match decode_record(record, layout) {
            Ok(pixel) => pixels.push(pixel),
            Err(error) => {
                warn!(row = record.row, %error, "Could not decode sample");
                failures.push(SampleFailure {
                    row: record.row,
                    error,
                });
            }
        }
    }
    (pixels, failures)
}

/// Run the full extraction with a thread-safe progress reporter.
pub fn run_extraction_reported(
    config: &ExtractConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<ExtractionSummary> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Reading, None);
    let table = read_table(&config.input)?;
    reporter.finish_stage();
    if table.is_empty() {
        return Err(CcdcError::EmptyInput);
    }
    let rows_read = table.row_count();
    info!(
        rows = rows_read,
        rejected = table.rejected.len(),
        bands = config.layout.bands.len(),
        policy = %config.selection,
        "Read sampled table"
    );

    // CSV rows share one header, so a missing column would fail every row.
    if TableFormat::from_path(&config.input) == TableFormat::Csv {
        if let Some(first) = table.records.first() {
            let missing = missing_fields(&config.layout, first.names());
            if !missing.is_empty() {
                return Err(CcdcError::MissingField(missing.join(", ")));
            }
        }
    }

    let records = table.records;
    let mut failures = table.rejected;
    reporter.begin_stage(PipelineStage::Decoding, Some(records.len()));
    let (pixels, decode_failures) = decode_records(&records, &config.layout);
    failures.extend(decode_failures);
    reporter.advance(records.len());
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Extracting, Some(pixels.len()));
    let progress = |done: usize| reporter.advance(done);
    let batch = extract_batch(&pixels, config.selection, Some(&progress as &dyn Fn(usize)));
    reporter.finish_stage();

    failures.extend(batch.failures);
    failures.sort_by_key(|f| f.row);

    let results: Vec<ExtractionResult> = batch.results.into_iter().map(|(_, r)| r).collect();
    let past_last_segment = results.iter().filter(|r| r.past_last_segment).count();
    let unmatched = results.iter().filter(|r| r.seg.is_none()).count();
    if past_last_segment > 0 {
        info!(
            count = past_last_segment,
            "Samples dated on or after their pixel's last segment end"
        );
    }

    reporter.begin_stage(PipelineStage::Writing, Some(results.len()));
    let schema = OutputSchema::from_results(&config.layout, &results);
    let outputs = write_results(&config.output, &schema, &results, &config.export)?;
    if let Some(ref path) = config.export.failures {
        write_failures(path, &failures)?;
    }
    reporter.advance(results.len());
    reporter.finish_stage();

    info!(
        written = results.len(),
        failed = failures.len(),
        files = outputs.len(),
        "Extraction complete"
    );

    Ok(ExtractionSummary {
        rows_read,
        rows_written: results.len(),
        past_last_segment,
        unmatched,
        failures,
        outputs,
    })
}

/// Run the full extraction without progress reporting.
pub fn run_extraction(config: &ExtractConfig) -> Result<ExtractionSummary> {
    run_extraction_reported(config, Arc::new(NoOpReporter))
}
