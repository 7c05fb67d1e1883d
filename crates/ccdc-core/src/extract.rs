use rayon::prelude::*;
use tracing::{debug, warn};

use crate::consts::{EXTRACTION_BATCH_SIZE, PARALLEL_SAMPLE_THRESHOLD};
use crate::error::{CcdcError, Result};
use crate::model::{Sample, SegmentedPixelModel};
use crate::pipeline::config::SelectionPolicy;
use crate::select::is_past_last_segment;
use crate::unpack::{missing_attributes, unpack, SegmentAttributes};

/// Segment attributes of one sample, merged with its metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionResult {
    pub metadata: Vec<(String, String)>,
    /// Selected segment (0-based), `None` if the policy found no segment.
    pub seg: Option<usize>,
    pub nsegs: usize,
    /// Sample date is on or after the end of the pixel's last segment.
    pub past_last_segment: bool,
    pub attributes: SegmentAttributes,
}

/// A sample paired with the pixel model sampled at its location.
#[derive(Clone, Debug)]
pub struct SampledPixel {
    /// Row index in the input table.
    pub row: usize,
    pub sample: Sample,
    pub model: SegmentedPixelModel,
}

/// A sample that could not be decoded or extracted.
#[derive(Debug)]
pub struct SampleFailure {
    pub row: usize,
    pub error: CcdcError,
}

#[derive(Debug, Default)]
pub struct BatchExtraction {
    /// Successful rows in input order, tagged with their input row index.
    pub results: Vec<(usize, ExtractionResult)>,
    pub failures: Vec<SampleFailure>,
}

/// Select the applicable segment for `sample` and unpack its attributes.
pub fn extract(
    sample: &Sample,
    model: &SegmentedPixelModel,
    policy: SelectionPolicy,
) -> Result<ExtractionResult> {
    let seg = policy.select(model, sample.millis)?;
    let attributes = match seg {
        Some(seg) => unpack(model, seg)?,
        None => {
            let bands: Vec<&str> = model.band_names().collect();
            missing_attributes(&bands)
        }
    };

    Ok(ExtractionResult {
        metadata: sample.metadata.clone(),
        seg,
        nsegs: model.nsegs(),
        past_last_segment: is_past_last_segment(&model.t_end, sample.millis),
        attributes,
    })
}

/// Extract every sampled pixel, isolating failures per sample.
///
/// Pixels are processed in batches of [`EXTRACTION_BATCH_SIZE`], each batch in
/// parallel. `on_progress` receives the number of samples processed so far
/// after each batch. Output order follows input order.
pub fn extract_batch(
    pixels: &[SampledPixel],
    policy: SelectionPolicy,
    on_progress: Option<&dyn Fn(usize)>,
) -> BatchExtraction {
    let mut out = BatchExtraction {
        results: Vec::with_capacity(pixels.len()),
        failures: Vec::new(),
    };

    for (batch_idx, batch) in pixels.chunks(EXTRACTION_BATCH_SIZE).enumerate() {
        let extract_one = |p: &SampledPixel| (p.row, extract(&p.sample, &p.model, policy));
        let outcomes: Vec<(usize, Result<ExtractionResult>)> =
            if batch.len() >= PARALLEL_SAMPLE_THRESHOLD {
                batch.par_iter().map(extract_one).collect()
            } else {
                batch.iter().map(extract_one).collect()
            };

        for (row, outcome) in outcomes {
            match outcome {
                Ok(result) => out.results.push((row, result)),
                Err(error) => {
                    warn!(row, %error, "Sample extraction failed");
                    out.failures.push(SampleFailure { row, error });
                }
            }
        }

        let done = (batch_idx * EXTRACTION_BATCH_SIZE + batch.len()).min(pixels.len());
        debug!(done, total = pixels.len(), "Extraction batch complete");
        if let Some(progress) = on_progress {
            progress(done);
        }
    }

    out
}
