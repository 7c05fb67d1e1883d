use std::path::PathBuf;

use crate::extract::SampleFailure;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Decoding,
    Extracting,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading samples"),
            Self::Decoding => write!(f, "Decoding models"),
            Self::Extracting => write!(f, "Extracting segments"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., sample count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// Work items completed so far within the current stage.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_extraction` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Outcome of a full extraction run.
#[derive(Debug, Default)]
pub struct ExtractionSummary {
    pub rows_read: usize,
    pub rows_written: usize,
    /// Rows whose date is on or after their pixel's last segment end.
    pub past_last_segment: usize,
    /// Rows written without a selected segment.
    pub unmatched: usize,
    /// Failed rows, ordered by input row.
    pub failures: Vec<SampleFailure>,
    pub outputs: Vec<PathBuf>,
}
