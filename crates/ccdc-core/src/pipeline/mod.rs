pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{decode_records, run_extraction, run_extraction_reported};
pub use types::{ExtractionSummary, PipelineStage, ProgressReporter};
