use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ccdc_core::pipeline::config::{ExtractConfig, SelectionPolicy};
use ccdc_core::pipeline::{run_extraction_reported, PipelineStage, ProgressReporter};
use tracing::debug;

use super::split_list;
use crate::summary::{print_extract_summary, print_run_summary};

const DEFAULT_OUTPUT: &str = "segments.csv";

#[derive(Clone, ValueEnum)]
pub enum PolicyArg {
    /// First segment ending after the date, else the last segment
    After,
    /// First segment ending after the date, else no segment
    AfterStrict,
    /// Segment containing the date, else no segment
    Intersecting,
}

impl From<&PolicyArg> for SelectionPolicy {
    fn from(arg: &PolicyArg) -> Self {
        match arg {
            PolicyArg::After => SelectionPolicy::FirstEndingAfter,
            PolicyArg::AfterStrict => SelectionPolicy::FirstEndingAfterStrict,
            PolicyArg::Intersecting => SelectionPolicy::Intersecting,
        }
    }
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Sampled table (CSV or GeoJSON)
    pub file: PathBuf,

    /// Extraction config file (TOML). Flags passed alongside it override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated band prefixes
    #[arg(long)]
    pub bands: Option<String>,

    /// Field holding the sample date in milliseconds [default: millis]
    #[arg(long)]
    pub millis_field: Option<String>,

    /// Comma-separated metadata fields to keep (default: all non-model fields)
    #[arg(long)]
    pub metadata: Option<String>,

    /// Segment selection policy [default: after]
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Split output into files of this many rows
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Write failed rows and their errors to this CSV
    #[arg(long)]
    pub failures: Option<PathBuf>,

    /// Fixed decimals for real-valued columns
    #[arg(long)]
    pub precision: Option<usize>,

    /// Output file path [default: segments.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Drives an indicatif bar from pipeline progress.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_length(total_items.unwrap_or(0) as u64);
        self.pb.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }
}

pub fn run(args: &ExtractArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config =
            ExtractConfig::from_toml(&contents).context("Invalid extraction config")?;
        debug!(path = %config_path.display(), "Loaded extraction config");
        apply_overrides(&mut config, args);
        config.validate().context("Invalid extraction config")?;
        config
    } else {
        build_config_from_args(args)
    };

    print_extract_summary(&config);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { pb: pb.clone() });

    let summary = run_extraction_reported(&config, reporter)
        .with_context(|| format!("Extraction failed for {}", config.input.display()))?;
    pb.finish_with_message("Done");

    print_run_summary(&summary);
    Ok(())
}

fn build_config_from_args(args: &ExtractArgs) -> ExtractConfig {
    let output = PathBuf::from(DEFAULT_OUTPUT);
    let mut config = ExtractConfig::new(args.file.clone(), output);
    apply_overrides(&mut config, args);
    config
}

/// Apply flags the user passed on top of `config`. The input file is always
/// taken from the command line.
fn apply_overrides(config: &mut ExtractConfig, args: &ExtractArgs) {
    config.input = args.file.clone();
    if let Some(ref output) = args.output {
        config.output = output.clone();
    }
    if let Some(ref b) = args.bands {
        config.layout.bands = split_list(b);
    }
    if let Some(ref field) = args.millis_field {
        config.layout.millis_field = field.clone();
    }
    if let Some(ref meta) = args.metadata {
        config.layout.metadata_fields = Some(split_list(meta));
    }
    if let Some(ref policy) = args.policy {
        config.selection = SelectionPolicy::from(policy);
    }
    if args.chunk_size.is_some() {
        config.export.chunk_size = args.chunk_size;
    }
    if args.failures.is_some() {
        config.export.failures = args.failures.clone();
    }
    if args.precision.is_some() {
        config.export.float_precision = args.precision;
    }
}
