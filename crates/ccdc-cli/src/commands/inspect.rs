use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use ccdc_core::io::decode::{discover_bands, missing_fields};
use ccdc_core::io::table::read_table;
use ccdc_core::pipeline::config::ModelLayout;
use ccdc_core::pipeline::decode_records;
use ccdc_core::select::is_past_last_segment;

use super::split_list;

#[derive(Args)]
pub struct InspectArgs {
    /// Sampled table (CSV or GeoJSON)
    pub file: PathBuf,

    /// Comma-separated band prefixes (default: discovered from `*_coefs` fields)
    #[arg(long)]
    pub bands: Option<String>,

    /// Field holding the sample date in milliseconds
    #[arg(long, default_value = "millis")]
    pub millis_field: String,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    let table = read_table(&args.file)?;
    let records = &table.records;
    let Some(first) = records.first() else {
        bail!("{} contains no readable rows", args.file.display());
    };

    let discovered = discover_bands(first.names());
    let bands = match args.bands {
        Some(ref b) => split_list(b),
        None => discovered.clone(),
    };
    let mut layout = ModelLayout::with_bands(&bands);
    layout.millis_field = args.millis_field.clone();

    println!("File:        {}", args.file.display());
    println!("Rows:        {}", table.row_count());
    if !table.rejected.is_empty() {
        println!("Unreadable:  {}", table.rejected.len());
    }
    println!("Fields:      {}", first.fields.len());
    println!("Bands:       {}", discovered.join(", "));

    let missing = missing_fields(&layout, first.names());
    if !missing.is_empty() {
        println!("Missing:     {}", missing.join(", "));
        return Ok(());
    }

    let (pixels, failures) = decode_records(records, &layout);
    println!("Decoded:     {}", pixels.len());
    if !failures.is_empty() {
        println!("Undecodable: {}", failures.len());
        for failure in failures.iter().take(5) {
            println!("  row {:>8}  {}", failure.row, failure.error);
        }
    }
    if pixels.is_empty() {
        return Ok(());
    }

    let seg_counts: Vec<usize> = pixels.iter().map(|p| p.model.nsegs()).collect();
    let min = seg_counts.iter().min().copied().unwrap_or(0);
    let max = seg_counts.iter().max().copied().unwrap_or(0);
    let mean = seg_counts.iter().sum::<usize>() as f64 / seg_counts.len() as f64;
    println!("Segments:    min {}  max {}  mean {:.2}", min, max, mean);

    let empty = pixels.iter().filter(|p| p.model.is_empty()).count();
    let malformed = pixels.iter().filter(|p| p.model.validate().is_err()).count();
    let late = pixels
        .iter()
        .filter(|p| is_past_last_segment(&p.model.t_end, p.sample.millis))
        .count();
    println!("Empty:       {}", empty);
    println!("Malformed:   {}", malformed);
    println!("Past end:    {}", late);

    if let (Some(first_ms), Some(last_ms)) = (
        pixels.iter().map(|p| p.sample.millis).min(),
        pixels.iter().map(|p| p.sample.millis).max(),
    ) {
        println!("Dates (ms):  {} .. {}", first_ms, last_ms);
    }

    Ok(())
}
