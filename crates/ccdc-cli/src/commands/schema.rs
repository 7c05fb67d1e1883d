use anyhow::Result;
use clap::Args;
use ccdc_core::consts::DEFAULT_BANDS;
use ccdc_core::io::writer::OutputSchema;

use super::split_list;

#[derive(Args)]
pub struct SchemaArgs {
    /// Comma-separated band prefixes
    #[arg(long)]
    pub bands: Option<String>,

    /// Comma-separated metadata columns to place first
    #[arg(long)]
    pub metadata: Option<String>,
}

pub fn run(args: &SchemaArgs) -> Result<()> {
    let bands = match args.bands {
        Some(ref b) => split_list(b),
        None => DEFAULT_BANDS.iter().map(|b| b.to_string()).collect(),
    };
    let metadata = args.metadata.as_deref().map(split_list).unwrap_or_default();

    let schema = OutputSchema::new(metadata, &bands);
    for column in schema.columns() {
        println!("{}", column);
    }
    Ok(())
}
