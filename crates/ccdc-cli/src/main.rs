mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ccdc", about = "Extract CCDC segment coefficients at sample dates")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the segment applying at each sample's date
    Extract(commands::extract::ExtractArgs),
    /// Show sampled table contents and model statistics
    Inspect(commands::inspect::InspectArgs),
    /// Print the output column list
    Schema(commands::schema::SchemaArgs),
    /// Print or save a default extraction config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Schema(args) => commands::schema::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
