use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use influence_common::load_config_or_default;
use influence_expander::{export_csv, init_tracing};

/// Read an expanded set (JSON lines) on stdin and write a CSV of the most
/// popular, most relevant accounts to stdout.
#[derive(Parser)]
#[command(name = "influencers-to-csv", about = "Export an expanded influencer set as CSV")]
struct Cli {
    /// Optional TOML file overriding the export thresholds
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let file_config = load_config_or_default(cli.config.as_deref())?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    export_csv(stdin, stdout, &file_config.export)?;
    Ok(())
}
