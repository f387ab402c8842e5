use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use influence_common::{load_config_or_default, InfluencerRecord};
use influence_expander::{generate_rules, init_tracing, read_json_lines, ruleset_name_from_path};

/// Regenerate PowerTrack rule payloads from an existing expanded set.
#[derive(Parser)]
#[command(name = "generate-rules", about = "Build PowerTrack rules from an expanded set")]
struct Cli {
    /// Expanded set file (one user record per line)
    #[arg(long)]
    input: PathBuf,

    /// Ruleset name used in rule tags; defaults to the input file's stem
    #[arg(long)]
    name: Option<String>,

    /// Optional TOML file overriding rule chunking
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let file_config = load_config_or_default(cli.config.as_deref())?;

    let records: Vec<InfluencerRecord> = read_json_lines(&cli.input)?;
    let name = cli
        .name
        .unwrap_or_else(|| ruleset_name_from_path(&cli.input));
    let updates = generate_rules(&records, &name, &file_config.rules);

    let mut out = io::BufWriter::new(io::stdout().lock());
    for update in &updates {
        serde_json::to_writer(&mut out, update)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!(records = records.len(), updates = updates.len(), ruleset = %name, "Rules generated");
    Ok(())
}
