use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use influence_common::{load_config_or_default, read_seed_set, Config};
use influence_expander::{
    generate_rules, init_tracing, ruleset_name_from_path, write_json_lines, GraphExpander,
    OutputPaths, TwitterFetcher,
};
use twitter_client::TwitterClient;

/// Expand a seed set of handles into a scored set of local influencers.
///
/// Writes `<seed>.expanded_set.json` (one user record per line) and
/// `<seed>.powertrack_rules.json` (one rules payload per line).
#[derive(Parser)]
#[command(name = "expand-influencers", about = "Generate a list of influencers from a seed set")]
struct Cli {
    /// Path of file containing seed set, one handle per line
    #[arg(long)]
    seedfile: PathBuf,

    /// Optional TOML file overriding expansion, rules and export tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the output paths are resolved against
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.log_redacted();
    let file_config = load_config_or_default(cli.config.as_deref())?;

    let seeds = read_seed_set(&cli.seedfile)
        .with_context(|| format!("Failed to read seed file: {}", cli.seedfile.display()))?;
    anyhow::ensure!(!seeds.is_empty(), "Seed set {} is empty", cli.seedfile.display());
    info!(count = seeds.len(), "Seed set loaded");

    let client = TwitterClient::connect(&config.twitter_api_key, &config.twitter_secret).await?;
    let fetcher = TwitterFetcher::new(
        client,
        file_config.expansion.max_followers,
        file_config.expansion.max_friends,
    );
    let expander = GraphExpander::new(fetcher, file_config.expansion.clone());
    let expansion = expander.expand(&seeds).await;
    info!("Expansion complete. {}", expansion.stats);

    let paths = OutputPaths::from_seed_file(&cli.seedfile, &cli.output_dir);
    if let Some(parent) = paths.expanded_set.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    write_json_lines(&paths.expanded_set, &expansion.records)?;
    info!(
        path = %paths.expanded_set.display(),
        records = expansion.records.len(),
        "User records written"
    );

    let ruleset_name = ruleset_name_from_path(&cli.seedfile);
    let rules = generate_rules(&expansion.records, &ruleset_name, &file_config.rules);
    write_json_lines(&paths.rules, &rules)?;
    info!(
        path = %paths.rules.display(),
        updates = rules.len(),
        ruleset = %ruleset_name,
        "PowerTrack rules written"
    );

    Ok(())
}
