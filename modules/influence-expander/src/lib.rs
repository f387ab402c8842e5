pub mod expander;
pub mod export;
pub mod output;
pub mod rules;
mod tally;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use expander::{civic_odds_ratio, Expansion, ExpansionStats, GraphExpander, Pass, Scoring};
pub use export::{export_csv, select_rows, ExportStats};
pub use output::{read_json_lines, write_json_lines, OutputPaths};
pub use rules::{generate_rules, handles_to_rules, ruleset_name_from_path, Rule, RuleUpdate};
pub use traits::{RelationFetcher, TwitterFetcher};

/// Install the stderr log subscriber shared by the binaries.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
