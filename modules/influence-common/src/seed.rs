//! Seed set loading.

use std::collections::HashSet;
use std::path::Path;

use crate::error::InfluenceError;
use crate::types::Handle;

/// Parse seed file contents into a deduplicated handle list.
///
/// One handle per line; only the first token of a line counts. Blank lines
/// and repeats are dropped. Order of first appearance is kept so runs over
/// the same file query seeds in the same order.
pub fn parse_seed_set(contents: &str) -> Vec<Handle> {
    let mut seen = HashSet::new();
    contents
        .lines()
        .filter_map(Handle::parse)
        .filter(|h| seen.insert(h.clone()))
        .collect()
}

pub fn read_seed_set(path: &Path) -> Result<Vec<Handle>, InfluenceError> {
    let contents = std::fs::read_to_string(path)?;
    let seeds = parse_seed_set(&contents);
    tracing::info!(path = %path.display(), count = seeds.len(), "Read seed set");
    Ok(seeds)
}
