use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// TOML-backed tunables. Every section and field is optional; missing
/// values fall back to the defaults below. Secrets stay as env vars.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FileConfig {
    pub expansion: ExpansionConfig,
    pub rules: RulesConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ExpansionConfig {
    /// Number of listeners kept after pass 1.
    pub listener_set_size: usize,
    /// Number of influencer candidates kept after pass 2.
    pub influencer_set_size: usize,
    /// Followers considered per seed handle.
    pub max_followers: usize,
    /// Followees considered per listener.
    pub max_friends: usize,
    /// Estimated size of the whole user population.
    pub num_total_users: f64,
    pub min_civic_odds_ratio: f64,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            listener_set_size: 100,
            influencer_set_size: 1000,
            max_followers: 100_000,
            max_friends: 100_000,
            num_total_users: 5e8,
            min_civic_odds_ratio: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RulesConfig {
    pub handles_per_rule: usize,
    /// Payload limit of the rules endpoint.
    pub max_rule_chars: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            handles_per_rule: 30,
            max_rule_chars: 2048,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ExportConfig {
    pub min_followers: u64,
    pub min_relevance: f64,
    pub max_rows: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            min_followers: 20,
            min_relevance: 200.0,
            max_rows: 500,
        }
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Load the config at `path`, or the defaults when no path was given.
pub fn load_config_or_default(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(p) => load_config(p),
        None => Ok(FileConfig::default()),
    }
}
