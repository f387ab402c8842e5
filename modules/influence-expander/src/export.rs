//! Spreadsheet export of an expanded set.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use influence_common::{ExportConfig, InfluencerRecord};

pub const CSV_HEADER: [&str; 6] = [
    "Screen name",
    "Display name",
    "Location",
    "Followers",
    "Relevance",
    "Description",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub read: usize,
    pub malformed: usize,
    /// Records below either threshold.
    pub filtered: usize,
    /// Records that passed both thresholds but fell past `max_rows`.
    pub truncated: usize,
    pub written: usize,
}

/// Keep the popular and relevant records, most-followed first, capped at
/// `max_rows`. Records without a ratio never pass.
pub fn select_rows(
    mut records: Vec<InfluencerRecord>,
    config: &ExportConfig,
) -> Vec<InfluencerRecord> {
    records.retain(|r| passes_thresholds(r, config));
    rank_and_cap(&mut records, config.max_rows);
    records
}

fn passes_thresholds(record: &InfluencerRecord, config: &ExportConfig) -> bool {
    record.user.followers_count >= config.min_followers
        && record
            .civic_odds_ratio
            .is_some_and(|ratio| ratio >= config.min_relevance)
}

fn rank_and_cap(records: &mut Vec<InfluencerRecord>, max_rows: usize) {
    records.sort_by(|a, b| b.user.followers_count.cmp(&a.user.followers_count));
    records.truncate(max_rows);
}

/// Read JSON-lines records from `input` and write the selected rows as CSV.
/// Blank and unparseable lines are skipped.
pub fn export_csv<R: BufRead, W: Write>(
    input: R,
    output: W,
    config: &ExportConfig,
) -> Result<ExportStats> {
    let mut stats = ExportStats::default();
    let mut records = Vec::new();

    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        stats.read += 1;
        match serde_json::from_str::<InfluencerRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "Skipping malformed record");
                stats.malformed += 1;
            }
        }
    }

    let parsed = records.len();
    records.retain(|r| passes_thresholds(r, config));
    stats.filtered = parsed - records.len();
    let passed = records.len();
    rank_and_cap(&mut records, config.max_rows);
    stats.truncated = passed - records.len();
    let rows = records;

    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(CSV_HEADER)?;
    for row in &rows {
        let user = &row.user;
        let followers = user.followers_count.to_string();
        // Debug keeps the fractional part of whole ratios: `250.0`, not `250`.
        let relevance = row
            .civic_odds_ratio
            .map(|r| format!("{:?}", r))
            .unwrap_or_default();
        writer.write_record([
            user.screen_name.as_str(),
            user.name.as_str(),
            user.location.as_deref().unwrap_or(""),
            followers.as_str(),
            relevance.as_str(),
            user.description.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    stats.written = rows.len();

    info!(
        read = stats.read,
        malformed = stats.malformed,
        filtered = stats.filtered,
        truncated = stats.truncated,
        written = stats.written,
        "CSV export complete"
    );
    Ok(stats)
}
