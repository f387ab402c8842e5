use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Where a run over a seed file writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub expanded_set: PathBuf,
    pub rules: PathBuf,
}

impl OutputPaths {
    /// `seed_sets/boston.txt` under `.` → `./seed_sets/boston.expanded_set.json`
    /// and `./seed_sets/boston.powertrack_rules.json`.
    pub fn from_seed_file(seed_file: &Path, output_dir: &Path) -> Self {
        let seed = seed_file.to_string_lossy().into_owned();
        let base = seed.strip_suffix(".txt").unwrap_or(seed.as_str());
        let base = output_dir.join(base);
        let with_suffix = |suffix: &str| {
            let mut name = base.clone().into_os_string();
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            expanded_set: with_suffix(".expanded_set.json"),
            rules: with_suffix(".powertrack_rules.json"),
        }
    }
}

/// Write one compact JSON object per line.
pub fn write_json_lines<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read a JSON-lines file, skipping blank lines. Any unparseable line is an error.
pub fn read_json_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut items = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid record", path.display(), lineno + 1))?;
        items.push(item);
    }
    Ok(items)
}
