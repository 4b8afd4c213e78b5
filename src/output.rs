use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::model::PlaceRecord;

const PLACES_FILE: &str = "places.json";

/// Write the collection to `<out>/places.json`. With `append`, records
/// already present keep priority: new records are only added for pages the
/// existing file does not cover.
pub fn write_places(
    out_dir: &Path,
    records: Vec<PlaceRecord>,
    append: bool,
) -> Result<(PathBuf, usize)> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(PLACES_FILE);

    let merged = if append && path.exists() {
        let existing = read_places(out_dir)?;
        let seen: HashSet<usize> = existing.iter().map(|r| r.pdf_page).collect();
        let added: Vec<PlaceRecord> = records
            .into_iter()
            .filter(|r| !seen.contains(&r.pdf_page))
            .collect();
        info!("appending {} new records to {} existing", added.len(), existing.len());
        existing.into_iter().chain(added).collect()
    } else {
        records
    };

    let json = serde_json::to_string_pretty(&merged)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    let count = merged.len();
    Ok((path, count))
}

pub fn read_places(out_dir: &Path) -> Result<Vec<PlaceRecord>> {
    let path = out_dir.join(PLACES_FILE);
    let json =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<PlaceRecord> =
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
    Ok(records)
}
