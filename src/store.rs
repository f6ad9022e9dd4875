//! The persisted speech archive.
//!
//! A single JSON file holds every speech the tracker has ever seen, sorted
//! by publication date descending. Each run reads the whole file, appends
//! any genuinely new records from the fresh listing, and rewrites it at
//! most once. Single process, single writer; there is no cross-process
//! locking.
//!
//! # Corrupt or missing store
//!
//! A missing file is an empty archive. An unreadable or unparsable file is
//! also treated as empty. The condition is logged as a warning but never
//! surfaced as an error, so a damaged store heals itself on the next
//! successful run.

use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::dates;
use crate::models::SpeechRecord;

/// File name of the archive inside the data directory.
pub const STORE_FILE: &str = "who_speeches.json";

/// Full path of the archive file for a given data directory.
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// Load the archive, treating missing/corrupt files as empty.
pub async fn load_records(path: &Path) -> Vec<SpeechRecord> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read speech store; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Speech store is corrupt; starting empty");
            Vec::new()
        }
    }
}

/// Overwrite the archive with the full collection.
///
/// Human-readable two-space indentation; non-ASCII characters are written
/// literally, not escaped.
pub async fn write_records(path: &Path, records: &[SpeechRecord]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).await?;
    Ok(())
}

/// Select the fetched records not already present in `existing`.
///
/// Presence is keyed on `detail_url`. Duplicates within the fetched batch
/// itself are collapsed too, so the merge can never introduce a duplicate
/// key. Each new record is projected down to the three listing fields;
/// transcript text is only ever attached by the enricher.
pub fn merge_new(existing: &[SpeechRecord], fetched: Vec<SpeechRecord>) -> Vec<SpeechRecord> {
    let known: HashSet<&str> = existing.iter().map(|r| r.detail_url.as_str()).collect();

    fetched
        .into_iter()
        .filter(|record| !known.contains(record.detail_url.as_str()))
        .unique_by(|record| record.detail_url.clone())
        .map(|record| SpeechRecord {
            title: record.title,
            detail_url: record.detail_url,
            formatted_date: record.formatted_date,
            speech_text: None,
        })
        .collect()
}

/// Stable sort, newest first; unparsable dates sort last.
pub fn sort_by_date_desc(records: &mut [SpeechRecord]) {
    records.sort_by_key(|record| Reverse(dates::sort_key(&record.formatted_date)));
}

/// Merge freshly fetched records into the archive at `path`.
///
/// If any record is new the merged collection is re-sorted and the file is
/// overwritten once; if nothing is new the file is left untouched. Returns
/// the number of records added.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn merge_into_store(
    path: &Path,
    fetched: Vec<SpeechRecord>,
) -> Result<usize, Box<dyn Error>> {
    let existing = load_records(path).await;
    let new_records = merge_new(&existing, fetched);

    if new_records.is_empty() {
        info!(total = existing.len(), "No new speeches to add");
        return Ok(0);
    }

    let added = new_records.len();
    let mut merged = existing;
    merged.extend(new_records);
    sort_by_date_desc(&mut merged);

    write_records(path, &merged).await?;
    info!(added, total = merged.len(), "Added new speeches to store");

    Ok(added)
}
