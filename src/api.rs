//! Speeches hub API client.
//!
//! This module performs the listing stage of the pipeline: one GET against
//! the hub endpoint, which returns the 50 most recently published speeches
//! as a JSON envelope, followed by a recency filter over the parsed
//! publication dates.
//!
//! # Recency
//!
//! The filter takes `today` and `window_days` as explicit parameters rather
//! than reading the wall clock, so the cutoff is deterministic under test.
//! Records whose date fails to parse are excluded outright.
//!
//! # Failure
//!
//! Any network error or non-success HTTP status propagates to the caller
//! and aborts the run. Nothing has been written at this stage, so the
//! archive is left exactly as the previous successful run produced it.

use chrono::{Duration, NaiveDate};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument};

use crate::models::SpeechRecord;

/// The fixed speeches hub endpoint: English-culture speeches for the site,
/// ordered by publication date descending, selecting only the three fields
/// the archive keeps, top 50, JSON.
pub const DEFAULT_API_URL: &str = "https://www.who.int/api/hubs/speeches?sf_site=15210d59-ad60-47ff-a542-7ed76645f0c7&sf_provider=OpenAccessProvider&sf_culture=en&$orderby=PublicationDateAndTime%20desc&$select=Title,ItemDefaultUrl,FormatedDate&$format=json&$top=50";

/// The hub wraps its results in an OData-style envelope.
#[derive(Debug, Deserialize)]
struct SpeechEnvelope {
    #[serde(default)]
    value: Vec<SpeechRecord>,
}

/// Fetch the speech listing and keep only recently published entries.
///
/// Issues a single GET with `Accept: application/json`, fails the run on
/// any non-success status (no retry), and filters the envelope's `value`
/// array down to records published within the trailing window.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `api_url` - Hub endpoint (normally [`DEFAULT_API_URL`])
/// * `today` - Reference date for the recency window
/// * `window_days` - Trailing window size in days
///
/// # Returns
///
/// The filtered records in API response order (newest first).
#[instrument(level = "info", skip_all)]
pub async fn fetch_recent_speeches(
    client: &Client,
    api_url: &str,
    today: NaiveDate,
    window_days: i64,
) -> Result<Vec<SpeechRecord>, Box<dyn Error>> {
    let response = client
        .get(api_url)
        .header(ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?;

    let envelope: SpeechEnvelope = response.json().await?;
    let listed = envelope.value.len();

    let recent = filter_recent(envelope.value, today, window_days);
    info!(
        listed,
        recent = recent.len(),
        window_days,
        "Fetched speech listing"
    );
    debug!(urls = ?recent.iter().map(|r| r.detail_url.as_str()).collect::<Vec<_>>(), "Recent speech URLs");

    Ok(recent)
}

/// Keep records published within `window_days` of `today`, preserving order.
///
/// Records with an empty `detail_url` carry no identity and are dropped;
/// records whose date fails to parse are excluded from the window.
pub fn filter_recent(
    records: Vec<SpeechRecord>,
    today: NaiveDate,
    window_days: i64,
) -> Vec<SpeechRecord> {
    let cutoff = today - Duration::days(window_days);
    records
        .into_iter()
        .filter(|record| !record.detail_url.is_empty())
        .filter(|record| matches!(record.parsed_date(), Some(date) if date >= cutoff))
        .collect()
}
