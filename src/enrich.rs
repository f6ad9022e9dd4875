//! Transcript enrichment from speech detail pages.
//!
//! The second pass of the pipeline: every archived speech that doesn't yet
//! carry transcript text gets its detail page fetched and the transcript
//! scraped out of the article body. Pages are fetched one at a time and
//! each failure is isolated: a timeout or a missing content block leaves
//! that one record unchanged (it is retried on the next run) without
//! touching the rest of the batch.
//!
//! # Architecture
//!
//! Fetching goes through the [`FetchPage`] trait rather than a concrete
//! client, so tests can inject canned pages and simulated failures:
//! - [`FetchPage`]: core trait for retrieving a page body by URL
//! - [`HttpFetcher`]: reqwest-backed implementation with a bounded
//!   per-request timeout
//!
//! # Extraction
//!
//! The transcript lives in the page's `<article>` wrapper, inside its
//! first `<div>` content block. Every paragraph in that block is kept,
//! whitespace-normalized, and joined with blank lines.

use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::models::SpeechRecord;
use crate::store;
use crate::utils::{normalize_whitespace, truncate_for_log};

static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("div").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Trait for fetching a page body by URL.
///
/// Implementors return the raw response body as text. The enricher only
/// depends on this trait, which keeps the per-record failure handling
/// testable without a live server.
pub trait FetchPage {
    /// Fetch `url` and return the response body.
    async fn fetch_page(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// HTTP implementation of [`FetchPage`] with a per-request timeout.
///
/// Detail pages are bulky compared to the listing payload, so every
/// request carries its own timeout (15 seconds by default from the CLI).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Wrap a shared client with a per-request timeout bound.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl FetchPage for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Extract the transcript text from a detail page body.
///
/// Locates the `<article>` wrapper, then its first `<div>` content block,
/// and concatenates the text of every paragraph inside it. Each paragraph
/// is collapsed to single-space whitespace and paragraphs are separated by
/// a blank line. Returns `None` when the wrapper or content block is
/// absent, or when no paragraph carries any text.
pub fn extract_speech_text(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let article = document.select(&ARTICLE_SELECTOR).next()?;
    let content = article.select(&CONTENT_SELECTOR).next()?;

    let paragraphs: Vec<String> = content
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| normalize_whitespace(&p.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

/// Resolve, fetch, and extract one speech's transcript.
///
/// Every failure mode is logged and mapped to `None` so the caller's batch
/// keeps going.
async fn fetch_speech_text(
    fetcher: &impl FetchPage,
    base: &Url,
    record: &SpeechRecord,
) -> Option<String> {
    let url = match record.detail_page_url(base) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, detail_url = %record.detail_url, "Could not resolve detail page URL; skipping");
            return None;
        }
    };

    match fetcher.fetch_page(url.as_str()).await {
        Ok(body) => match extract_speech_text(&body) {
            Some(text) => {
                debug!(url = %url, preview = %truncate_for_log(&text, 120), "Extracted transcript");
                Some(text)
            }
            None => {
                warn!(url = %url, "Detail page missing expected article content; skipping");
                None
            }
        },
        Err(e) => {
            error!(error = %e, url = %url, "Detail page fetch failed");
            None
        }
    }
}

/// Enrich every archived speech that still lacks transcript text.
///
/// Reloads the archive, fetches pending detail pages sequentially, and
/// rewrites the file once if at least one record gained text. A fully
/// enriched archive performs no network requests and leaves the file
/// untouched.
///
/// # Returns
///
/// The number of records that gained transcript text this run.
#[instrument(level = "info", skip_all, fields(%base_url))]
pub async fn enrich_store(
    path: &Path,
    fetcher: &impl FetchPage,
    base_url: &str,
) -> Result<usize, Box<dyn Error>> {
    let base = Url::parse(base_url)?;
    let mut records = store::load_records(path).await;

    let pending: Vec<(usize, SpeechRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| !record.has_speech_text())
        .map(|(i, record)| (i, record.clone()))
        .collect();

    if pending.is_empty() {
        info!(total = records.len(), "All stored speeches already carry transcript text");
        return Ok(0);
    }
    info!(
        pending = pending.len(),
        total = records.len(),
        "Fetching transcripts for speeches without text"
    );

    // One page at a time; detail fetches are never issued concurrently.
    let results: Vec<(usize, Option<String>)> = stream::iter(pending)
        .then(|(i, record)| {
            let base = base.clone();
            async move { (i, fetch_speech_text(fetcher, &base, &record).await) }
        })
        .collect()
        .await;

    let mut updated = 0;
    for (i, text) in results {
        if let Some(text) = text {
            records[i].speech_text = Some(text);
            updated += 1;
        }
    }

    if updated > 0 {
        store::write_records(path, &records).await?;
        info!(updated, total = records.len(), "Wrote enriched speech store");
    } else {
        info!("No speeches enriched this run");
    }

    Ok(updated)
}
