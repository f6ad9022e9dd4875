//! Command-line interface definitions for the speech tracker.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Network endpoints can also be provided via environment variables.

use clap::Parser;

use crate::api::DEFAULT_API_URL;

/// Command-line arguments for the speech tracker.
///
/// Every option has a default; a bare invocation fetches the listing,
/// merges it into `data/who_speeches.json` next to the executable, and
/// enriches any speech still missing its transcript.
///
/// # Examples
///
/// ```sh
/// # Default run
/// who_speech_tracker
///
/// # Keep the archive somewhere else and widen the window
/// who_speech_tracker --data-dir /var/lib/who_speeches --window-days 180
///
/// # Listing and merge only
/// who_speech_tracker --skip-enrich
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding the persisted speech archive (defaults to `data/`
    /// next to the executable)
    #[arg(short, long)]
    pub data_dir: Option<String>,

    /// Only keep freshly listed speeches published within this many days
    #[arg(long, default_value_t = 90)]
    pub window_days: i64,

    /// Speeches hub API endpoint
    #[arg(long, env = "WHO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL that detail page paths are resolved against
    #[arg(long, env = "WHO_BASE_URL", default_value = "https://www.who.int")]
    pub detail_base_url: String,

    /// Per-request timeout for detail page fetches, in seconds
    #[arg(long, default_value_t = 15)]
    pub detail_timeout_secs: u64,

    /// Skip the transcript enrichment pass
    #[arg(long)]
    pub skip_enrich: bool,
}
