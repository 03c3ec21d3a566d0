//! TLD list generator.
//!
//! Offline tooling that rebuilds the embedded asset (`data/tlds.txt`) from
//! IANA's registry of top-level domains. The matcher never calls into this
//! module; a failed regeneration only means the embedded list stays as it is.
//!
//! The pipeline is:
//!
//! 1. [`fetch_registry`] downloads the registry text.
//! 2. [`parse_registry`] drops the header line and blank lines.
//! 3. [`decode_tlds`] lowercases and IDNA-decodes every entry, several at a
//!    time, and sorts the result.
//! 4. [`render_tld_list`] writes the one-per-line asset format.
//!
//! # Examples
//!
//! ```
//! use url_regex_safe_lib::generate::{parse_registry, render_tld_list};
//!
//! let raw = parse_registry("# Version 2024010100\nCOM\n\nXN--P1AI\n");
//! assert_eq!(raw, vec!["COM", "XN--P1AI"]);
//! assert_eq!(render_tld_list(&["com".to_string()]), "com\n");
//! ```

use crate::error::UrlRegexError;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};

/// IANA's list of delegated top-level domains.
pub const IANA_TLD_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

/// Default HTTP timeout for fetching the registry.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of entries decoded at the same time.
pub const DEFAULT_DECODE_CONCURRENCY: usize = 16;

/// Settings for a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Registry URL
    pub url: String,

    /// HTTP timeout for the registry download
    pub timeout: Duration,

    /// Maximum number of decode units in flight
    pub concurrency: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            url: IANA_TLD_URL.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            concurrency: DEFAULT_DECODE_CONCURRENCY,
        }
    }
}

impl GenerateConfig {
    /// Fetch from a different registry URL.
    pub fn with_url<U: Into<String>>(mut self, url: U) -> Self {
        self.url = url.into();
        self
    }

    /// Set the download timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set decode concurrency. Clamped to 1..=256.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 256);
        self
    }
}

/// Download the registry text.
///
/// # Errors
///
/// `NetworkError` on connection failures, timeouts and non-2xx responses.
pub async fn fetch_registry(url: &str, timeout: Duration) -> Result<String, UrlRegexError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("url-regex-safe/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            UrlRegexError::network_with_source("Failed to create HTTP client", e.to_string())
        })?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(UrlRegexError::network(format!(
            "TLD registry returned HTTP {}",
            response.status()
        )));
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), %url, "fetched TLD registry");
    Ok(body)
}

/// Split the registry text into raw entries.
///
/// The first line is a version header and is always discarded, as are blank
/// lines. Entries are returned as-is apart from surrounding whitespace.
pub fn parse_registry(text: &str) -> Vec<String> {
    text.lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase and IDNA-decode one registry entry.
pub fn decode_entry(raw: &str) -> Result<String, UrlRegexError> {
    let lower = raw.to_lowercase();
    let (decoded, result) = idna::domain_to_unicode(&lower);

    if let Err(errors) = result {
        return Err(UrlRegexError::decode(raw, format!("{:?}", errors)));
    }
    if decoded.is_empty() {
        return Err(UrlRegexError::decode(raw, "decoded to an empty label"));
    }

    Ok(decoded)
}

/// Decode every entry with at most `concurrency` units in flight.
///
/// Each entry is decoded on the blocking pool, independently of the others.
/// The first failure ends the whole operation: units not yet started are
/// never spawned and results of units already running are discarded. The
/// output is sorted and deduplicated, so completion order does not matter.
pub async fn decode_tlds(
    raw: Vec<String>,
    concurrency: usize,
) -> Result<Vec<String>, UrlRegexError> {
    let total = raw.len();

    let mut decoded: Vec<String> = stream::iter(raw)
        .map(|entry| async move {
            tokio::task::spawn_blocking(move || decode_entry(&entry))
                .await
                .map_err(|e| UrlRegexError::internal(format!("decode task failed: {}", e)))?
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    decoded.sort();
    decoded.dedup();

    debug!(total, decoded = decoded.len(), "decoded TLD entries");
    Ok(decoded)
}

/// Render TLDs in the asset format read by [`crate::tlds::parse_tld_list`].
pub fn render_tld_list(tlds: &[String]) -> String {
    let mut out = String::with_capacity(tlds.iter().map(|t| t.len() + 1).sum());
    for tld in tlds {
        out.push_str(tld);
        out.push('\n');
    }
    out
}

/// Run the whole pipeline: fetch, parse and decode.
pub async fn generate_tlds(config: &GenerateConfig) -> Result<Vec<String>, UrlRegexError> {
    let span = info_span!("generate_tlds", url = %config.url);

    async {
        let text = fetch_registry(&config.url, config.timeout).await?;
        let raw = parse_registry(&text);
        info!(entries = raw.len(), "parsed TLD registry");

        let tlds = decode_tlds(raw, config.concurrency).await?;
        info!(tlds = tlds.len(), "generated TLD list");
        Ok(tlds)
    }
    .instrument(span)
    .await
}
