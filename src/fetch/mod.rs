//! HTTP fetching with retry and backoff
//!
//! This module wraps the HTTP client for both page and asset retrieval:
//! - Builds the shared client with proper user agent and compression
//! - Applies per-kind timeouts (pages wait longer than assets)
//! - Streams bodies so the byte ceiling can cut off oversized responses
//! - Retries transient failures with exponentially increasing delay
//!
//! An oversized response is reported as the same failure kind as a network
//! error and retried identically; successful-but-too-large responses are
//! rare enough that they do not get a fast-fail path.

use crate::config::CrawlerConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A resource fetch that exhausted its attempts
#[derive(Debug, Error)]
#[error("Fetch failed for {url}: {reason}")]
pub struct FetchFailed {
    /// The URL that could not be retrieved
    pub url: String,
    /// Description of the final attempt's failure
    pub reason: String,
}

/// Selects the timeout profile for a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// An HTML page on the crawl frontier
    Page,
    /// A referenced asset (stylesheet, script, image, media source)
    Asset,
}

impl FetchKind {
    fn timeout(self, config: &CrawlerConfig) -> Duration {
        match self {
            FetchKind::Page => Duration::from_secs(config.page_timeout_secs),
            FetchKind::Asset => Duration::from_secs(config.asset_timeout_secs),
        }
    }
}

/// Builds the HTTP client shared by all fetches within a job
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("webflow-mirror/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying transient failures with backoff
///
/// Attempts up to `retry_attempts` fetches. The delay before the first
/// retry is `retry_base_delay_ms` and doubles for each further retry.
/// Only the final attempt's failure is surfaced; earlier ones are logged
/// at debug level.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `kind` - Selects the page or asset timeout
/// * `config` - Crawl configuration (retry and ceiling settings)
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The response body
/// * `Err(FetchFailed)` - All attempts failed
pub async fn fetch(
    client: &Client,
    url: &Url,
    kind: FetchKind,
    config: &CrawlerConfig,
) -> Result<Vec<u8>, FetchFailed> {
    let mut delay = Duration::from_millis(config.retry_base_delay_ms);

    for attempt in 1..=config.retry_attempts {
        match fetch_once(client, url, kind, config).await {
            Ok(body) => return Ok(body),
            Err(reason) => {
                if attempt == config.retry_attempts {
                    return Err(FetchFailed {
                        url: url.to_string(),
                        reason,
                    });
                }
                tracing::debug!(
                    "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                    attempt,
                    config.retry_attempts,
                    url,
                    reason,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }

    // retry_attempts >= 1 is enforced by config validation
    Err(FetchFailed {
        url: url.to_string(),
        reason: "no fetch attempts configured".to_string(),
    })
}

/// Performs a single fetch attempt
async fn fetch_once(
    client: &Client,
    url: &Url,
    kind: FetchKind,
    config: &CrawlerConfig,
) -> Result<Vec<u8>, String> {
    let mut response = client
        .get(url.clone())
        .timeout(kind.timeout(config))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    let ceiling = config.max_content_bytes;
    if let Some(length) = response.content_length() {
        if length > ceiling {
            return Err(format!(
                "declared length {} exceeds the {} byte ceiling",
                length, ceiling
            ));
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
        body.extend_from_slice(&chunk);
        if body.len() as u64 > ceiling {
            return Err(format!("response exceeded the {} byte ceiling", ceiling));
        }
    }

    Ok(body)
}
