//! Asset discovery and localization
//!
//! Finds the assets a page references (stylesheets, scripts, images, media
//! sources), downloads each exactly once per job, stores it at its mapped
//! path, and reports the attribute rewrites that point the page at the
//! local copies. A failed asset is logged and its reference left alone;
//! neither the page nor the job is aborted for it.

use crate::crawler::engine::CrawlContext;
use crate::fetch::{self, FetchKind};
use crate::url::{local_path, normalized, relative_href};
use futures::future::join_all;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use url::Url;

/// The tag/attribute pairs considered asset references
const ASSET_SELECTORS: &[(&str, &str)] = &[
    ("link[rel~=\"stylesheet\"][href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
    ("source[src]", "src"),
];

/// One asset reference found in a page
#[derive(Debug, Clone)]
pub(crate) struct AssetRef {
    /// The attribute value exactly as written in the document
    pub raw: String,
    /// The reference resolved to an absolute URL
    pub url: Url,
}

/// Extracts asset references from a page
///
/// Inline data URIs are rejected, protocol-relative references resolve to
/// https, and relative references resolve against the page URL. Duplicate
/// attribute values are reported once.
pub(crate) fn discover_assets(html: &str, page_url: &Url) -> Vec<AssetRef> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut refs = Vec::new();

    for (selector_str, attr) in ASSET_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                if let Some(url) = resolve_asset(value, page_url) {
                    if seen.insert(value.to_string()) {
                        refs.push(AssetRef {
                            raw: value.to_string(),
                            url,
                        });
                    }
                }
            }
        }
    }

    refs
}

/// Resolves an asset reference to an absolute HTTP(S) URL
fn resolve_asset(raw: &str, page_url: &Url) -> Option<Url> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with("data:") {
        return None;
    }

    // Protocol-relative references always resolve to the secure form
    let resolved = if let Some(rest) = raw.strip_prefix("//") {
        Url::parse(&format!("https://{}", rest)).ok()?
    } else {
        page_url.join(raw).ok()?
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Localizes every asset a page references
///
/// Every resolvable reference gets a rewrite entry pointing at the path
/// its URL maps to, whether or not this page is the one that downloads
/// it; the mapping is deterministic, so the entry is correct even while
/// another page's download of the same URL is still in flight or has
/// already failed. URLs not yet claimed in the visited-assets set are
/// fetched here, in waves of the page-level wave size.
///
/// # Returns
///
/// The rewrite map (attribute value as written to relative local href)
/// and the total bytes downloaded for this page's newly claimed assets.
pub(crate) async fn localize_assets(
    ctx: &CrawlContext<'_>,
    html: &str,
    page_url: &Url,
    page_path: &Path,
) -> (HashMap<String, String>, u64) {
    let mut rewrites = HashMap::new();
    let mut claimed: Vec<(String, Url, PathBuf)> = Vec::new();

    for asset in discover_assets(html, page_url) {
        let key = normalized(&asset.url);
        let Ok(target) = local_path(&key, ctx.origin, ctx.root) else {
            continue;
        };
        let Some(href) = relative_href(page_path, &target) else {
            continue;
        };

        rewrites.insert(asset.raw.clone(), href);

        if ctx.state.claim_asset(&key) {
            claimed.push((asset.raw, key, target));
        }
    }

    let mut downloaded = 0u64;
    for wave in claimed.chunks(ctx.config.wave_size) {
        let fetches = wave.iter().map(|(raw, url, target)| async move {
            match fetch::fetch(ctx.client, url, FetchKind::Asset, ctx.config).await {
                Ok(bytes) => match store_asset(target, &bytes).await {
                    Ok(()) => (None, bytes.len() as u64),
                    Err(e) => {
                        tracing::warn!("Failed to store asset {}: {}", url, e);
                        (Some(raw.as_str()), 0)
                    }
                },
                Err(e) => {
                    tracing::warn!("Skipping asset: {}", e);
                    (Some(raw.as_str()), 0)
                }
            }
        });

        for (failed, bytes) in join_all(fetches).await {
            if let Some(raw) = failed {
                // The reference stays as the author wrote it
                rewrites.remove(raw);
            }
            downloaded += bytes;
        }
    }

    (rewrites, downloaded)
}

/// Writes asset bytes at the mapped path, creating parent directories
async fn store_asset(target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(target, bytes).await
}
