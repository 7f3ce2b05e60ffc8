//! Hyperlink discovery and rewriting
//!
//! Finds the anchors in a page, feeds unseen same-origin targets into the
//! crawl frontier, and reports the attribute rewrites pointing each href
//! at the local path its target maps to. The target does not need to
//! exist on disk yet: both sides compute the same deterministic path, so
//! the reference becomes valid when the target page is processed.

use crate::crawler::engine::CrawlContext;
use crate::url::{local_path, normalized, relative_href, same_origin};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// One hyperlink found in a page
#[derive(Debug, Clone)]
pub(crate) struct LinkRef {
    /// The href exactly as written in the document
    pub raw: String,
    /// The href resolved to an absolute URL
    pub url: Url,
}

/// Extracts hyperlinks from a page
///
/// Non-navigational schemes (mail, telephone, script, data) and pure
/// in-page fragment links are skipped. Malformed hrefs are skipped
/// silently and keep their original text.
pub(crate) fn discover_links(html: &str, page_url: &Url) -> Vec<LinkRef> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, page_url) {
                    links.push(LinkRef {
                        raw: href.to_string(),
                        url,
                    });
                }
            }
        }
    }

    links
}

/// Resolves an href to an absolute HTTP(S) URL
fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors stay as they are
    if href.starts_with('#') {
        return None;
    }

    match page_url.join(href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        _ => None,
    }
}

/// Processes every hyperlink on a page
///
/// Each resolvable href (same-origin or not) gets a rewrite entry for the
/// relative local path its target maps to. Same-origin targets that are
/// neither visited nor already queued are appended to the frontier.
///
/// # Returns
///
/// The rewrite map (href as written to relative local href).
pub(crate) fn process_links(
    ctx: &CrawlContext<'_>,
    html: &str,
    page_url: &Url,
    page_path: &Path,
) -> HashMap<String, String> {
    let mut rewrites = HashMap::new();

    for link in discover_links(html, page_url) {
        let key = normalized(&link.url);
        let Ok(target) = local_path(&key, ctx.origin, ctx.root) else {
            continue;
        };
        let Some(href) = relative_href(page_path, &target) else {
            continue;
        };

        rewrites.insert(link.raw, href);

        if same_origin(&key, ctx.origin) {
            ctx.state.enqueue(&key);
        }
    }

    rewrites
}
