//! Single-page processing
//!
//! One page moves through a fixed sequence: fetch, asset localization,
//! link rewriting, then a single streaming rewrite pass that applies the
//! combined attribute substitutions before the page is serialized to its
//! mapped path. Discovery reads the document with scraper; the rewrite
//! itself streams through lol_html so the original markup survives
//! untouched except for the substituted attributes.

use crate::crawler::assets::localize_assets;
use crate::crawler::engine::CrawlContext;
use crate::crawler::links::process_links;
use crate::fetch::{self, FetchKind};
use crate::url::local_path;
use crate::{MirrorError, Result};
use lol_html::html_content::Element;
use lol_html::{element, HtmlRewriter, Settings};
use std::collections::HashMap;
use url::Url;

/// Fetches, localizes, rewrites, and serializes one page
///
/// # Returns
///
/// The page's byte contribution to the job: the serialized markup plus
/// every asset newly downloaded for this page. Errors here are caught by
/// the wave that dispatched the page and count as zero contribution.
pub(crate) async fn process_page(ctx: &CrawlContext<'_>, url: &Url) -> Result<u64> {
    let body = fetch::fetch(ctx.client, url, FetchKind::Page, ctx.config).await?;
    let html = String::from_utf8_lossy(&body).into_owned();

    let page_path = local_path(url, ctx.origin, ctx.root)?;

    let (mut rewrites, asset_bytes) = localize_assets(ctx, &html, url, &page_path).await;
    rewrites.extend(process_links(ctx, &html, url, &page_path));

    let rewritten = rewrite_document(&html, &rewrites)?;

    if let Some(parent) = page_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&page_path, &rewritten).await?;

    tracing::debug!(
        "Mirrored {} ({} bytes of markup, {} bytes of assets)",
        url,
        rewritten.len(),
        asset_bytes
    );

    Ok(rewritten.len() as u64 + asset_bytes)
}

/// Applies the combined rewrite map in one streaming pass
///
/// An attribute is replaced only when its value matches a map key exactly;
/// everything else in the document passes through unchanged.
fn rewrite_document(html: &str, rewrites: &HashMap<String, String>) -> Result<String> {
    if rewrites.is_empty() {
        return Ok(html.to_string());
    }

    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("a[href]", |el| substitute(el, "href", rewrites)),
                element!("link[href]", |el| substitute(el, "href", rewrites)),
                element!("script[src]", |el| substitute(el, "src", rewrites)),
                element!("img[src]", |el| substitute(el, "src", rewrites)),
                element!("source[src]", |el| substitute(el, "src", rewrites)),
            ],
            ..Settings::default()
        },
        |chunk: &[u8]| output.extend_from_slice(chunk),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| MirrorError::Internal(format!("HTML rewrite error: {e}")))?;
    rewriter
        .end()
        .map_err(|e| MirrorError::Internal(format!("HTML rewrite finalization error: {e}")))?;

    String::from_utf8(output)
        .map_err(|e| MirrorError::Internal(format!("rewritten HTML is not UTF-8: {e}")))
}

/// Replaces one attribute value if the rewrite map has an entry for it
fn substitute(
    el: &mut Element,
    attr: &str,
    rewrites: &HashMap<String, String>,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(value) = el.get_attribute(attr) {
        if let Some(replacement) = rewrites.get(&value) {
            el.set_attribute(attr, replacement)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_anchor_href() {
        let html = r#"<a href="/about">About</a>"#;
        let mut rewrites = HashMap::new();
        rewrites.insert("/about".to_string(), "about.html".to_string());

        let result = rewrite_document(html, &rewrites).unwrap();
        assert!(result.contains(r#"href="about.html""#));
    }

    #[test]
    fn test_rewrite_stylesheet_and_script() {
        let html = r#"
            <link rel="stylesheet" href="/css/site.css">
            <script src="/js/app.js"></script>
        "#;
        let mut rewrites = HashMap::new();
        rewrites.insert("/css/site.css".to_string(), "css/site.css".to_string());
        rewrites.insert("/js/app.js".to_string(), "js/app.js".to_string());

        let result = rewrite_document(html, &rewrites).unwrap();
        assert!(result.contains(r#"href="css/site.css""#));
        assert!(result.contains(r#"src="js/app.js""#));
    }

    #[test]
    fn test_unmatched_reference_left_alone() {
        let html = r#"<a href="https://elsewhere.example.com/">Away</a>"#;
        let mut rewrites = HashMap::new();
        rewrites.insert("/about".to_string(), "about.html".to_string());

        let result = rewrite_document(html, &rewrites).unwrap();
        assert!(result.contains(r#"href="https://elsewhere.example.com/""#));
    }

    #[test]
    fn test_other_attributes_preserved() {
        let html = r#"<a href="/about" class="nav-link" id="about-link">About</a>"#;
        let mut rewrites = HashMap::new();
        rewrites.insert("/about".to_string(), "about.html".to_string());

        let result = rewrite_document(html, &rewrites).unwrap();
        assert!(result.contains(r#"href="about.html""#));
        assert!(result.contains(r#"class="nav-link""#));
        assert!(result.contains(r#"id="about-link""#));
    }

    #[test]
    fn test_empty_map_returns_input() {
        let html = r#"<p>No references here</p>"#;
        let result = rewrite_document(html, &HashMap::new()).unwrap();
        assert_eq!(result, html);
    }

    #[test]
    fn test_surrounding_markup_untouched() {
        let html = r#"<div><a href="/a">A</a><p>text &amp; more</p></div>"#;
        let mut rewrites = HashMap::new();
        rewrites.insert("/a".to_string(), "a.html".to_string());

        let result = rewrite_document(html, &rewrites).unwrap();
        assert!(result.contains(r#"<p>text &amp; more</p>"#));
    }
}
