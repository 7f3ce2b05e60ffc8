use crate::UrlError;
use url::Url;

/// Normalizes a URL string into the identity key used for frontier and
/// visited-set membership
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject non-HTTP(S) schemes
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after #)
/// 5. Remove the query string
///
/// Two URLs that differ only in fragment or query are the same page for
/// traversal purposes, so they must normalize to the same key.
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse or normalize the URL
pub fn normalize_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(normalized(&url))
}

/// Strips fragment and query from an already-parsed URL
pub fn normalized(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url.set_query(None);
    url
}

/// Checks whether two URLs share an origin (scheme, host, and port)
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.webflow.io/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.webflow.io/page");
    }

    #[test]
    fn test_remove_query() {
        let result = normalize_url("https://example.webflow.io/page?utm_source=x&b=2").unwrap();
        assert_eq!(result.as_str(), "https://example.webflow.io/page");
    }

    #[test]
    fn test_remove_fragment_and_query() {
        let result = normalize_url("https://example.webflow.io/page?a=1#top").unwrap();
        assert_eq!(result.as_str(), "https://example.webflow.io/page");
    }

    #[test]
    fn test_plain_url_unchanged() {
        let result = normalize_url("https://example.webflow.io/about").unwrap();
        assert_eq!(result.as_str(), "https://example.webflow.io/about");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.webflow.io").unwrap();
        assert_eq!(result.as_str(), "https://example.webflow.io/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.webflow.io/page");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url");
        assert!(result.is_err());
    }

    #[test]
    fn test_same_origin_matches() {
        let a = Url::parse("https://example.webflow.io/a").unwrap();
        let b = Url::parse("https://example.webflow.io/b?q=1").unwrap();
        assert!(same_origin(&a, &b));
    }

    #[test]
    fn test_same_origin_rejects_other_host() {
        let a = Url::parse("https://example.webflow.io/a").unwrap();
        let b = Url::parse("https://cdn.example.com/a").unwrap();
        assert!(!same_origin(&a, &b));
    }

    #[test]
    fn test_same_origin_rejects_other_port() {
        let a = Url::parse("http://127.0.0.1:8001/").unwrap();
        let b = Url::parse("http://127.0.0.1:8002/").unwrap();
        assert!(!same_origin(&a, &b));
    }

    #[test]
    fn test_same_origin_rejects_other_scheme() {
        let a = Url::parse("http://example.webflow.io/").unwrap();
        let b = Url::parse("https://example.webflow.io/").unwrap();
        assert!(!same_origin(&a, &b));
    }

    #[test]
    fn test_normalized_is_idempotent() {
        let url = normalize_url("https://example.webflow.io/page?a=1#top").unwrap();
        assert_eq!(normalized(&url), url);
    }
}
