//! Mapping from URLs to local paths within a job's working area
//!
//! The mapping is a pure function of (URL, job origin, working-area root).
//! Both sides of a reference rely on this: a page can compute the path a
//! link target will receive before that target has been fetched, and the
//! target lands on exactly that path when its own turn comes.

use crate::url::same_origin;
use crate::UrlError;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Maps a URL to its deterministic local path under the working-area root
///
/// # Mapping Rules
///
/// - Directory-style URLs (path ends in `/`) map to `index.html` under the
///   mirrored directory
/// - Extensionless paths gain an `.html` suffix
/// - Everything else preserves its path as-is
/// - URLs outside the job's origin are routed under `assets/<host>/...` so
///   they cannot collide with same-origin paths
///
/// Percent-encoded path segments are decoded for the on-disk layout; the
/// hrefs written back into documents re-encode them.
///
/// # Arguments
///
/// * `url` - The URL to map
/// * `origin` - The job's site origin
/// * `root` - The working-area root directory
///
/// # Returns
///
/// * `Ok(PathBuf)` - The local path the URL maps to
/// * `Err(UrlError)` - The URL has no host
pub fn local_path(url: &Url, origin: &Url, root: &Path) -> Result<PathBuf, UrlError> {
    let host = url.host_str().ok_or(UrlError::MissingHost)?;

    let mut path = if same_origin(url, origin) {
        root.to_path_buf()
    } else {
        root.join("assets").join(host)
    };

    let raw_path = url.path();
    let segments: Vec<String> = raw_path
        .split('/')
        .filter_map(decode_segment)
        .collect();

    match segments.split_last() {
        Some((last, dirs)) if !raw_path.ends_with('/') => {
            for segment in dirs {
                path.push(segment);
            }
            if last.contains('.') {
                path.push(last);
            } else {
                path.push(format!("{}.html", last));
            }
        }
        Some(_) => {
            for segment in &segments {
                path.push(segment);
            }
            path.push("index.html");
        }
        None => path.push("index.html"),
    }

    Ok(path)
}

/// Computes the URL-encoded href from one mapped file to another
///
/// The href is relative to the directory containing `from_page`, uses `/`
/// separators regardless of platform, and percent-encodes each segment.
///
/// Returns None if the relative path cannot be computed.
pub fn relative_href(from_page: &Path, to_target: &Path) -> Option<String> {
    let from_dir = from_page.parent()?;
    let diff = pathdiff::diff_paths(to_target, from_dir)?;

    let mut segments = Vec::new();
    for component in diff.components() {
        match component {
            Component::ParentDir => segments.push("..".to_string()),
            Component::Normal(os) => {
                let segment = os.to_string_lossy();
                segments.push(urlencoding::encode(&segment).into_owned());
            }
            Component::CurDir => {}
            // Absolute components mean the diff escaped the tree
            _ => return None,
        }
    }

    if segments.is_empty() {
        return None;
    }

    Some(segments.join("/"))
}

/// Decodes one path segment for the on-disk layout
///
/// Empty segments and dot segments are dropped: decoded segments must stay
/// inside the working area.
fn decode_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    match decoded.as_str() {
        "" | "." | ".." => None,
        _ => Some(decoded),
    }
}
