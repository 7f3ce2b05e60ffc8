//! Job lifecycle
//!
//! A job is one mirror execution: target validation, a uuid-named working
//! area under the configured root, the crawl itself, and archive emission.
//! The working area is erased when the job value drops, whether or not an
//! archive was delivered; a job that fails leaves nothing behind.

use crate::config::Config;
use crate::url::normalize_url;
use crate::{archive, crawler, fetch};
use crate::{MirrorError, Result, UrlError};
use std::path::PathBuf;
use url::Url;
use uuid::Uuid;

/// One mirror execution
#[derive(Debug)]
pub struct Job {
    /// The validated, normalized target URL
    pub target: Url,
    /// The site origin every crawled page must share
    pub origin: Url,
    /// The target's hostname
    pub host: String,
    /// Working-area identifier
    pub id: String,
    /// The job's working area on disk
    pub workdir: PathBuf,
    /// Running total of bytes written (markup plus assets)
    pub bytes_total: u64,
}

impl Job {
    /// Creates a job and its empty working area
    ///
    /// # Arguments
    ///
    /// * `target` - The already-validated target URL
    /// * `config` - Mirror configuration (working-area root)
    ///
    /// # Returns
    ///
    /// * `Ok(Job)` - Working area created
    /// * `Err(MirrorError)` - Working-area creation failed
    pub fn create(target: Url, config: &Config) -> Result<Self> {
        let host = target
            .host_str()
            .ok_or(UrlError::MissingHost)?
            .to_string();

        let mut origin = target.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);

        let id = Uuid::new_v4().to_string();
        let workdir = config.workspace.root.join(&id);
        std::fs::create_dir_all(&workdir)?;

        tracing::debug!("Created working area {}", workdir.display());

        Ok(Self {
            target,
            origin,
            host,
            id,
            workdir,
            bytes_total: 0,
        })
    }
}

impl Drop for Job {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.workdir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove working area {}: {}",
                    self.workdir.display(),
                    e
                );
            }
        }
    }
}

/// Validates a target URL before any work starts
///
/// Rejects malformed URLs and hosts that do not end in one of the
/// configured suffixes (case-sensitive match). No working area exists
/// until validation has passed.
pub fn validate_target(raw: &str, config: &Config) -> Result<Url> {
    let url = normalize_url(raw).map_err(|e| MirrorError::InvalidTarget(e.to_string()))?;

    let host = url
        .host_str()
        .ok_or_else(|| MirrorError::InvalidTarget("URL has no host".to_string()))?;

    let allowed = config
        .site
        .allowed_host_suffixes
        .iter()
        .any(|suffix| host.ends_with(suffix.as_str()));

    if !allowed {
        return Err(MirrorError::HostNotAllowed {
            host: host.to_string(),
        });
    }

    Ok(url)
}

/// Runs one mirror job from validation through archive emission
///
/// # Arguments
///
/// * `config` - Mirror configuration
/// * `target` - The requested site URL
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The finished zip archive
/// * `Err(MirrorError)` - Input rejected, size ceiling crossed, or an
///   unrecoverable setup/archive failure; the working area is gone either
///   way
pub async fn run_job(config: &Config, target: &str) -> Result<Vec<u8>> {
    let target = validate_target(target, config)?;
    tracing::info!("Starting mirror job for {}", target);

    let mut job = Job::create(target, config)?;
    let client = fetch::build_http_client()?;

    crawler::crawl_site(&mut job, config, &client).await?;

    let workdir = job.workdir.clone();
    let bytes = tokio::task::spawn_blocking(move || archive::archive_to_bytes(&workdir))
        .await
        .map_err(|e| MirrorError::Internal(format!("archive task failed: {e}")))??;

    tracing::info!(
        "Mirror job {} finished: {} bytes mirrored, {} byte archive",
        job.id,
        job.bytes_total,
        bytes.len()
    );

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.workspace.root = root.to_path_buf();
        config
    }

    #[test]
    fn test_validate_target_accepts_allowed_suffix() {
        let config = Config::default();
        let url = validate_target("https://example.webflow.io/", &config).unwrap();
        assert_eq!(url.as_str(), "https://example.webflow.io/");
    }

    #[test]
    fn test_validate_target_rejects_other_host() {
        let config = Config::default();
        let result = validate_target("https://evil.example.com/", &config);
        assert!(matches!(
            result.unwrap_err(),
            MirrorError::HostNotAllowed { .. }
        ));
    }

    #[test]
    fn test_validate_target_rejects_malformed_url() {
        let config = Config::default();
        let result = validate_target("not a url", &config);
        assert!(matches!(result.unwrap_err(), MirrorError::InvalidTarget(_)));
    }

    #[test]
    fn test_validate_target_is_case_sensitive() {
        // Url lowercases hostnames during parsing, so an uppercase suffix
        // in the config never matches
        let mut config = Config::default();
        config.site.allowed_host_suffixes = vec!["WEBFLOW.IO".to_string()];
        let result = validate_target("https://example.webflow.io/", &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_target_strips_fragment_and_query() {
        let config = Config::default();
        let url = validate_target("https://example.webflow.io/page?x=1#top", &config).unwrap();
        assert_eq!(url.as_str(), "https://example.webflow.io/page");
    }

    #[test]
    fn test_job_creates_and_removes_working_area() {
        let root = TempDir::new().unwrap();
        let config = test_config(root.path());
        let target = Url::parse("https://example.webflow.io/").unwrap();

        let workdir = {
            let job = Job::create(target, &config).unwrap();
            assert!(job.workdir.is_dir());
            job.workdir.clone()
        };

        assert!(!workdir.exists());
    }

    #[test]
    fn test_jobs_get_distinct_working_areas() {
        let root = TempDir::new().unwrap();
        let config = test_config(root.path());
        let target = Url::parse("https://example.webflow.io/").unwrap();

        let a = Job::create(target.clone(), &config).unwrap();
        let b = Job::create(target, &config).unwrap();
        assert_ne!(a.workdir, b.workdir);
    }

    #[test]
    fn test_origin_is_site_root() {
        let root = TempDir::new().unwrap();
        let config = test_config(root.path());
        let target = Url::parse("https://example.webflow.io/deep/page").unwrap();

        let job = Job::create(target, &config).unwrap();
        assert_eq!(job.origin.as_str(), "https://example.webflow.io/");
        assert_eq!(job.host, "example.webflow.io");
    }
}
