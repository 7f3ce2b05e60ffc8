use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for the mirror
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub workspace: WorkspaceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            site: SiteConfig::default(),
            workspace: WorkspaceConfig::default(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of frontier entries claimed and processed per wave; also
    /// bounds concurrent asset fetches within one page
    #[serde(rename = "wave-size")]
    pub wave_size: usize,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for a single asset fetch (seconds)
    #[serde(rename = "asset-timeout-secs")]
    pub asset_timeout_secs: u64,

    /// Maximum body size accepted for any single fetch (bytes)
    #[serde(rename = "max-content-bytes")]
    pub max_content_bytes: u64,

    /// Ceiling on the cumulative bytes written by one job
    #[serde(rename = "max-total-bytes")]
    pub max_total_bytes: u64,

    /// Number of attempts per fetch before giving up on a resource
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,

    /// Delay before the first retry; doubles on each further retry
    #[serde(rename = "retry-base-delay-ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            wave_size: 15,
            page_timeout_secs: 30,
            asset_timeout_secs: 10,
            max_content_bytes: 10 * 1024 * 1024,
            max_total_bytes: 50 * 1024 * 1024,
            retry_attempts: 3,
            retry_base_delay_ms: 500,
        }
    }
}

/// Which site hosts the mirror will accept
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Hostname suffixes a target URL must end in (case-sensitive)
    #[serde(rename = "allowed-host-suffixes")]
    pub allowed_host_suffixes: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            allowed_host_suffixes: vec!["webflow.io".to_string(), "webflow.com".to_string()],
        }
    }
}

/// Working-area configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory under which per-job working areas are created
    pub root: PathBuf,

    /// Age after which a leftover working area is swept away (seconds)
    #[serde(rename = "stale-age-secs")]
    pub stale_age_secs: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join("webflow-mirror"),
            stale_age_secs: 3600,
        }
    }
}
