//! webflow-mirror: a site exporter for published Webflow sites
//!
//! This crate crawls a published site, downloads every referenced asset,
//! rewrites in-document references to a self-contained local layout, and
//! packages the mirrored tree as a zip archive.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod janitor;
pub mod job;
pub mod url;

use thiserror::Error;

/// Main error type for mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("Target host '{host}' is not a supported site host")]
    HostNotAllowed { host: String },

    #[error("Mirror size limit exceeded: {total} bytes written against a ceiling of {limit}")]
    SizeLimitExceeded { limit: u64, total: u64 },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error(transparent)]
    Fetch(#[from] fetch::FetchFailed),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use job::{run_job, Job};
pub use url::{local_path, normalize_url, relative_href, same_origin};
