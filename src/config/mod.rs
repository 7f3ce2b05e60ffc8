//! Configuration module for the mirror
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every option carries a default, so the binary runs without a
//! config file at all.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, SiteConfig, WorkspaceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
