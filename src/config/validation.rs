use crate::config::types::{Config, CrawlerConfig, SiteConfig, WorkspaceConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_workspace_config(&config.workspace)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.wave_size < 1 || config.wave_size > 100 {
        return Err(ConfigError::Validation(format!(
            "wave_size must be between 1 and 100, got {}",
            config.wave_size
        )));
    }

    if config.page_timeout_secs < 1 || config.asset_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch timeouts must be at least 1 second".to_string(),
        ));
    }

    if config.max_content_bytes < 1 {
        return Err(ConfigError::Validation(
            "max_content_bytes must be at least 1".to_string(),
        ));
    }

    if config.max_total_bytes < 1 {
        return Err(ConfigError::Validation(
            "max_total_bytes must be at least 1".to_string(),
        ));
    }

    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry_attempts must be >= 1, got {}",
            config.retry_attempts
        )));
    }

    Ok(())
}

/// Validates the allowed-host configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.allowed_host_suffixes.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_host_suffixes cannot be empty".to_string(),
        ));
    }

    for suffix in &config.allowed_host_suffixes {
        if suffix.is_empty() {
            return Err(ConfigError::Validation(
                "allowed host suffix cannot be an empty string".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates working-area configuration
fn validate_workspace_config(config: &WorkspaceConfig) -> Result<(), ConfigError> {
    if config.root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "workspace root cannot be empty".to_string(),
        ));
    }

    if config.stale_age_secs < 60 {
        return Err(ConfigError::Validation(format!(
            "stale_age_secs must be >= 60 so the janitor cannot race a live job, got {}",
            config.stale_age_secs
        )));
    }

    Ok(())
}
