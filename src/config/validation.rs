use crate::config::types::{Config, CrawlerConfig, SiteConfig, StorageConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_site_config(&config.site)?;
    validate_storage_config(&config.storage)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the base URL: required, absolute, HTTP(S)
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    let base_url = config.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::Validation(
            "base_url cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use HTTP or HTTPS scheme",
            base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            base_url
        )));
    }

    Ok(())
}

/// Validates storage names
fn validate_storage_config(config: &StorageConfig) -> ConfigResult<()> {
    if config.project_folder.trim().is_empty() {
        return Err(ConfigError::Validation(
            "project_folder cannot be empty".to_string(),
        ));
    }

    validate_file_name("frontier_file", &config.frontier_file)?;
    validate_file_name("visited_file", &config.visited_file)?;
    validate_file_name("failed_file", &config.failed_file)?;
    validate_file_name("artifact_folder", &config.artifact_folder)?;

    let names = [
        &config.frontier_file,
        &config.visited_file,
        &config.failed_file,
        &config.artifact_folder,
    ];
    for (i, name) in names.iter().enumerate() {
        if names[i + 1..].contains(name) {
            return Err(ConfigError::Validation(format!(
                "storage name '{}' is used more than once",
                name
            )));
        }
    }

    Ok(())
}

/// A storage name must be a plain relative name inside the project folder
fn validate_file_name(field: &str, name: &str) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain name inside the project folder, got '{}'",
            field, name
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.max_redirects > 50 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 50, got {}",
            config.max_redirects
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_attempts == Some(0) {
        return Err(ConfigError::Validation(
            "max_attempts must be >= 1 when set".to_string(),
        ));
    }

    if config.max_rounds == Some(0) {
        return Err(ConfigError::Validation(
            "max_rounds must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the identifying header
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent value cannot be empty".to_string(),
        ));
    }

    // Header values may not carry line breaks
    if config.value.contains(|c| c == '\r' || c == '\n') {
        return Err(ConfigError::Validation(
            "user agent value cannot contain line breaks".to_string(),
        ));
    }

    Ok(())
}
