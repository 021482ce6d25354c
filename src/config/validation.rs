use crate::config::types::{Config, CrawlConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl traversal configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url '{}': {}", config.seed_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "seed-url must use http or https scheme, got '{}'",
            url.scheme()
        )));
    }

    if !config.delay_seconds.is_finite() || config.delay_seconds < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be a non-negative number, got {}",
            config.delay_seconds
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if !config.backoff_base.is_finite() || config.backoff_base < 0.0 {
        return Err(ConfigError::Validation(format!(
            "backoff-base must be a non-negative number, got {}",
            config.backoff_base
        )));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    Ok(())
}

/// Validates header overrides
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be blank when set".to_string(),
            ));
        }
    }

    for (name, value) in &config.headers {
        validate_header_name(name)?;

        if value.chars().any(|c| c == '\r' || c == '\n') {
            return Err(ConfigError::Validation(format!(
                "Header '{}' value cannot contain line breaks",
                name
            )));
        }
    }

    Ok(())
}

/// Validates sink destinations
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.csv_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "csv-path cannot be empty when set".to_string(),
            ));
        }
    }

    if let Some(path) = &config.sqlite_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "sqlite-path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates an HTTP header name (RFC 7230 token characters)
fn validate_header_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(
            "Header name cannot be empty".to_string(),
        ));
    }

    let is_token_char = |c: char| {
        c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
    };

    if !name.chars().all(is_token_char) {
        return Err(ConfigError::Validation(format!(
            "Header name '{}' contains invalid characters",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn base_config() -> Config {
        Config {
            crawl: CrawlConfig {
                seed_url: "https://quotes.toscrape.com".to_string(),
                page_limit: 0,
                delay_seconds: 1.0,
                max_attempts: 3,
                backoff_base: 1.5,
                timeout_seconds: 15,
            },
            http: HttpConfig::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_seed() {
        let mut config = base_config();
        config.crawl.seed_url = "ftp://quotes.toscrape.com".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_malformed_seed() {
        let mut config = base_config();
        config.crawl.seed_url = "not a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_rejects_negative_delay() {
        let mut config = base_config();
        config.crawl.delay_seconds = -0.5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let mut config = base_config();
        config.crawl.max_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = base_config();
        config.crawl.timeout_seconds = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_blank_user_agent() {
        let mut config = base_config();
        config.http.user_agent = Some("   ".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_header_name() {
        let mut config = base_config();
        let mut headers = BTreeMap::new();
        headers.insert("Bad Header".to_string(), "value".to_string());
        config.http.headers = headers;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_header_value_with_newline() {
        let mut config = base_config();
        let mut headers = BTreeMap::new();
        headers.insert("X-Custom".to_string(), "value\r\ninjected".to_string());
        config.http.headers = headers;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_accepts_header_overrides() {
        let mut config = base_config();
        let mut headers = BTreeMap::new();
        headers.insert("Accept-Language".to_string(), "de-DE".to_string());
        config.http.headers = headers;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_empty_sink_paths() {
        let mut config = base_config();
        config.output.csv_path = Some(String::new());
        assert!(validate(&config).is_err());

        let mut config = base_config();
        config.output.sqlite_path = Some(String::new());
        assert!(validate(&config).is_err());
    }
}
