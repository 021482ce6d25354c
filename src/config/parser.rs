use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use quarry::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Seed URL: {}", config.crawl.seed_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawl]
seed-url = "https://quotes.toscrape.com"
page-limit = 3
delay-seconds = 1.0

[http]
user-agent = "TestAgent/1.0"

[http.headers]
"Accept-Language" = "en-US,en;q=0.5"

[output]
csv-path = "./data.csv"
sqlite-path = "./data.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.seed_url, "https://quotes.toscrape.com");
        assert_eq!(config.crawl.page_limit, 3);
        assert_eq!(config.crawl.max_attempts, 3);
        assert_eq!(config.http.user_agent.as_deref(), Some("TestAgent/1.0"));
        assert_eq!(config.output.csv_path.as_deref(), Some("./data.csv"));
        assert_eq!(config.output.sqlite_path.as_deref(), Some("./data.db"));
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let config_content = r#"
[crawl]
seed-url = "https://quotes.toscrape.com"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.page_limit, 0);
        assert!((config.crawl.delay_seconds - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.crawl.max_attempts, 3);
        assert!((config.crawl.backoff_base - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.crawl.timeout_seconds, 15);
        assert!(config.http.user_agent.is_none());
        assert!(config.output.csv_path.is_none());
        assert!(config.output.sqlite_path.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawl]
seed-url = "ftp://quotes.toscrape.com"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
