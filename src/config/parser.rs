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
/// use scrappy::config::load_config;
///
/// let config = load_config(Path::new("scrappy.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
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
[crawler]
max-concurrency = 4
max-pages = 50
request-timeout = 5
dedupe-scheduling = false

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "2.1"

[output]
report-path = "./out.csv"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrency, 4);
        assert_eq!(config.crawler.max_pages, 50);
        assert_eq!(config.crawler.request_timeout, 5);
        assert!(!config.crawler.dedupe_scheduling);
        assert_eq!(config.user_agent.header_value(), "TestCrawler/2.1");
        assert_eq!(config.output.report_path, "./out.csv");
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = parse_config("[crawler]\nmax-pages = 5\n").unwrap();

        assert_eq!(config.crawler.max_pages, 5);
        assert_eq!(config.crawler.max_concurrency, 10);
        assert!(config.crawler.dedupe_scheduling);
        assert_eq!(config.user_agent.header_value(), "Scrappy/1.0");
        assert_eq!(config.output.report_path, "report.csv");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.max_concurrency, 10);
        assert_eq!(config.crawler.max_pages, 30);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/scrappy.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-concurrency = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
