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
/// use picscout::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Domains: {}", config.domains.len());
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
domains = ["example.com", "other.org"]

[crawler]
concurrency = 5
max-pages-per-domain = 50
max-depth = 3
render-fallback = false
user-agent = "TestScout/1.0"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.domains, vec!["example.com", "other.org"]);
        assert_eq!(config.crawler.concurrency, 5);
        assert_eq!(config.crawler.max_pages_per_domain, 50);
        assert_eq!(config.crawler.max_depth, 3);
        assert!(!config.crawler.render_fallback);
        assert_eq!(config.crawler.user_agent, "TestScout/1.0");
    }

    #[test]
    fn test_load_config_applies_defaults() {
        let config_content = r#"domains = ["example.com"]"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.concurrency, 3);
        assert_eq!(config.crawler.max_pages_per_domain, 20);
        assert_eq!(config.crawler.max_depth, 2);
        assert!(config.crawler.render_fallback);
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
domains = ["example.com"]

[crawler]
concurrency = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
