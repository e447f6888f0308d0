use crate::config::types::{Config, CrawlerConfig, LayoutConfig, OutputConfig, SourceConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_crawler_config(&config.crawler)?;
    validate_layout_config(&config.layout)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the base URL and keyword
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must not carry a query string",
            config.base_url
        )));
    }

    if config.keyword.trim().is_empty() {
        return Err(ConfigError::Validation("keyword cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates request timeout and pacing
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 || config.request_timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 120, got {}",
            config.request_timeout_secs
        )));
    }

    if config.page_delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "page-delay-ms must be >= 100ms, got {}ms",
            config.page_delay_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector compiles
fn validate_layout_config(config: &LayoutConfig) -> Result<(), ConfigError> {
    for (field, selector) in config.fields() {
        parse_selector(field, selector)?;
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "root-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Compiles one selector, naming the layout field on failure
pub(crate) fn parse_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!(
            "layout.{} cannot be empty",
            field
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("layout.{} '{}': {:?}", field, selector, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.source.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_base_url() {
        let mut config = Config::default();
        config.source.base_url = "ftp://example.org/journals/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_base_url_with_query() {
        let mut config = Config::default();
        config.source.base_url = "https://example.org/journals/?q=x".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_blank_keyword() {
        let mut config = Config::default();
        config.source.keyword = "   ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = Config::default();
        config.crawler.request_timeout_secs = 0;
        assert!(validate(&config).is_err());

        config.crawler.request_timeout_secs = 121;
        assert!(validate(&config).is_err());

        config.crawler.request_timeout_secs = 120;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_page_delay_minimum() {
        let mut config = Config::default();
        config.crawler.page_delay_ms = 99;
        assert!(validate(&config).is_err());

        config.crawler.page_delay_ms = 100;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_selector() {
        let mut config = Config::default();
        config.layout.link = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_invalid_selector_names_field() {
        let mut config = Config::default();
        config.layout.pagination = "div[".to_string();
        match validate(&config) {
            Err(ConfigError::InvalidSelector(msg)) => assert!(msg.contains("layout.pagination")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_root_dir() {
        let mut config = Config::default();
        config.output.root_dir = String::new();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }
}
