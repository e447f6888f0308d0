use serde::Deserialize;

/// Default directory listing that is searched
pub const DEFAULT_BASE_URL: &str = "https://sinta.kemdikbud.go.id/journals/";

/// Default search keyword
pub const DEFAULT_KEYWORD: &str = "teknologi informasi";

/// Main configuration structure for Journal-Harvest
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub crawler: CrawlerConfig,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

/// What to search and where
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root URL of the directory listing, without query string
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Search filter passed as the `q` query parameter
    pub keyword: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            keyword: DEFAULT_KEYWORD.to_string(),
        }
    }
}

/// Request behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Timeout for a single GET request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Pause after every results page (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            page_delay_ms: 2000,
            user_agent: format!("journal-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// CSS selectors locating each field on a results page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Container holding the "Page 1 of N" text
    pub pagination: String,

    /// One element per journal, holding the name and its link
    pub name: String,

    /// Affiliation blocks, aligned by position with `name`
    pub affiliation: String,

    /// Accreditation badges, aligned by position with `name`
    pub accreditation: String,

    /// Anchor searched for inside each name block
    pub link: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pagination: "div.text-center.pagination-text".to_string(),
            name: "div.affil-name.mb-3".to_string(),
            affiliation: "div.affil-loc.mt-2".to_string(),
            accreditation: "span.num-stat.accredited".to_string(),
            link: "a".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Field name and selector pairs, in declaration order
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("pagination", self.pagination.as_str()),
            ("name", self.name.as_str()),
            ("affiliation", self.affiliation.as_str()),
            ("accreditation", self.accreditation.as_str()),
            ("link", self.link.as_str()),
        ]
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory under which one folder per run is created
    #[serde(rename = "root-dir")]
    pub root_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: "scraped_data".to_string(),
        }
    }
}

/// Values given on the command line, applied on top of the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub keyword: Option<String>,
    pub root_dir: Option<String>,
    pub page_delay_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Replaces every value that was given
    pub fn apply(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }
        if let Some(keyword) = &self.keyword {
            config.source.keyword = keyword.clone();
        }
        if let Some(root_dir) = &self.root_dir {
            config.output.root_dir = root_dir.clone();
        }
        if let Some(page_delay_ms) = self.page_delay_ms {
            config.crawler.page_delay_ms = page_delay_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fields_in_declaration_order() {
        let layout = LayoutConfig::default();
        let names: Vec<_> = layout.fields().iter().map(|(name, _)| *name).collect();

        assert_eq!(
            names,
            vec!["pagination", "name", "affiliation", "accreditation", "link"]
        );
        assert_eq!(layout.fields()[0].1, "div.text-center.pagination-text");
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = Config::default();
        let overrides = ConfigOverrides {
            keyword: Some("physics".to_string()),
            page_delay_ms: Some(500),
            ..Default::default()
        };

        overrides.apply(&mut config);

        assert_eq!(config.source.keyword, "physics");
        assert_eq!(config.crawler.page_delay_ms, 500);
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.output.root_dir, "scraped_data");
    }
}
