//! Configuration module for Journal-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a run works without any
//! file at all.
//!
//! # Example
//!
//! ```no_run
//! use journal_harvest::config::{load_config, ConfigOverrides};
//! use std::path::Path;
//!
//! let (config, _) = load_config(Some(Path::new("harvest.toml")), &ConfigOverrides::default()).unwrap();
//! println!("Searching {} for '{}'", config.source.base_url, config.source.keyword);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ConfigOverrides, CrawlerConfig, LayoutConfig, OutputConfig, SourceConfig,
    DEFAULT_BASE_URL, DEFAULT_KEYWORD,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;

pub(crate) use validation::parse_selector;
