use crate::config::types::{Config, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Builds the run configuration and validates it once
///
/// The optional file is read and parsed first, then `overrides` replace
/// its values, and only the result is validated. Keys missing from the file
/// keep their defaults; without a file the defaults are used throughout.
///
/// Returns the configuration together with the hex SHA-256 digest of the
/// file content, if a file was given.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use journal_harvest::config::{load_config, ConfigOverrides};
///
/// let (config, hash) = load_config(Some(Path::new("harvest.toml")), &ConfigOverrides::default()).unwrap();
/// println!("Keyword: {} (config {:?})", config.source.keyword, hash);
/// ```
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<(Config, Option<String>), ConfigError> {
    let (mut config, hash) = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            (parse_config(&content)?, Some(digest(&content)))
        }
        None => (Config::default(), None),
    };

    overrides.apply(&mut config);
    validate(&config)?;
    Ok((config, hash))
}

/// Parses configuration from a TOML string without validating it
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
