// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{FilterConfig, RawFilterConfig};
use crate::errors::Result;

/// Parse a TOML document into a `RawFilterConfig` without validation.
pub fn load_from_str(contents: &str) -> Result<RawFilterConfig> {
    let config: RawFilterConfig = toml::from_str(contents)?;
    Ok(config)
}

/// Load a configuration file from a given path and return the raw
/// `RawFilterConfig`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] to also
/// check the required fields.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawFilterConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FilterConfig> {
    let raw_config = load_from_path(&path)?;
    let config = FilterConfig::try_from(raw_config)?;
    Ok(config)
}
