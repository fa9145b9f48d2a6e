// src/config/validate.rs

use crate::config::model::{FilterConfig, RawFilterConfig};
use crate::errors::{ChangedError, Result};

impl TryFrom<RawFilterConfig> for FilterConfig {
    type Error = crate::errors::ChangedError;

    fn try_from(raw: RawFilterConfig) -> std::result::Result<Self, Self::Error> {
        let dest = require_dest(&raw)?;
        validate_extension(&raw)?;
        Ok(FilterConfig::new_unchecked(raw, dest))
    }
}

fn require_dest(cfg: &RawFilterConfig) -> Result<String> {
    match cfg.dest.as_deref().map(str::trim) {
        Some(dest) if !dest.is_empty() => Ok(dest.to_string()),
        _ => Err(ChangedError::ConfigError("`dest` required".to_string())),
    }
}

fn validate_extension(cfg: &RawFilterConfig) -> Result<()> {
    if let Some(ext) = &cfg.extension {
        if ext.contains('/') || ext.contains('\\') {
            return Err(ChangedError::ConfigError(format!(
                "extension must not contain a path separator (got {ext:?})"
            )));
        }
    }
    Ok(())
}
