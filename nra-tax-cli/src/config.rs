//! Loading a [`TaxYearConfig`] from TOML.
//!
//! ```toml
//! tax_year = 2024
//! standard_deduction = "14600"
//! salt_cap = "10000"
//! default_nec_rate = "0.30"
//!
//! [[brackets]]
//! upper_bound = "11600"
//! rate = "0.10"
//!
//! # ...
//!
//! [[brackets]]
//! rate = "0.37"
//! ```
//!
//! Amounts may be written as strings or numbers; strings keep every digit.
//! The final bracket omits `upper_bound`.

use std::path::Path;

use nra_tax_core::{TaxYearConfig, TaxYearConfigError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tax-year configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tax-year configuration: {0}")]
    Invalid(#[from] TaxYearConfigError),
}

/// Parses and validates a configuration held in memory.
pub fn parse_config(text: &str) -> Result<TaxYearConfig, ConfigLoadError> {
    let config: TaxYearConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Reads `path` and delegates to [`parse_config`].
pub fn load_config(path: &Path) -> Result<TaxYearConfig, ConfigLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let config = parse_config(&text)?;
    debug!(
        path = %path.display(),
        tax_year = config.tax_year,
        brackets = config.brackets.len(),
        "tax-year configuration loaded"
    );
    Ok(config)
}
