//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use factx_core::{FactxConfig, InvoiceFieldExtractor};

/// Load the configuration from an explicit path, the default location, or
/// fall back to built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FactxConfig> {
    if let Some(path) = config_path {
        return Ok(FactxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(FactxConfig::from_file(&default_path)?)
    } else {
        Ok(FactxConfig::default())
    }
}

/// Build the extractor described by the configuration.
pub fn build_extractor(config: &FactxConfig) -> anyhow::Result<InvoiceFieldExtractor> {
    Ok(InvoiceFieldExtractor::from_config(&config.extraction)?)
}
