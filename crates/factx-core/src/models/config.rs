//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FactxError, Result};
use crate::invoice::rules::patterns::DEFAULT_ITEM_VOCABULARY;

/// Main configuration for factx.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactxConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Settings handed to the text recognizer.
    pub recognition: RecognitionConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Known product description prefixes for the item rule.
    pub item_vocabulary: Vec<String>,

    /// Leading tag of suggested filenames.
    pub filename_prefix: String,

    /// Characters of the client name used in suggested filenames.
    pub client_prefix_len: usize,

    /// Characters of the beneficiary name used in suggested filenames.
    pub beneficiary_prefix_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            item_vocabulary: DEFAULT_ITEM_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            filename_prefix: "FC".to_string(),
            client_prefix_len: 5,
            beneficiary_prefix_len: 10,
        }
    }
}

impl ExtractionConfig {
    /// Check that the configuration can build an extractor.
    pub fn validate(&self) -> Result<()> {
        if self.item_vocabulary.is_empty() {
            return Err(FactxError::Config("item_vocabulary must not be empty".into()));
        }
        if self.item_vocabulary.iter().any(|v| v.trim().is_empty()) {
            return Err(FactxError::Config(
                "item_vocabulary entries must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Text recognition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Language hint passed to the recognizer (Tesseract-style code).
    pub language: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

impl FactxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FactxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FactxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
