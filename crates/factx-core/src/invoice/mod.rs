//! Invoice field extraction module.

mod extractor;
pub mod rules;

pub use extractor::InvoiceFieldExtractor;

use crate::models::record::ExtractionRecord;
use crate::normalize::normalize_text;

/// Trait for invoice field extractors.
pub trait InvoiceExtractor {
    /// Extract fields from already flattened text.
    fn extract(&self, flattened_text: &str) -> ExtractionRecord;

    /// Flatten raw recognized text, then extract fields from it.
    fn extract_from_text(&self, raw_text: &str) -> ExtractionRecord {
        self.extract(&normalize_text(raw_text))
    }
}
