//! Core library for invoice field extraction.
//!
//! This crate provides:
//! - Normalization of recognized (OCR) text into a single flattened line
//! - A declarative, ordered rule table extracting client, beneficiary, tax
//!   IDs, document number, date, payment method, plate, line item and amounts
//! - Date reformatting and suggested filename synthesis
//! - A seam for plugging in an external text recognizer
//!
//! Extraction is total: every input yields a fully populated record.

pub mod error;
pub mod invoice;
pub mod models;
pub mod normalize;
pub mod recognition;

pub use error::{FactxError, RecognitionError, Result};
pub use invoice::{InvoiceExtractor, InvoiceFieldExtractor};
pub use invoice::rules::{FieldRule, Pattern};
pub use models::config::{ExtractionConfig, FactxConfig, RecognitionConfig};
pub use models::record::{ExtractionRecord, Field, KeyStyle};
pub use normalize::{normalize, normalize_text};
pub use recognition::{InvoiceService, TextRecognizer};

/// Extract invoice fields from raw recognized text with the default rules.
pub fn extract_fields(raw_text: &str) -> ExtractionRecord {
    InvoiceFieldExtractor::new().extract_fields(raw_text)
}
