//! Error types for the factx-core library.
//!
//! Field extraction itself never fails; these errors come from building an
//! extractor out of configuration, loading configuration files, and the
//! text recognition collaborator.

use thiserror::Error;

/// Main error type for the factx library.
#[derive(Error, Debug)]
pub enum FactxError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A field rule pattern could not be compiled.
    #[error("invalid pattern for field {field}: {source}")]
    Rule {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Text recognition error from the recognition collaborator.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by a text recognizer.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// The image could not be decoded or is not an image at all.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The recognition engine failed on a readable image.
    #[error("text recognition failed: {0}")]
    Failed(String),
}

impl RecognitionError {
    /// Whether the failure is attributable to the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidImage(_))
    }
}

/// Result type for the factx library.
pub type Result<T> = std::result::Result<T, FactxError>;
