//! Seam for the external text recognition step.
//!
//! factx does not decode images. A hosting layer supplies a
//! [`TextRecognizer`] and uses [`InvoiceService`] to turn image bytes into an
//! extraction record.

use tracing::{debug, warn};

use crate::error::{RecognitionError, Result};
use crate::invoice::{InvoiceExtractor, InvoiceFieldExtractor};
use crate::models::config::RecognitionConfig;
use crate::models::record::ExtractionRecord;

/// Trait for image-to-text recognizers.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in an encoded image. May return multi-line or empty
    /// text.
    fn recognize(
        &self,
        image: &[u8],
        language: &str,
    ) -> std::result::Result<String, RecognitionError>;
}

/// Recognition followed by field extraction.
pub struct InvoiceService<R, E = InvoiceFieldExtractor> {
    recognizer: R,
    extractor: E,
    config: RecognitionConfig,
}

impl<R: TextRecognizer> InvoiceService<R> {
    /// Create a service with the default extractor.
    pub fn new(recognizer: R) -> Self {
        Self::with_extractor(recognizer, InvoiceFieldExtractor::new())
    }
}

impl<R: TextRecognizer, E: InvoiceExtractor> InvoiceService<R, E> {
    /// Create a service with a custom extractor.
    pub fn with_extractor(recognizer: R, extractor: E) -> Self {
        Self {
            recognizer,
            extractor,
            config: RecognitionConfig::default(),
        }
    }

    /// Set the recognition configuration.
    pub fn with_config(mut self, config: RecognitionConfig) -> Self {
        self.config = config;
        self
    }

    /// Recognize text in `image` and extract invoice fields from it.
    ///
    /// Only recognition can fail; an image without text yields an empty
    /// record.
    pub fn process(&self, image: &[u8]) -> Result<ExtractionRecord> {
        let text = self
            .recognizer
            .recognize(image, &self.config.language)
            .inspect_err(|e| warn!("Recognition failed: {}", e))?;

        debug!(
            "Recognized {} characters from {} byte image",
            text.len(),
            image.len()
        );

        Ok(self.extractor.extract_from_text(&text))
    }
}
