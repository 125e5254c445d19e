use async_trait::async_trait;
use bytes::Bytes;
use receipt_core::ExtractedFields;
use thiserror::Error;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Extraction request failed: {0}")]
    Request(String),

    #[error("Extraction API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid extraction response: {0}")]
    InvalidResponse(String),

    #[error("Extraction configuration error: {0}")]
    Config(String),

    #[error("Extraction cancelled")]
    Cancelled,
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Reads receipt fields from an image.
#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    /// Extract fields from the image bytes.
    ///
    /// `Ok(None)` means the service answered but found nothing usable, which
    /// is not an error: the caller may still have a date of its own.
    async fn extract(
        &self,
        image: Bytes,
        content_type: &str,
    ) -> ExtractionResult<Option<ExtractedFields>>;

    /// Name of the extractor, for logs
    fn name(&self) -> &str;
}
