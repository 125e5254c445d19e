use receipt_core::{AppError, DateError};
use receipt_extraction::ExtractionError;
use receipt_storage::StorageError;
use thiserror::Error;

use super::types::IngestionStage;

/// Ingestion failure, tagged with the step that failed.
///
/// The underlying port error stays reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("receipt image upload failed")]
    UploadFailed(#[source] StorageError),

    #[error("receipt field extraction failed")]
    ExtractionFailed(#[source] ExtractionError),

    #[error("receipt date could not be resolved")]
    DateResolutionFailed(#[from] DateError),

    #[error("receipt could not be saved")]
    PersistenceFailed(#[source] AppError),
}

impl IngestionError {
    pub fn stage(&self) -> IngestionStage {
        match self {
            IngestionError::UploadFailed(_) => IngestionStage::Upload,
            IngestionError::ExtractionFailed(_) => IngestionStage::Extraction,
            IngestionError::DateResolutionFailed(_) => IngestionStage::DateResolution,
            IngestionError::PersistenceFailed(_) => IngestionStage::Persistence,
        }
    }

    /// True when the failure came from cancellation rather than a port fault
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            IngestionError::UploadFailed(StorageError::Cancelled)
                | IngestionError::ExtractionFailed(ExtractionError::Cancelled)
        )
    }
}
