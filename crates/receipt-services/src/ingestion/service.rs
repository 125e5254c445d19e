use receipt_core::{resolve_transaction_date, NewReceipt, Receipt};
use receipt_db::ReceiptRepositoryTrait;
use receipt_extraction::{ExtractionError, ReceiptExtractor};
use receipt_storage::{Storage, StorageError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::error::IngestionError;
use super::types::{CreateReceiptRequest, IngestionState};

/// Runs one receipt through upload, extraction, date resolution and save.
///
/// Steps run strictly in order and the first failure ends the workflow. An
/// image that was already uploaded is left in storage when a later step fails.
#[derive(Clone)]
pub struct ReceiptIngestionService {
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn ReceiptExtractor>,
    repository: Arc<dyn ReceiptRepositoryTrait>,
}

impl ReceiptIngestionService {
    pub fn new(
        storage: Arc<dyn Storage>,
        extractor: Arc<dyn ReceiptExtractor>,
        repository: Arc<dyn ReceiptRepositoryTrait>,
    ) -> Self {
        Self {
            storage,
            extractor,
            repository,
        }
    }

    /// Ingest one receipt.
    ///
    /// `cancel` aborts an in-flight upload or extraction; the error then
    /// carries a `Cancelled` cause for that step. The save is not interrupted
    /// once started.
    #[tracing::instrument(skip(self, request, cancel), fields(
        receipt.filename = %request.filename,
        receipt.size_bytes = request.image.len(),
        receipt.id = tracing::field::Empty
    ))]
    pub async fn create_receipt(
        &self,
        request: CreateReceiptRequest,
        cancel: &CancellationToken,
    ) -> Result<Receipt, IngestionError> {
        let CreateReceiptRequest {
            date,
            payer,
            payment_method,
            image,
            filename,
            content_type,
        } = request;
        let mut state = IngestionState::Start;

        let upload = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StorageError::Cancelled),
            result = self.storage.upload(&filename, &content_type, image.clone()) => result,
        };
        let (storage_key, image_url) = upload
            .and_then(|(key, url)| {
                if url.trim().is_empty() {
                    Err(StorageError::UploadFailed(
                        "storage returned an empty reference".to_string(),
                    ))
                } else {
                    Ok((key, url))
                }
            })
            .map_err(|e| fail(state, IngestionError::UploadFailed(e)))?;
        state = advance(state, IngestionState::ImageStored);
        tracing::debug!(storage_key = %storage_key, image_url = %image_url, "Receipt image stored");

        let extraction = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExtractionError::Cancelled),
            result = self.extractor.extract(image, &content_type) => result,
        };
        let extracted = extraction
            .map_err(|e| fail(state, IngestionError::ExtractionFailed(e)))?
            .unwrap_or_else(|| {
                tracing::debug!(
                    extractor = self.extractor.name(),
                    "Extractor found no receipt fields"
                );
                Default::default()
            });
        state = advance(state, IngestionState::FieldsExtracted);

        let transaction_date =
            resolve_transaction_date(date.as_deref().unwrap_or_default(), &extracted.date)
                .map_err(|e| fail(state, IngestionError::from(e)))?;
        state = advance(state, IngestionState::DateResolved);

        let new_receipt = NewReceipt {
            transaction_date,
            store_name: extracted.store,
            items: extracted.items,
            total_amount: extracted.total_amount,
            payer,
            payment_method,
            image_url,
        };
        state = advance(state, IngestionState::RecordBuilt);

        let saved = self
            .repository
            .save(new_receipt)
            .await
            .map_err(|e| fail(state, IngestionError::PersistenceFailed(e)))?;
        advance(state, IngestionState::Persisted);

        tracing::Span::current().record("receipt.id", tracing::field::display(saved.id));
        tracing::info!(
            receipt_id = %saved.id,
            transaction_date = %saved.transaction_date,
            storage_key = %storage_key,
            "Receipt ingested"
        );

        Ok(saved)
    }
}

fn advance(from: IngestionState, to: IngestionState) -> IngestionState {
    tracing::debug!(from = %from, to = %to, "Ingestion state transition");
    to
}

fn fail(state: IngestionState, err: IngestionError) -> IngestionError {
    if err.is_cancelled() {
        tracing::info!(stage = %err.stage(), state = %state, "Receipt ingestion cancelled");
    } else {
        tracing::warn!(
            stage = %err.stage(),
            state = %state,
            error = %err,
            cause = ?std::error::Error::source(&err).map(|s| s.to_string()),
            "Receipt ingestion failed"
        );
    }
    err
}
