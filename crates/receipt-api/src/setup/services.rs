//! Service initialization and application state setup

use crate::state::{AppState, UploadConfig};
use receipt_core::Config;
use receipt_db::create_receipt_repository;
use receipt_extraction::ReceiptExtractor;
use receipt_services::ReceiptIngestionService;
use receipt_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Wire repositories and services into the shared state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn ReceiptExtractor>,
) -> Arc<AppState> {
    let receipts = create_receipt_repository(pool);
    let ingestion = ReceiptIngestionService::new(storage.clone(), extractor, receipts.clone());

    let request_timeout = (config.request_timeout_seconds > 0)
        .then(|| Duration::from_secs(config.request_timeout_seconds));

    tracing::info!(
        max_file_size_bytes = config.max_file_size_bytes,
        request_timeout_secs = config.request_timeout_seconds,
        "Services initialized"
    );

    Arc::new(AppState {
        ingestion,
        receipts,
        storage,
        upload: UploadConfig::from(config),
        request_timeout,
        shutdown: CancellationToken::new(),
    })
}

impl From<&Config> for UploadConfig {
    fn from(config: &Config) -> Self {
        UploadConfig {
            max_file_size_bytes: config.max_file_size_bytes,
            allowed_extensions: config.allowed_extensions.clone(),
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }
}
