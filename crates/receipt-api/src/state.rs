//! Application state shared by all handlers

use receipt_db::ReceiptRepositoryTrait;
use receipt_services::ReceiptIngestionService;
use receipt_storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Limits applied to uploaded receipt images before ingestion
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub ingestion: ReceiptIngestionService,
    pub receipts: Arc<dyn ReceiptRepositoryTrait>,
    /// Used by the health check
    pub storage: Arc<dyn Storage>,
    pub upload: UploadConfig,
    /// Deadline for one ingestion; `None` disables it
    pub request_timeout: Option<Duration>,
    /// Cancelled on shutdown; each ingestion runs under a child token
    pub shutdown: CancellationToken,
}
