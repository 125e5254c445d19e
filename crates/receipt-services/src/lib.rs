//! Receipt Services Layer
//!
//! Hosts the ingestion workflow: it takes an uploaded receipt image, stores
//! it, reads its fields, settles the transaction date and saves the record.
//! Ports are injected as trait objects, so the API crate wires concrete
//! adapters and tests wire doubles from [`test_helpers`].

pub mod ingestion;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use ingestion::{
    CreateReceiptRequest, IngestionError, IngestionStage, IngestionState,
    ReceiptIngestionService,
};
pub use receipt_db::ReceiptRepositoryTrait;
pub use receipt_extraction::{ExtractionError, ReceiptExtractor};
pub use receipt_storage::{Storage, StorageError};
