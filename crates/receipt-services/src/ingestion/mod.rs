//! Receipt ingestion workflow

mod error;
mod service;
mod types;

pub use error::IngestionError;
pub use service::ReceiptIngestionService;
pub use types::{CreateReceiptRequest, IngestionStage, IngestionState};
