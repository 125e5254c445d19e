//! Database repositories for data access layer
//
// Receipt repository (persistence port and its Postgres implementation)
pub mod receipt;

pub use receipt::{create_receipt_repository, PostgresReceiptRepository, ReceiptRepositoryTrait};
