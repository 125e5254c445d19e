//! Receipt database layer
//!
//! Persistence for ingested receipts. The schema lives in the workspace
//! `migrations/` directory and is applied at startup.

pub mod db;

pub use db::{create_receipt_repository, PostgresReceiptRepository, ReceiptRepositoryTrait};
