//! Receipt Core Library
//!
//! Domain models, error types, configuration, and the date reconciliation rule
//! shared across all receipt service components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ExtractedFields, NewReceipt, Receipt};
pub use storage_types::StorageBackend;
pub use validation::date::{resolve_transaction_date, DateError, DateSource};
