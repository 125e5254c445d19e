//! Test helpers for ingestion tests
//!
//! In-memory stand-ins for the storage, extraction and persistence ports, so
//! the workflow and the HTTP layer can be tested without S3, Gemini or
//! Postgres. Enabled for downstream crates through the `test-helpers` feature.

pub mod mock_extractor;
pub mod mock_repositories;
pub mod mock_storage;

pub use mock_extractor::MockExtractor;
pub use mock_repositories::InMemoryReceiptRepository;
pub use mock_storage::MockStorage;

use receipt_core::ExtractedFields;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Fields a well-behaved extractor would return for a typical receipt
pub fn sample_fields() -> ExtractedFields {
    ExtractedFields {
        date: "2023-12-25".to_string(),
        store: "Mock Store".to_string(),
        items: "A,B".to_string(),
        total_amount: 1234,
    }
}

/// How a mock port should behave when called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Succeed,
    Fail,
    /// Never complete; only cancellation ends the call
    Hang,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
