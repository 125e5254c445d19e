//! Mock extractor for testing

use async_trait::async_trait;
use bytes::Bytes;
use receipt_core::ExtractedFields;
use receipt_extraction::{ExtractionError, ExtractionResult, ReceiptExtractor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{lock, MockBehavior};

pub struct MockExtractor {
    fields: Option<ExtractedFields>,
    behavior: MockBehavior,
    calls: AtomicUsize,
    last_image: Mutex<Option<Bytes>>,
}

impl MockExtractor {
    fn build(fields: Option<ExtractedFields>, behavior: MockBehavior) -> Self {
        Self {
            fields,
            behavior,
            calls: AtomicUsize::new(0),
            last_image: Mutex::new(None),
        }
    }

    pub fn returning(fields: ExtractedFields) -> Self {
        Self::build(Some(fields), MockBehavior::Succeed)
    }

    /// Answers successfully with no fields
    pub fn absent() -> Self {
        Self::build(None, MockBehavior::Succeed)
    }

    pub fn failing() -> Self {
        Self::build(None, MockBehavior::Fail)
    }

    pub fn hanging() -> Self {
        Self::build(None, MockBehavior::Hang)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_image(&self) -> Option<Bytes> {
        lock(&self.last_image).clone()
    }
}

#[async_trait]
impl ReceiptExtractor for MockExtractor {
    async fn extract(
        &self,
        image: Bytes,
        _content_type: &str,
    ) -> ExtractionResult<Option<ExtractedFields>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_image) = Some(image);

        match self.behavior {
            MockBehavior::Succeed => Ok(self.fields.clone()),
            MockBehavior::Fail => Err(ExtractionError::Api {
                status: 503,
                message: "mock extractor unavailable".to_string(),
            }),
            MockBehavior::Hang => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
