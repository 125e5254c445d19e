//! Mock storage implementation for testing

use async_trait::async_trait;
use bytes::Bytes;
use receipt_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{lock, MockBehavior};

/// Storage double that keeps uploads in memory and always returns the same URL
pub struct MockStorage {
    url: String,
    behavior: MockBehavior,
    upload_calls: AtomicUsize,
    objects: Mutex<HashMap<String, Bytes>>,
    last_upload: Mutex<Option<(String, Bytes)>>,
}

impl MockStorage {
    fn build(url: &str, behavior: MockBehavior) -> Self {
        Self {
            url: url.to_string(),
            behavior,
            upload_calls: AtomicUsize::new(0),
            objects: Mutex::new(HashMap::new()),
            last_upload: Mutex::new(None),
        }
    }

    pub fn new() -> Self {
        Self::build("http://storage.test/receipt.jpg", MockBehavior::Succeed)
    }

    pub fn with_url(url: &str) -> Self {
        Self::build(url, MockBehavior::Succeed)
    }

    pub fn failing() -> Self {
        Self::build("", MockBehavior::Fail)
    }

    pub fn hanging() -> Self {
        Self::build("", MockBehavior::Hang)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    /// Filename hint and bytes of the most recent upload
    pub fn last_upload(&self) -> Option<(String, Bytes)> {
        lock(&self.last_upload).clone()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<(String, String)> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_upload) = Some((filename.to_string(), data.clone()));

        match self.behavior {
            MockBehavior::Succeed => {
                let key = format!("receipts/test/{}", filename);
                lock(&self.objects).insert(key.clone(), data);
                Ok((key, self.url.clone()))
            }
            MockBehavior::Fail => Err(StorageError::UploadFailed(
                "mock storage unavailable".to_string(),
            )),
            MockBehavior::Hang => std::future::pending().await,
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        match self.behavior {
            MockBehavior::Fail => Err(StorageError::BackendError(
                "mock storage unavailable".to_string(),
            )),
            _ => Ok(lock(&self.objects).contains_key(storage_key)),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
