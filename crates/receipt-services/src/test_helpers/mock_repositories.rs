//! Mock repository implementations for testing
//!
//! These mocks allow testing the ingestion workflow without a database.

use async_trait::async_trait;
use chrono::Utc;
use receipt_core::{AppError, NewReceipt, Receipt};
use receipt_db::ReceiptRepositoryTrait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::lock;

/// In-memory receipt repository
pub struct InMemoryReceiptRepository {
    receipts: Mutex<HashMap<Uuid, Receipt>>,
    fixed_id: Option<Uuid>,
    fail_saves: bool,
    healthy: AtomicBool,
    save_calls: AtomicUsize,
}

impl InMemoryReceiptRepository {
    fn build(fixed_id: Option<Uuid>, fail_saves: bool) -> Self {
        Self {
            receipts: Mutex::new(HashMap::new()),
            fixed_id,
            fail_saves,
            healthy: AtomicBool::new(true),
            save_calls: AtomicUsize::new(0),
        }
    }

    pub fn new() -> Self {
        Self::build(None, false)
    }

    /// Every save gets the same id
    pub fn with_fixed_id(id: Uuid) -> Self {
        Self::build(Some(id), false)
    }

    pub fn failing() -> Self {
        Self::build(None, true)
    }

    /// Make `ping` fail, as a down database would
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Store a receipt directly, bypassing the save counter
    pub fn insert(&self, receipt: Receipt) {
        lock(&self.receipts).insert(receipt.id, receipt);
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.receipts).is_empty()
    }
}

impl Default for InMemoryReceiptRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReceiptRepositoryTrait for InMemoryReceiptRepository {
    async fn save(&self, receipt: NewReceipt) -> Result<Receipt, AppError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(AppError::Internal("mock database unavailable".to_string()));
        }

        let id = self.fixed_id.unwrap_or_else(Uuid::new_v4);
        let saved = Receipt::from_new(receipt, id, Utc::now());
        lock(&self.receipts).insert(id, saved.clone());
        Ok(saved)
    }

    async fn get_receipt(&self, id: Uuid) -> Result<Option<Receipt>, AppError> {
        Ok(lock(&self.receipts).get(&id).cloned())
    }

    async fn list_receipts(&self, limit: i64, offset: i64) -> Result<Vec<Receipt>, AppError> {
        let mut receipts: Vec<Receipt> = lock(&self.receipts).values().cloned().collect();
        receipts.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(receipts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_receipts(&self) -> Result<i64, AppError> {
        Ok(lock(&self.receipts).len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Internal("mock database unavailable".to_string()))
        }
    }
}
