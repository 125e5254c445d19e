//! Ingestion against the real local storage backend.
//!
//! Run with: `cargo test -p receipt-services --test ingestion_local_storage_test`

use bytes::Bytes;
use chrono::NaiveDate;
use receipt_services::test_helpers::{sample_fields, InMemoryReceiptRepository, MockExtractor};
use receipt_services::{
    CreateReceiptRequest, IngestionError, IngestionStage, ReceiptIngestionService,
    ReceiptRepositoryTrait,
};
use receipt_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

async fn local_storage(dir: &std::path::Path) -> Arc<LocalStorage> {
    Arc::new(
        LocalStorage::new(dir, "http://localhost:8080/files".to_string())
            .await
            .expect("Failed to create local storage"),
    )
}

fn request(date: Option<&str>) -> CreateReceiptRequest {
    CreateReceiptRequest {
        date: date.map(str::to_string),
        payer: "Bob".to_string(),
        payment_method: "Cash".to_string(),
        image: Bytes::from_static(PNG_HEADER),
        filename: "lunch.PNG".to_string(),
        content_type: "image/png".to_string(),
    }
}

#[tokio::test]
async fn test_image_lands_on_disk_and_url_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(dir.path()).await;
    let repository = Arc::new(InMemoryReceiptRepository::new());
    let service = ReceiptIngestionService::new(
        storage.clone(),
        Arc::new(MockExtractor::returning(sample_fields())),
        repository.clone(),
    );

    let receipt = service
        .create_receipt(request(None), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        receipt.transaction_date,
        NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
    );
    assert_eq!(receipt.payer, "Bob");

    let key = receipt
        .image_url
        .strip_prefix("http://localhost:8080/files/")
        .expect("image url should point at the local base url");
    assert!(key.starts_with("receipts/"));
    assert!(key.ends_with(".png"));
    assert!(storage.exists(key).await.unwrap());

    let on_disk = tokio::fs::read(dir.path().join(key)).await.unwrap();
    assert_eq!(on_disk, PNG_HEADER);

    assert_eq!(repository.count_receipts().await.unwrap(), 1);
}

#[tokio::test]
async fn test_image_is_kept_when_date_cannot_be_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local_storage(dir.path()).await;
    let repository = Arc::new(InMemoryReceiptRepository::new());
    let service = ReceiptIngestionService::new(
        storage,
        Arc::new(MockExtractor::absent()),
        repository.clone(),
    );

    let err = service
        .create_receipt(request(None), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), IngestionStage::DateResolution);
    assert!(matches!(err, IngestionError::DateResolutionFailed(_)));
    assert_eq!(repository.save_calls(), 0);

    let year_dirs: Vec<_> = std::fs::read_dir(dir.path().join("receipts"))
        .unwrap()
        .collect();
    assert_eq!(year_dirs.len(), 1);
}
