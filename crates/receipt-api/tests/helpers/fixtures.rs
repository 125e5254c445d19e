//! Test fixtures: image blobs, multipart forms and stored receipts.

use axum_test::multipart::{MultipartForm, Part};
use chrono::{NaiveDate, Utc};
use receipt_core::{NewReceipt, Receipt};
use uuid::Uuid;

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

pub fn image_part(data: Vec<u8>) -> Part {
    Part::bytes(data)
        .file_name("lunch.png")
        .mime_type("image/png")
}

/// A complete receipt upload; `date` is sent only when given
pub fn receipt_form(date: Option<&str>) -> MultipartForm {
    let form = MultipartForm::new()
        .add_text("payer", "Alice")
        .add_text("paymentMethod", "Card");
    let form = match date {
        Some(date) => form.add_text("date", date.to_string()),
        None => form,
    };
    form.add_part("receiptImage", image_part(create_minimal_png()))
}

/// A saved receipt with the given transaction date
pub fn stored_receipt(date: &str, store: &str) -> Receipt {
    let draft = NewReceipt {
        transaction_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
        store_name: store.to_string(),
        items: "Coffee".to_string(),
        total_amount: 450,
        payer: "Bob".to_string(),
        payment_method: "Cash".to_string(),
        image_url: format!("http://storage.test/{}.png", store),
    };
    Receipt::from_new(draft, Uuid::new_v4(), Utc::now())
}
