//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use receipt_core::models::{Receipt, ReceiptListResponse};

/// Returns the OpenAPI document served at `/api/openapi.json`
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Receipt API",
        version = "0.1.0",
        description = "Receipt ingestion API (v0). Upload a receipt image; the service stores it, reads the date, store, items and total, and keeps the record. All resource endpoints are under /api/v0/."
    ),
    paths(
        handlers::receipts::create_receipt,
        handlers::receipts::get_receipt,
        handlers::receipts::list_receipts,
        handlers::health::health_check,
    ),
    components(schemas(
        Receipt,
        ReceiptListResponse,
        ErrorResponse,
        handlers::health::HealthCheckResponse,
    )),
    tags(
        (name = "receipts", description = "Receipt ingestion and lookup"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
