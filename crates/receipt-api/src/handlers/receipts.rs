use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use receipt_core::models::{ListReceiptsQuery, Receipt, ReceiptListResponse};
use receipt_core::AppError;
use receipt_services::CreateReceiptRequest;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_receipt_form, validate_upload};

/// Upload a receipt image
///
/// Multipart fields: `date` (optional, `YYYY-MM-DD`), `payer`, `paymentMethod`
/// and the file `receiptImage`. The image is stored, read by the extraction
/// service and saved together with the resolved transaction date. A date sent
/// by the caller always wins over the one read from the image.
#[utoipa::path(
    post,
    path = "/api/v0/receipts",
    tag = "receipts",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Receipt ingested", body = Receipt),
        (status = 400, description = "Invalid form or date", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse),
        (status = 422, description = "No usable transaction date", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse),
        (status = 502, description = "Extraction service failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "create_receipt"))]
pub async fn create_receipt(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = extract_receipt_form(multipart).await?;
    form.validate()?;
    let filename = validate_upload(&form, &state.upload)?;

    let request = CreateReceiptRequest {
        date: form.date,
        payer: form.payer,
        payment_method: form.payment_method,
        image: form.image,
        filename,
        content_type: form.content_type,
    };

    let cancel = state.shutdown.child_token();
    let deadline = state.request_timeout.map(|timeout| {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            tracing::warn!(timeout_secs = timeout.as_secs(), "Receipt ingestion deadline reached");
            cancel.cancel();
        })
    });

    let result = state.ingestion.create_receipt(request, &cancel).await;

    if let Some(handle) = deadline {
        handle.abort();
    }

    let receipt = result?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(
    get,
    path = "/api/v0/receipts/{id}",
    tag = "receipts",
    params(
        ("id" = Uuid, Path, description = "Receipt ID")
    ),
    responses(
        (status = 200, description = "Receipt found", body = Receipt),
        (status = 404, description = "Receipt not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(receipt_id = %id, operation = "get_receipt"))]
pub async fn get_receipt(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let receipt = state
        .receipts
        .get_receipt(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Receipt not found".to_string()))?;

    Ok(Json(receipt))
}

#[utoipa::path(
    get,
    path = "/api/v0/receipts",
    tag = "receipts",
    params(ListReceiptsQuery),
    responses(
        (status = 200, description = "Receipts, newest transaction date first", body = ReceiptListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(
    limit = query.limit(),
    offset = query.offset(),
    operation = "list_receipts"
))]
pub async fn list_receipts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListReceiptsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = query.limit();
    let offset = query.offset();

    let receipts = state.receipts.list_receipts(limit, offset).await?;
    let total = state.receipts.count_receipts().await?;

    Ok(Json(ReceiptListResponse {
        receipts,
        total,
        limit,
        offset,
    }))
}
