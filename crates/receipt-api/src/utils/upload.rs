//! Receipt upload form parsing and validation

use axum::extract::Multipart;
use bytes::Bytes;
use receipt_core::AppError;
use validator::Validate;

use crate::error::HttpAppError;
use crate::state::UploadConfig;

pub const FIELD_DATE: &str = "date";
pub const FIELD_PAYER: &str = "payer";
pub const FIELD_PAYMENT_METHOD: &str = "paymentMethod";
pub const FIELD_IMAGE: &str = "receiptImage";

/// Parsed `POST /receipts` form
#[derive(Debug, Validate)]
pub struct ReceiptUploadForm {
    pub date: Option<String>,
    #[validate(length(max = 255, message = "payer must be at most 255 characters"))]
    pub payer: String,
    #[validate(length(max = 64, message = "paymentMethod must be at most 64 characters"))]
    pub payment_method: String,
    pub image: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// Read the receipt form. Unknown fields are ignored; exactly one image is required.
pub async fn extract_receipt_form(
    mut multipart: Multipart,
) -> Result<ReceiptUploadForm, HttpAppError> {
    let mut date: Option<String> = None;
    let mut payer = String::new();
    let mut payment_method = String::new();
    let mut image: Option<(Bytes, String, String)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FIELD_DATE => date = date_field(field.text().await?),
            FIELD_PAYER => payer = field.text().await?.trim().to_string(),
            FIELD_PAYMENT_METHOD => payment_method = field.text().await?.trim().to_string(),
            FIELD_IMAGE => {
                if image.is_some() {
                    return Err(AppError::InvalidInput(format!(
                        "Multiple image fields are not allowed; send exactly one field named '{}'",
                        FIELD_IMAGE
                    ))
                    .into());
                }
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await?;
                image = Some((data, filename, content_type));
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let (image, filename, content_type) = image.ok_or_else(|| {
        AppError::InvalidInput(format!("No receipt image provided in '{}'", FIELD_IMAGE))
    })?;

    if image.is_empty() {
        return Err(AppError::InvalidInput("Receipt image is empty".to_string()).into());
    }

    Ok(ReceiptUploadForm {
        date,
        payer,
        payment_method,
        image,
        filename,
        content_type,
    })
}

/// The `date` field goes to date resolution as sent; only an empty value
/// counts as "not supplied".
fn date_field(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Check size, extension and content type, and return the sanitized filename
pub fn validate_upload(form: &ReceiptUploadForm, limits: &UploadConfig) -> Result<String, AppError> {
    validate_file_size(form.image.len(), limits.max_file_size_bytes)?;
    let filename = sanitize_filename(&form.filename)?;
    validate_file_extension(&filename, &limits.allowed_extensions)?;
    validate_content_type(&form.content_type, &limits.allowed_content_types)?;
    Ok(filename)
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate content type against allowlist. Compares normalized MIME type only.
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Validate file extension
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    };

    if !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Sanitize filename to prevent path traversal and invalid characters.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}
