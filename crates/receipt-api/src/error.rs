//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into `AppError` renders as a JSON [`ErrorResponse`] with the status,
//! code and logging level from [`ErrorMetadata`].

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use receipt_core::{AppError, ErrorMetadata, LogLevel};
use receipt_services::IngestionError;
use receipt_storage::StorageError;

pub use receipt_infra::ErrorResponse;

/// Wrapper type for AppError to implement IntoResponse
///
/// `IntoResponse` (axum) and `AppError` (receipt-core) are both foreign to
/// this crate, so the impl goes on a local newtype.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<validator::ValidationErrors> for HttpAppError {
    fn from(err: validator::ValidationErrors) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                "Error occurred"
            );
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

/// Build the response body, hiding details in production and for sensitive errors
pub(crate) fn error_body(app_error: &AppError, is_production: bool) -> ErrorResponse {
    let show_details = !is_production && !app_error.is_sensitive();
    ErrorResponse {
        error: app_error.client_message(),
        details: show_details.then(|| app_error.detailed_message()),
        error_type: show_details.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_body(app_error, is_production_env()))).into_response()
    }
}

// Convert domain errors to HttpAppError

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            StorageError::Cancelled => AppError::Storage(err_cancelled("upload")),
        };
        HttpAppError(app)
    }
}

fn err_cancelled(stage: &str) -> String {
    format!("{} cancelled before completion", stage)
}

impl From<IngestionError> for HttpAppError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::UploadFailed(cause) => HttpAppError::from(cause),
            IngestionError::ExtractionFailed(cause) => {
                HttpAppError(AppError::Extraction(cause.to_string()))
            }
            IngestionError::DateResolutionFailed(cause) if cause.is_caller_input() => {
                HttpAppError(AppError::InvalidInput(cause.to_string()))
            }
            IngestionError::DateResolutionFailed(cause) => {
                HttpAppError(AppError::DateUnresolved(cause.to_string()))
            }
            IngestionError::PersistenceFailed(cause) => HttpAppError(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use receipt_core::{DateError, DateSource};
    use receipt_extraction::ExtractionError;

    fn status_of(err: IngestionError) -> u16 {
        HttpAppError::from(err).0.http_status_code()
    }

    #[test]
    fn test_ingestion_errors_map_to_statuses() {
        assert_eq!(
            status_of(IngestionError::UploadFailed(StorageError::UploadFailed(
                "s3 down".into()
            ))),
            500
        );
        assert_eq!(
            status_of(IngestionError::ExtractionFailed(ExtractionError::Api {
                status: 503,
                message: "busy".into()
            })),
            502
        );
        assert_eq!(
            status_of(IngestionError::DateResolutionFailed(
                DateError::InvalidDate {
                    value: "2023/01/15".into(),
                    origin: DateSource::UserSupplied,
                }
            )),
            400
        );
        assert_eq!(
            status_of(IngestionError::DateResolutionFailed(
                DateError::InvalidDate {
                    value: "garbage".into(),
                    origin: DateSource::Extracted,
                }
            )),
            422
        );
        assert_eq!(
            status_of(IngestionError::DateResolutionFailed(
                DateError::NoDateAvailable
            )),
            422
        );
        assert_eq!(
            status_of(IngestionError::PersistenceFailed(AppError::Internal(
                "db".into()
            ))),
            500
        );
    }

    #[test]
    fn test_error_body_hides_details_when_sensitive_or_production() {
        let sensitive = AppError::Storage("bucket credentials rejected".into());
        let body = error_body(&sensitive, false);
        assert_eq!(body.code, "STORAGE_ERROR");
        assert!(body.details.is_none());

        let plain = AppError::InvalidInput("payer too long".into());
        let body = error_body(&plain, false);
        assert_eq!(body.error, "payer too long");
        assert!(body.details.is_some());
        assert_eq!(body.error_type.as_deref(), Some("InvalidInput"));

        let body = error_body(&plain, true);
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
    }
}
