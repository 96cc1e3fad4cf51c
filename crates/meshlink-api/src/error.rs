//! HTTP error response conversion
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>` and let `?` turn
//! `AppError` and the crate-local errors (storage, conversion, registry) into a consistent
//! JSON response. The file download endpoint returns `PlainTextError` instead, which
//! renders the same status with a `text/plain` body.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use meshlink_core::config::is_production_name;
use meshlink_core::{AppError, ErrorMetadata, LogLevel, MeshFormat};
use meshlink_processing::ConversionError;
use meshlink_services::RegistryError;
use meshlink_storage::StorageError;

pub use meshlink_infra::ErrorResponse;

pub const MSG_NOT_FOUND: &str = "Invalid or expired download link.";
pub const MSG_EXPIRED: &str = "Download link has expired.";
pub const MSG_NO_FILE: &str = "No file uploaded";
pub const MSG_CONVERSION_FAILED: &str = "Error converting file format.";

/// Message for a `format` parameter naming no supported format.
pub fn invalid_format_message() -> String {
    format!("Invalid format. Use {}.", MeshFormat::supported_list())
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from meshlink-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

/// Same as [`HttpAppError`], rendered as plain text.
#[derive(Debug)]
pub struct PlainTextError(pub AppError);

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
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| is_production_name(&env))
        .unwrap_or(false)
}

fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);

        // Details only outside production, and never for sensitive errors.
        let show_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
        };

        (status_of(app_error), Json(body)).into_response()
    }
}

impl IntoResponse for PlainTextError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);

        (
            status_of(app_error),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            app_error.client_message(),
        )
            .into_response()
    }
}

/// Maps crate-local errors onto `AppError` once, for both response wrappers.
struct AppErrorMapping(AppError);

impl From<StorageError> for AppErrorMapping {
    fn from(err: StorageError) -> Self {
        AppErrorMapping(match err {
            StorageError::NotFound(msg) => AppError::FileMissing(msg),
            StorageError::InvalidPath(msg) => AppError::Internal(format!("Invalid path: {}", msg)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::WriteFailed(msg)
            | StorageError::ReadFailed(msg)
            | StorageError::DeleteFailed(msg) => AppError::Storage(msg),
        })
    }
}

impl From<ConversionError> for AppErrorMapping {
    fn from(err: ConversionError) -> Self {
        if err.is_input_error() {
            tracing::debug!(error = %err, "Mesh rejected");
        } else {
            tracing::warn!(error = %err, "Mesh conversion failed");
        }
        AppErrorMapping(AppError::Conversion(err.to_string()))
    }
}

impl From<RegistryError> for AppErrorMapping {
    fn from(err: RegistryError) -> Self {
        AppErrorMapping(match err {
            RegistryError::NotFound => AppError::NotFound(MSG_NOT_FOUND.to_string()),
            RegistryError::Expired => AppError::Expired(MSG_EXPIRED.to_string()),
        })
    }
}

macro_rules! impl_error_conversions {
    ($wrapper:ident) => {
        impl From<AppError> for $wrapper {
            fn from(err: AppError) -> Self {
                $wrapper(err)
            }
        }

        impl From<anyhow::Error> for $wrapper {
            fn from(err: anyhow::Error) -> Self {
                $wrapper(AppError::from(err))
            }
        }

        impl From<StorageError> for $wrapper {
            fn from(err: StorageError) -> Self {
                $wrapper(AppErrorMapping::from(err).0)
            }
        }

        impl From<ConversionError> for $wrapper {
            fn from(err: ConversionError) -> Self {
                $wrapper(AppErrorMapping::from(err).0)
            }
        }

        impl From<RegistryError> for $wrapper {
            fn from(err: RegistryError) -> Self {
                $wrapper(AppErrorMapping::from(err).0)
            }
        }

        impl From<tokio::task::JoinError> for $wrapper {
            fn from(err: tokio::task::JoinError) -> Self {
                $wrapper(AppError::Internal(format!("Background task failed: {}", err)))
            }
        }
    };
}

impl_error_conversions!(HttpAppError);
impl_error_conversions!(PlainTextError);
