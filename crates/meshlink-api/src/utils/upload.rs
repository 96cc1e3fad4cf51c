//! Common utilities for the upload handlers

use crate::constants::{REPAIRED_SUFFIX, UPLOAD_FIELD};
use crate::error::MSG_NO_FILE;
use axum::extract::Multipart;
use axum::http::StatusCode;
use meshlink_core::AppError;

/// A file received through the multipart upload field.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub original_filename: String,
}

/// Extract the file from the multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::Validation(format!("Failed to read multipart: {}", e))
        }
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if file_data.is_some() {
            return Err(AppError::Validation(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }
        filename = field.file_name().map(|s| s.to_string());

        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(e.body_text())
            } else {
                AppError::Validation(format!("Failed to read file data: {}", e))
            }
        })?;
        file_data = Some(data.to_vec());
    }

    let data = file_data.ok_or_else(|| AppError::Validation(MSG_NO_FILE.to_string()))?;

    Ok(UploadedFile {
        data,
        original_filename: filename.unwrap_or_else(|| "unknown".to_string()),
    })
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size == 0 {
        return Err(AppError::Validation("File is empty".to_string()));
    }
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Validate file extension (case-insensitive)
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<String, AppError> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !allowed.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed.join(", ")
        )));
    }

    Ok(extension)
}

/// Sanitize filename to prevent path traversal and invalid characters.
/// Returns an error if the filename contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 200;

    let filename_only = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::Validation(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '_' || c == '.').is_empty() {
        return Ok("model.obj".to_string());
    }

    Ok(sanitized)
}

/// Display name for downloads: the original stem plus `_repaired`.
pub fn display_base_name(original_filename: &str) -> String {
    let stem = std::path::Path::new(original_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let safe: String = stem
        .chars()
        .take(120)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let safe = if safe.trim_matches('_').is_empty() {
        "model"
    } else {
        safe.as_str()
    };
    format!("{}{}", safe, REPAIRED_SUFFIX)
}
