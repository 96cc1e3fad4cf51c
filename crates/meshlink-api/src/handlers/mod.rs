pub mod delete_download;
pub mod download;
pub mod download_info;
pub mod generate_link;
pub mod health;
pub mod pages;
pub mod repair;

use crate::error::invalid_format_message;
use meshlink_core::{AppError, MeshFormat};

/// Parse the optional `format` query parameter; absent means the canonical format.
pub(crate) fn requested_format(format: Option<&str>) -> Result<MeshFormat, AppError> {
    match format {
        None => Ok(MeshFormat::CANONICAL),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Validation(invalid_format_message())),
    }
}
