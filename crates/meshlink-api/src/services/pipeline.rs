//! Upload → repair pipeline
//!
//! Every scratch file created here is held by a [`ScratchFile`] guard, so an early
//! return at any step deletes whatever was written so far.

use crate::constants::UPLOAD_EXTENSION;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{
    display_base_name, sanitize_filename, validate_file_extension, validate_file_size,
    UploadedFile,
};
use meshlink_core::MeshFormat;
use meshlink_processing::{RepairOptions, RepairSummary};
use meshlink_storage::ScratchFile;

/// A repaired mesh stored in canonical OBJ form, still owned by the request.
pub struct RepairedUpload {
    /// The canonical artifact. Dropping it deletes the file; `keep()` hands it on.
    pub canonical: ScratchFile,
    /// Display name without extension, e.g. `bracket_repaired`.
    pub base_name: String,
    pub summary: RepairSummary,
}

#[tracing::instrument(
    skip(state, upload),
    fields(
        filename = %upload.original_filename,
        size = upload.data.len(),
        reorient = options.reorient
    )
)]
pub async fn repair_upload(
    state: &AppState,
    upload: UploadedFile,
    options: RepairOptions,
) -> Result<RepairedUpload, HttpAppError> {
    validate_file_size(upload.data.len(), state.config.max_file_size_bytes)?;
    validate_file_extension(&upload.original_filename, &[UPLOAD_EXTENSION])?;
    let safe_name = sanitize_filename(&upload.original_filename)?;
    let base_name = display_base_name(&upload.original_filename);

    let input = state
        .storage
        .write(state.storage.allocate_named(&safe_name), &upload.data)
        .await?;
    drop(upload);

    let output = ScratchFile::new(state.storage.allocate(MeshFormat::CANONICAL.extension()));

    let repairer = state.repairer.clone();
    let input_path = input.path().to_path_buf();
    let output_path = output.path().to_path_buf();
    let summary = tokio::task::spawn_blocking(move || {
        repairer.repair(&input_path, &output_path, &options)
    })
    .await??;

    // The upload itself is no longer needed once the canonical file exists.
    drop(input);

    tracing::info!(
        base_name = %base_name,
        final_vertices = summary.final_vertices,
        final_faces = summary.final_faces,
        "Upload repaired"
    );

    Ok(RepairedUpload {
        canonical: output,
        base_name,
        summary,
    })
}
