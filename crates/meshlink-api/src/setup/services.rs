//! Service graph construction

use crate::state::AppState;
use anyhow::{Context, Result};
use meshlink_core::{Config, SystemClock};
use meshlink_processing::{BasicRepairer, MeshCodec};
use meshlink_services::{CleanupService, DownloadRegistry};
use meshlink_storage::ScratchStorage;
use std::sync::Arc;

/// Build the application state: scratch storage, registry and mesh collaborators.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let storage = ScratchStorage::new(&config.scratch_dir)
        .await
        .context("Failed to initialize scratch storage")?;

    if config.purge_scratch_on_start {
        // Nothing registered by a previous process is reachable any more.
        storage
            .purge()
            .await
            .context("Failed to purge scratch directory")?;
    }

    tracing::info!(
        scratch_dir = %storage.base_path().display(),
        download_ttl_secs = config.download_ttl.as_secs(),
        "Scratch storage initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        registry: Arc::new(DownloadRegistry::new(Arc::new(SystemClock))),
        storage,
        converter: Arc::new(MeshCodec),
        repairer: Arc::new(BasicRepairer::default()),
    }))
}

/// Spawn the periodic expiration sweep, if enabled.
pub fn start_background_tasks(
    config: &Config,
    state: &Arc<AppState>,
) -> Option<tokio::task::JoinHandle<()>> {
    let period = config.cleanup_interval?;
    let service = Arc::new(CleanupService::new(state.registry.clone(), period));
    Some(service.start())
}
