//! Application state shared by every handler.

use meshlink_core::Config;
use meshlink_processing::{MeshConverter, MeshRepairer};
use meshlink_services::DownloadRegistry;
use meshlink_storage::ScratchStorage;
use std::sync::Arc;

/// Explicitly owned service graph, built once at startup and handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub registry: Arc<DownloadRegistry>,
    pub storage: ScratchStorage,
    pub converter: Arc<dyn MeshConverter>,
    pub repairer: Arc<dyn MeshRepairer>,
}
