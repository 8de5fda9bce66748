//! Application state shared by all handlers.

use crate::auth::JwtService;
use reelstore_core::Config;
use reelstore_processing::IngestPipeline;
use reelstore_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: JwtService,
    pub pipeline: Arc<IngestPipeline>,
    /// Video object store, kept for health reporting.
    pub video_storage: Arc<dyn Storage>,
}
