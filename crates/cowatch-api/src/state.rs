//! Shared application state, handed to handlers as `State<Arc<AppState>>`.

use crate::services::video_lifecycle::VideoLifecycleService;
use cowatch_core::Config;
use cowatch_db::VideoRepositoryTrait;
use cowatch_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<VideoLifecycleService>,
    /// Also held by `videos`; kept here for health checks.
    pub repository: Arc<dyn VideoRepositoryTrait>,
    pub storage: Arc<dyn Storage>,
}
