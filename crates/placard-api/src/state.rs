//! Shared handler state.

use std::sync::Arc;

use placard_sync::NameSyncService;

/// State cloned into every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The sync service.
    pub service: Arc<NameSyncService>,
}

impl AppState {
    /// Wraps a service for sharing across requests.
    pub fn new(service: NameSyncService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
