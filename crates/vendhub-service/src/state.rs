//! Application state.

use std::sync::Arc;

use vendhub_store::InventoryStore;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage engine.
    pub store: Arc<InventoryStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<InventoryStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }
}
