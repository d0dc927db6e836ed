use std::sync::Arc;

use crate::page::DiscoveryController;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DiscoveryController>,
}

impl AppState {
    pub fn new(controller: DiscoveryController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}
