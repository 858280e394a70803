//! Application state shared by all request handlers.

use photodup_core::JobRegistry;

/// Application state containing shared resources.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Scan jobs over the served photo store
    pub registry: JobRegistry,
}

impl AppState {
    pub fn new(registry: JobRegistry) -> Self {
        Self { registry }
    }
}
