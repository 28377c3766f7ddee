//! Application State

use std::sync::Arc;

use toolkit_adapters::Toolkit;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Filtered catalogue and dispatcher
    pub toolkit: Arc<Toolkit>,
}

impl AppState {
    pub fn new(toolkit: Toolkit) -> Self {
        Self {
            toolkit: Arc::new(toolkit),
        }
    }
}
