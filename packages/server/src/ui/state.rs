//! Shared application state.

use crate::hub::Hub;

/// State handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the hub's event loop
    pub hub: Hub,
}

impl AppState {
    pub fn new(hub: Hub) -> Self {
        Self { hub }
    }
}
