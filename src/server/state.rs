//! Shared application state for the axum handlers.

use std::sync::Arc;

use super::registry::SessionRegistry;
use super::router::MessageRouter;

/// Shared application state
pub struct AppState {
    /// Live connections and their metadata
    pub registry: Arc<SessionRegistry>,
    /// Orchestration core handling decoded inbound events
    pub router: MessageRouter,
}
