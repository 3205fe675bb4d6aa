use std::sync::Arc;

use passport_pipeline::PassportActions;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Extraction and correction entry points, bound to the configured model.
    pub actions: Arc<PassportActions>,
}
