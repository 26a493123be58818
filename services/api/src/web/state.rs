//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::pipeline::ContentPipeline;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: ContentPipeline,
}

impl AppState {
    pub fn new(config: Arc<Config>, pipeline: ContentPipeline) -> Self {
        Self { config, pipeline }
    }

    /// `"live"` when a backend is configured, otherwise `"demo"`.
    pub fn mode(&self) -> &'static str {
        if self.pipeline.is_live() {
            "live"
        } else {
            "demo"
        }
    }
}
