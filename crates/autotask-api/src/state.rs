//! Application state shared across all route handlers.
//!
//! AppState is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use autotask_action::Dispatcher;
use autotask_core::AutotaskConfig;
use chrono::{DateTime, Utc};

/// Shared application state.
///
/// All fields are cheap to clone; nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration as loaded at startup.
    pub config: Arc<AutotaskConfig>,
    /// Task dispatcher bound to the sandbox root.
    pub dispatcher: Arc<Dispatcher>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
    /// Wall-clock start time reported by `/health`.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AutotaskConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}
