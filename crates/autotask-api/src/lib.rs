//! autotask API crate - axum HTTP server and route handlers.
//!
//! Exposes the dispatch engine over HTTP: `POST /run` for tasks, plus
//! health and action listing endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
