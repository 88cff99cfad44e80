pub mod config;
pub mod error;

pub use config::AutotaskConfig;
pub use error::{AutotaskError, Result};
