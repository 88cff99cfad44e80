use thiserror::Error;

/// Top-level error type for the autotask service.
///
/// Covers process-level failures: configuration, server startup and I/O
/// outside of an action invocation. Failures inside an action never surface
/// here; the action crate classifies those into response envelopes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AutotaskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sandbox error: {0}")]
    Sandbox(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AutotaskError {
    fn from(err: toml::de::Error) -> Self {
        AutotaskError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AutotaskError {
    fn from(err: toml::ser::Error) -> Self {
        AutotaskError::Config(err.to_string())
    }
}

/// A specialized `Result` type for autotask operations.
pub type Result<T> = std::result::Result<T, AutotaskError>;
