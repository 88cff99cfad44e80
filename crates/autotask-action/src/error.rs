//! Error types for the dispatch engine.

use std::path::PathBuf;

/// Request-level failures, one variant per response class.
///
/// `MissingTask`, `MissingParameter` and `UnrecognizedTask` are raised by the
/// engine before any handler runs; `SandboxViolation` by the path guard;
/// the last two carry a handler's own classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Task description is required")]
    MissingTask,
    #[error("missing parameter: {0}")]
    MissingParameter(String),
    #[error("Task not recognized")]
    UnrecognizedTask,
    #[error("path outside sandbox")]
    SandboxViolation,
    #[error("{0}")]
    DomainFailure(String),
    #[error("{0}")]
    UnexpectedFailure(String),
}

impl DispatchError {
    /// HTTP status code this failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::UnexpectedFailure(_) => 500,
            _ => 400,
        }
    }
}

/// Failure reported by an action handler.
///
/// Handlers decide which of their failure modes are expected (`Domain`) and
/// which are not (`Unexpected`); the executor never reclassifies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    Domain(String),
    #[error("{0}")]
    Unexpected(String),
}

impl HandlerError {
    pub fn domain(msg: impl Into<String>) -> Self {
        HandlerError::Domain(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        HandlerError::Unexpected(msg.into())
    }
}

impl From<PathViolation> for HandlerError {
    fn from(err: PathViolation) -> Self {
        tracing::warn!(error = %err, "Handler path rejected by sandbox guard");
        HandlerError::Domain(DispatchError::SandboxViolation.to_string())
    }
}

/// Why the path guard refused a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathViolation {
    #[error("path escapes sandbox root: {0}")]
    Outside(PathBuf),
    #[error("dangling symlink inside sandbox: {0}")]
    DanglingSymlink(PathBuf),
    #[error("cannot resolve {path}: {reason}")]
    Unresolvable { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_display() {
        assert_eq!(
            DispatchError::MissingTask.to_string(),
            "Task description is required"
        );
        assert_eq!(
            DispatchError::MissingParameter("email".to_string()).to_string(),
            "missing parameter: email"
        );
        assert_eq!(
            DispatchError::UnrecognizedTask.to_string(),
            "Task not recognized"
        );
        assert_eq!(
            DispatchError::SandboxViolation.to_string(),
            "path outside sandbox"
        );
        assert_eq!(
            DispatchError::DomainFailure("input file not found: dates.txt".to_string())
                .to_string(),
            "input file not found: dates.txt"
        );
    }

    #[test]
    fn test_dispatch_error_status_codes() {
        assert_eq!(DispatchError::MissingTask.status_code(), 400);
        assert_eq!(DispatchError::MissingParameter("x".into()).status_code(), 400);
        assert_eq!(DispatchError::UnrecognizedTask.status_code(), 400);
        assert_eq!(DispatchError::SandboxViolation.status_code(), 400);
        assert_eq!(DispatchError::DomainFailure("x".into()).status_code(), 400);
        assert_eq!(DispatchError::UnexpectedFailure("x".into()).status_code(), 500);
    }

    #[test]
    fn test_path_violation_becomes_domain_error() {
        let err: HandlerError = PathViolation::Outside(PathBuf::from("/etc/passwd")).into();
        assert_eq!(err, HandlerError::Domain("path outside sandbox".to_string()));
    }

    #[test]
    fn test_handler_error_constructors() {
        assert!(matches!(HandlerError::domain("x"), HandlerError::Domain(_)));
        assert!(matches!(
            HandlerError::unexpected("x"),
            HandlerError::Unexpected(_)
        ));
    }
}
