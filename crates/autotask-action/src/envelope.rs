//! Uniform response envelope for every dispatch outcome.

use serde::Serialize;

use crate::error::DispatchError;
use crate::types::ExecutionOutcome;

/// Prefix carried by every unexpected failure returned to callers.
pub const UNEXPECTED_PREFIX: &str = "Unexpected error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// JSON body plus the HTTP status code it is sent with.
///
/// Exactly one of `output` and `error` is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub code: u16,
}

impl ResponseEnvelope {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            output: Some(output.into()),
            error: None,
            code: 200,
        }
    }

    fn failure(error: String, code: u16) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            output: None,
            error: Some(error),
            code,
        }
    }

    pub fn from_outcome(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Success(msg) => Self::success(msg),
            ExecutionOutcome::DomainError(msg) => Self::failure(msg, 400),
            ExecutionOutcome::UnexpectedError(msg) => {
                Self::failure(format!("{}{}", UNEXPECTED_PREFIX, msg), 500)
            }
        }
    }

    pub fn from_error(err: &DispatchError) -> Self {
        match err {
            DispatchError::UnexpectedFailure(msg) => {
                Self::failure(format!("{}{}", UNEXPECTED_PREFIX, msg), err.status_code())
            }
            other => Self::failure(other.to_string(), other.status_code()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EnvelopeStatus::Success
    }
}

impl From<ExecutionOutcome> for ResponseEnvelope {
    fn from(outcome: ExecutionOutcome) -> Self {
        Self::from_outcome(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let env = ResponseEnvelope::from_outcome(ExecutionOutcome::Success("ok".into()));
        assert_eq!(env.code, 200);
        assert!(env.is_success());
        assert_eq!(
            serde_json::to_string(&env).unwrap(),
            r#"{"status":"success","output":"ok"}"#
        );
    }

    #[test]
    fn test_domain_error_envelope() {
        let env = ResponseEnvelope::from_outcome(ExecutionOutcome::DomainError(
            "Task not recognized".into(),
        ));
        assert_eq!(env.code, 400);
        assert_eq!(
            serde_json::to_string(&env).unwrap(),
            r#"{"status":"error","error":"Task not recognized"}"#
        );
    }

    #[test]
    fn test_unexpected_error_is_prefixed() {
        let env = ResponseEnvelope::from_outcome(ExecutionOutcome::UnexpectedError(
            "sort_contacts failed: disk full".into(),
        ));
        assert_eq!(env.code, 500);
        assert_eq!(
            env.error.as_deref(),
            Some("Unexpected error: sort_contacts failed: disk full")
        );
    }

    #[test]
    fn test_from_dispatch_error() {
        let env = ResponseEnvelope::from_error(&DispatchError::MissingTask);
        assert_eq!(env.code, 400);
        assert_eq!(env.error.as_deref(), Some("Task description is required"));

        let env = ResponseEnvelope::from_error(&DispatchError::UnexpectedFailure("x".into()));
        assert_eq!(env.code, 500);
        assert_eq!(env.error.as_deref(), Some("Unexpected error: x"));
    }
}
