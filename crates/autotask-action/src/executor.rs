//! Action execution with parameter validation and sandbox checks.
//!
//! Every invocation runs on its own task so a panicking handler is reported
//! as an unexpected failure instead of taking the request down with it.

use std::collections::HashMap;

use crate::error::{DispatchError, HandlerError};
use crate::guard::PathGuard;
use crate::handler::{ActionContext, ResolvedTarget};
use crate::registry::RegisteredAction;
use crate::types::{ActionSpec, ExecutionOutcome};

/// Runs registered actions inside one sandbox root.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    guard: PathGuard,
}

impl ActionExecutor {
    pub fn new(guard: PathGuard) -> Self {
        Self { guard }
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Validate, guard and run `action` with `params`.
    pub async fn invoke(
        &self,
        action: &RegisteredAction,
        params: &HashMap<String, String>,
    ) -> ExecutionOutcome {
        let kind = action.spec.kind;

        if let Err(err) = check_params(&action.spec, params) {
            tracing::info!(action = %kind, error = %err, "Rejected action parameters");
            return ExecutionOutcome::DomainError(err.to_string());
        }

        let targets = match self.resolve_targets(&action.spec) {
            Ok(targets) => targets,
            Err(err) => return ExecutionOutcome::DomainError(err.to_string()),
        };

        let ctx = ActionContext::new(kind, params.clone(), targets, self.guard.clone());
        let handler = action.handler.clone();
        let joined = tokio::spawn(async move { handler.execute(&ctx).await }).await;

        let outcome = match joined {
            Ok(Ok(message)) => ExecutionOutcome::Success(message),
            Ok(Err(HandlerError::Domain(message))) => ExecutionOutcome::DomainError(message),
            Ok(Err(HandlerError::Unexpected(message))) => {
                ExecutionOutcome::UnexpectedError(format!("{} failed: {}", kind, message))
            }
            Err(join_err) if join_err.is_panic() => {
                tracing::error!(action = %kind, "Action handler panicked");
                ExecutionOutcome::UnexpectedError(format!("{} failed: handler panicked", kind))
            }
            Err(join_err) => {
                ExecutionOutcome::UnexpectedError(format!("{} failed: {}", kind, join_err))
            }
        };

        match &outcome {
            ExecutionOutcome::Success(_) => {
                tracing::info!(action = %kind, "Action completed");
            }
            ExecutionOutcome::DomainError(message) => {
                tracing::warn!(action = %kind, error = %message, "Action failed");
            }
            ExecutionOutcome::UnexpectedError(message) => {
                tracing::error!(action = %kind, error = %message, "Action failed unexpectedly");
            }
        }
        outcome
    }

    fn resolve_targets(&self, spec: &ActionSpec) -> Result<Vec<ResolvedTarget>, DispatchError> {
        spec.targets
            .iter()
            .map(|target| {
                let path = self.guard.resolve(target.path).map_err(|violation| {
                    tracing::warn!(
                        action = %spec.kind,
                        path = target.path,
                        error = %violation,
                        "Declared target rejected by sandbox guard"
                    );
                    DispatchError::SandboxViolation
                })?;
                Ok(ResolvedTarget {
                    role: target.role,
                    relative: target.path,
                    path,
                })
            })
            .collect()
    }
}

/// Required parameters must be present and non-empty.
fn check_params(spec: &ActionSpec, params: &HashMap<String, String>) -> Result<(), DispatchError> {
    for name in spec.required_params {
        match params.get(*name) {
            Some(value) if !value.is_empty() => {}
            _ => return Err(DispatchError::MissingParameter(name.to_string())),
        }
    }
    Ok(())
}
