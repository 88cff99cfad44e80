//! Request dispatcher.
//!
//! Coordinates the full pipeline from a raw task request through registry
//! lookup and action execution to the response envelope.

use std::sync::Arc;

use crate::envelope::ResponseEnvelope;
use crate::error::DispatchError;
use crate::executor::ActionExecutor;
use crate::registry::ActionRegistry;
use crate::types::{ActionSpec, TaskRequest};

/// Entry point shared by every request. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    executor: ActionExecutor,
}

impl Dispatcher {
    pub fn new(registry: ActionRegistry, executor: ActionExecutor) -> Self {
        Self {
            registry: Arc::new(registry),
            executor,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn actions(&self) -> Vec<ActionSpec> {
        self.registry.specs()
    }

    /// Resolve and run `request`, always producing an envelope.
    pub async fn dispatch(&self, request: &TaskRequest) -> ResponseEnvelope {
        let task = match request.task.as_deref() {
            Some(task) if !task.is_empty() => task,
            _ => return ResponseEnvelope::from_error(&DispatchError::MissingTask),
        };

        let Some(action) = self.registry.resolve(task) else {
            tracing::info!(task = %task, "No action matches task");
            return ResponseEnvelope::from_error(&DispatchError::UnrecognizedTask);
        };

        tracing::debug!(
            task = %task,
            action = %action.spec.kind,
            ordinal = action.ordinal,
            "Task resolved"
        );
        let outcome = self.executor.invoke(action, &request.params).await;
        ResponseEnvelope::from_outcome(outcome)
    }
}
