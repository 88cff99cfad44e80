//! Task dispatch engine for autotask.
//!
//! Resolves free-text task descriptions to catalogued actions, runs them
//! inside a sandbox root, and folds every outcome into a uniform response
//! envelope.

pub mod envelope;
pub mod error;
pub mod executor;
pub mod guard;
pub mod handler;
pub mod orchestrator;
pub mod registry;
pub mod types;

pub use envelope::{EnvelopeStatus, ResponseEnvelope};
pub use error::{DispatchError, HandlerError, PathViolation};
pub use executor::ActionExecutor;
pub use guard::PathGuard;
pub use handler::{ActionContext, ActionHandler, HandlerServices};
pub use orchestrator::Dispatcher;
pub use registry::{ActionRegistry, RegisteredAction, CATALOGUE};
pub use types::{ActionKind, ActionSpec, ExecutionOutcome, PathTarget, TaskRequest};
