//! Action handler trait and the handlers behind the catalogue.
//!
//! Defines the `ActionHandler` async trait, the execution context handed to
//! every handler, and the shared services handlers draw on.

pub mod clone_repo;
pub mod count_weekday;
pub mod datagen;
pub mod fetch_url;
pub mod format_markdown;
pub mod fs;
pub mod json;
pub mod markdown_index;
pub mod markdown_to_html;
pub mod process;
pub mod recent_logs;
pub mod sort_contacts;
pub mod ticket_sales;
pub mod transcribe;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use autotask_core::config::{DatagenConfig, LlmConfig, ProcessConfig};
use autotask_core::{AutotaskConfig, AutotaskError};

use crate::error::HandlerError;
use crate::guard::PathGuard;
use crate::types::ActionKind;

/// A single action behind the dispatch engine.
///
/// Handlers only touch paths handed to them through [`ActionContext`]; any
/// further path they discover (directory entries) goes through
/// [`ActionContext::resolve`] before it is opened.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn kind(&self) -> ActionKind;

    /// Run the action and return a human-readable success message.
    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError>;
}

/// A declared target after it passed the sandbox guard.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub role: &'static str,
    /// Sandbox-relative form, used in messages.
    pub relative: &'static str,
    pub path: PathBuf,
}

/// Everything a handler may use for one invocation.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub kind: ActionKind,
    params: HashMap<String, String>,
    targets: Vec<ResolvedTarget>,
    guard: PathGuard,
}

impl ActionContext {
    pub fn new(
        kind: ActionKind,
        params: HashMap<String, String>,
        targets: Vec<ResolvedTarget>,
        guard: PathGuard,
    ) -> Self {
        Self {
            kind,
            params,
            targets,
            guard,
        }
    }

    /// A validated parameter. Required parameters are checked by the
    /// executor, so a miss here is a domain error for optional ones.
    pub fn param(&self, name: &str) -> Result<&str, HandlerError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| HandlerError::domain(format!("missing parameter: {}", name)))
    }

    /// A declared target by role. A miss means the catalogue and the handler
    /// disagree, which is not the caller's fault.
    pub fn target(&self, role: &str) -> Result<&ResolvedTarget, HandlerError> {
        self.targets.iter().find(|t| t.role == role).ok_or_else(|| {
            HandlerError::unexpected(format!("{} has no declared target '{}'", self.kind, role))
        })
    }

    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    /// Check a path discovered at run time against the sandbox.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, HandlerError> {
        Ok(self.guard.resolve(path)?)
    }
}

/// Shared clients and settings handlers are built from.
#[derive(Debug, Clone)]
pub struct HandlerServices {
    pub http: reqwest::Client,
    pub process: ProcessConfig,
    pub llm: LlmConfig,
    pub datagen: DatagenConfig,
}

impl HandlerServices {
    pub fn from_config(config: &AutotaskConfig) -> Result<Self, AutotaskError> {
        let http = reqwest::Client::builder()
            .timeout(config.http.timeout())
            .build()
            .map_err(|e| AutotaskError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            process: config.process.clone(),
            llm: config.llm.clone(),
            datagen: config.datagen.clone(),
        })
    }
}
