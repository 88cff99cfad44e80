//! Git clone action handler.
//!
//! Clones into a scratch directory inside the sandbox and renames the
//! checkout into place, so a failed clone leaves no partial `repo/`.

use async_trait::async_trait;
use autotask_core::config::ProcessConfig;

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::process::run_tool;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

const ALLOWED_PREFIXES: &[&str] = &["https://", "http://", "git://", "ssh://", "git@"];

pub struct CloneRepoHandler {
    process: ProcessConfig,
}

impl CloneRepoHandler {
    pub fn new(process: ProcessConfig) -> Self {
        Self { process }
    }
}

/// Accept only remote URL forms git treats as a repository location.
pub fn validate_repo_url(url: &str) -> Result<(), HandlerError> {
    if url.starts_with('-') || url.chars().any(char::is_whitespace) {
        return Err(HandlerError::domain(format!("invalid repository URL: {}", url)));
    }
    if ALLOWED_PREFIXES.iter().any(|p| url.starts_with(p)) {
        Ok(())
    } else {
        Err(HandlerError::domain(format!(
            "unsupported repository URL: {}",
            url
        )))
    }
}

#[async_trait]
impl ActionHandler for CloneRepoHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::CloneRepo
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let repo_url = ctx.param("repo_url")?;
        validate_repo_url(repo_url)?;
        let destination = ctx.target("destination")?.clone();

        if destination.path.exists() {
            return Err(HandlerError::domain(format!(
                "{} failed: destination {} already exists",
                ActionKind::CloneRepo,
                destination.relative
            )));
        }

        let root = ctx.root().to_path_buf();
        let scratch = fs::blocking(move || {
            tempfile::Builder::new()
                .prefix(".clone-")
                .tempdir_in(&root)
                .map_err(|e| {
                    HandlerError::unexpected(format!("failed to create clone scratch: {}", e))
                })
        })
        .await?;
        let checkout = scratch.path().join("repo");

        run_tool(
            ActionKind::CloneRepo,
            &self.process.git,
            [
                std::ffi::OsStr::new("clone"),
                std::ffi::OsStr::new("--"),
                std::ffi::OsStr::new(repo_url),
                checkout.as_os_str(),
            ],
            ctx.root(),
            self.process.timeout(),
        )
        .await?;

        fs::blocking(move || {
            if !checkout.is_dir() {
                return Err(HandlerError::unexpected(
                    "git reported success but produced no checkout".to_string(),
                ));
            }
            std::fs::rename(&checkout, &destination.path).map_err(|e| {
                HandlerError::unexpected(format!(
                    "failed to move checkout into {}: {}",
                    destination.relative, e
                ))
            })?;
            drop(scratch);
            Ok(())
        })
        .await?;

        tracing::info!(repo_url = %repo_url, "Git repository cloned");
        Ok("Git repository cloned.".to_string())
    }
}
