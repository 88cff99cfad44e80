//! Markdown formatting action handler.
//!
//! Runs a pinned prettier release over `format.md`. Prettier works on a
//! staged copy; the original is only replaced once it exits cleanly.

use std::io::Write;

use async_trait::async_trait;
use autotask_core::config::ProcessConfig;

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::process::run_tool;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub const PRETTIER: &str = "prettier@3.4.2";

pub struct FormatMarkdownHandler {
    process: ProcessConfig,
}

impl FormatMarkdownHandler {
    pub fn new(process: ProcessConfig) -> Self {
        Self { process }
    }
}

#[async_trait]
impl ActionHandler for FormatMarkdownHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::FormatMarkdown
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let input = ctx.target("input")?.clone();

        let staging = input.clone();
        let staged = fs::blocking(move || {
            let content = std::fs::read(&staging.path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => HandlerError::domain(format!(
                    "input file not found: {}",
                    staging.relative
                )),
                _ => HandlerError::unexpected(format!(
                    "failed to read {}: {}",
                    staging.relative, e
                )),
            })?;
            let mut staged = fs::stage_beside(&staging.path, staging.relative, ".md")?;
            staged.write_all(&content).map_err(|e| {
                HandlerError::unexpected(format!("failed to stage {}: {}", staging.relative, e))
            })?;
            Ok(staged)
        })
        .await?;

        run_tool(
            ActionKind::FormatMarkdown,
            &self.process.npx,
            [
                std::ffi::OsStr::new(PRETTIER),
                std::ffi::OsStr::new("--write"),
                staged.path().as_os_str(),
            ],
            ctx.root(),
            self.process.timeout(),
        )
        .await?;

        fs::blocking(move || fs::commit_staged(staged, &input.path, input.relative)).await?;

        tracing::info!("Markdown formatted");
        Ok("Markdown formatted successfully.".to_string())
    }
}
