//! Markdown to HTML conversion action handler, backed by pandoc.

use async_trait::async_trait;
use autotask_core::config::ProcessConfig;

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::process::run_tool;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub struct MarkdownToHtmlHandler {
    process: ProcessConfig,
}

impl MarkdownToHtmlHandler {
    pub fn new(process: ProcessConfig) -> Self {
        Self { process }
    }
}

#[async_trait]
impl ActionHandler for MarkdownToHtmlHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::MarkdownToHtml
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let input = ctx.target("input")?.clone();
        let output = ctx.target("output")?.clone();

        let (source, dest) = (input.clone(), output.clone());
        let staged = fs::blocking(move || {
            fs::require_input(&source)?;
            fs::stage_beside(&dest.path, dest.relative, ".html")
        })
        .await?;

        run_tool(
            ActionKind::MarkdownToHtml,
            &self.process.pandoc,
            [
                input.path.as_os_str(),
                std::ffi::OsStr::new("-o"),
                staged.path().as_os_str(),
            ],
            ctx.root(),
            self.process.timeout(),
        )
        .await?;

        fs::blocking(move || fs::commit_staged(staged, &output.path, output.relative)).await?;

        tracing::info!("Markdown converted to HTML");
        Ok("Markdown converted to HTML.".to_string())
    }
}
