//! Data generation action handler.
//!
//! Installs `uv` and runs the remote data generation script against the
//! sandbox root for the given email address.

use std::sync::LazyLock;

use async_trait::async_trait;
use autotask_core::config::{DatagenConfig, ProcessConfig};
use regex::Regex;

use crate::error::HandlerError;
use crate::handler::process::run_tool;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub struct DatagenHandler {
    process: ProcessConfig,
    datagen: DatagenConfig,
}

impl DatagenHandler {
    pub fn new(process: ProcessConfig, datagen: DatagenConfig) -> Self {
        Self { process, datagen }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[async_trait]
impl ActionHandler for DatagenHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::Datagen
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let email = ctx.param("email")?;
        if !is_valid_email(email) {
            return Err(HandlerError::domain(format!(
                "invalid email address: {}",
                email
            )));
        }
        let workdir = &ctx.target("workdir")?.path;
        let python = self.process.python.as_str();
        let timeout = self.process.timeout();

        // uv may already be present; only the run step decides the outcome.
        if let Err(e) = run_tool(
            ActionKind::Datagen,
            python,
            ["-m", "pip", "install", "uv"],
            workdir,
            timeout,
        )
        .await
        {
            tracing::warn!(error = %e, "uv installation failed, trying existing install");
        }

        let root = ctx.root().to_string_lossy().into_owned();
        run_tool(
            ActionKind::Datagen,
            python,
            [
                "-m",
                "uv",
                "run",
                self.datagen.script_url.as_str(),
                email,
                "--root",
                root.as_str(),
            ],
            workdir,
            timeout,
        )
        .await?;

        tracing::info!(email = %email, "Data generated");
        Ok("Data generated successfully.".to_string())
    }
}
