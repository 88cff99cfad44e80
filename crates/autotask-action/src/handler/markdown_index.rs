//! Markdown index action handler.
//!
//! Maps every Markdown file in the docs directory to its first H1 title.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handler::{fs, json};
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub struct MarkdownIndexHandler;

/// Title of the first `# ` heading, with leading `#` and spaces stripped.
pub fn first_heading(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| {
            line.trim_start_matches(|c: char| c == '#' || c == ' ')
                .trim()
                .to_string()
        })
}

#[async_trait]
impl ActionHandler for MarkdownIndexHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::MarkdownIndex
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let docs = ctx.target("docs")?.clone();
        let output = ctx.target("output")?.clone();
        let ctx = ctx.clone();

        let indexed = fs::blocking(move || {
            let entries = std::fs::read_dir(&docs.path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => HandlerError::domain(format!(
                    "input directory not found: {}",
                    docs.relative
                )),
                _ => HandlerError::unexpected(format!("failed to list {}: {}", docs.relative, e)),
            })?;

            let mut index = BTreeMap::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    HandlerError::unexpected(format!("failed to list {}: {}", docs.relative, e))
                })?;
                let name = entry.file_name().to_string_lossy().into_owned();
                if !name.ends_with(".md") {
                    continue;
                }
                let path = ctx.resolve(&entry.path())?;
                if !path.is_file() {
                    continue;
                }
                let content = fs::read_text(&path, &format!("{}/{}", docs.relative, name))?;
                if let Some(title) = first_heading(&content) {
                    index.insert(name, title);
                }
            }

            let rendered = json::to_pretty_ascii(&index, "index")?;
            fs::write_output(&output, rendered.as_bytes())?;
            Ok(index.len())
        })
        .await?;

        tracing::info!(files = indexed, "Markdown index written");
        Ok("Markdown index created successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::{spec, Sandbox};

    #[test]
    fn test_first_heading() {
        assert_eq!(
            first_heading("intro\n## Sub\n# Title Here\n# Second"),
            Some("Title Here".to_string())
        );
        assert_eq!(first_heading("#NoSpace\n## Only sub"), None);
        assert_eq!(first_heading("# Issue #"), Some("Issue #".to_string()));
        assert_eq!(first_heading("# C#\nbody"), Some("C#".to_string()));
        assert_eq!(first_heading("#  Spaced  \n"), Some("Spaced".to_string()));
        assert_eq!(first_heading("# ## Nested  "), Some("Nested".to_string()));
        assert_eq!(first_heading(""), None);
    }

    #[tokio::test]
    async fn test_index_maps_files_to_titles() {
        let sandbox = Sandbox::new();
        sandbox.write("docs/b.md", "# Beta\nbody");
        sandbox.write("docs/a.md", "preamble\n# Alpha\n");
        sandbox.write("docs/untitled.md", "no heading");
        sandbox.write("docs/notes.txt", "# Not markdown");
        let ctx = sandbox.context(spec(ActionKind::MarkdownIndex), &[]);

        let msg = MarkdownIndexHandler.execute(&ctx).await.unwrap();
        assert_eq!(msg, "Markdown index created successfully.");

        let written = sandbox.read("docs/index.json");
        assert_eq!(
            written,
            "{\n  \"a.md\": \"Alpha\",\n  \"b.md\": \"Beta\"\n}"
        );
    }

    #[tokio::test]
    async fn test_index_escapes_non_ascii_titles() {
        let sandbox = Sandbox::new();
        sandbox.write("docs/cafe.md", "# Café C#\n");
        let ctx = sandbox.context(spec(ActionKind::MarkdownIndex), &[]);

        MarkdownIndexHandler.execute(&ctx).await.unwrap();
        assert_eq!(
            sandbox.read("docs/index.json"),
            "{\n  \"cafe.md\": \"Caf\\u00e9 C#\"\n}"
        );
    }

    #[tokio::test]
    async fn test_missing_docs_directory_is_domain_error() {
        let sandbox = Sandbox::new();
        let ctx = sandbox.context(spec(ActionKind::MarkdownIndex), &[]);
        let err = MarkdownIndexHandler.execute(&ctx).await.unwrap_err();
        assert_eq!(
            err,
            HandlerError::Domain("input directory not found: docs".to_string())
        );
    }
}
