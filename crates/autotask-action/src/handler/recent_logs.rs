//! Recent log extraction action handler.
//!
//! Collects the first line of the most recently modified `.log` files in
//! the logs directory, newest first.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::handler::fs;
use crate::handler::{ActionContext, ActionHandler};
use crate::types::ActionKind;

pub struct RecentLogsHandler {
    limit: usize,
}

impl RecentLogsHandler {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for RecentLogsHandler {
    fn default() -> Self {
        Self::new(10)
    }
}

fn first_line(path: &Path, label: &str) -> Result<Vec<u8>, HandlerError> {
    let file = std::fs::File::open(path)
        .map_err(|e| HandlerError::unexpected(format!("failed to open {}: {}", label, e)))?;
    let mut line = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut line)
        .map_err(|e| HandlerError::unexpected(format!("failed to read {}: {}", label, e)))?;
    if line.last() != Some(&b'\n') {
        line.push(b'\n');
    }
    Ok(line)
}

#[async_trait]
impl ActionHandler for RecentLogsHandler {
    fn kind(&self) -> ActionKind {
        ActionKind::RecentLogs
    }

    async fn execute(&self, ctx: &ActionContext) -> Result<String, HandlerError> {
        let logs = ctx.target("logs")?.clone();
        let output = ctx.target("output")?.clone();
        let limit = self.limit;
        let ctx = ctx.clone();

        let collected = fs::blocking(move || {
            let entries = std::fs::read_dir(&logs.path).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => HandlerError::domain(format!(
                    "input directory not found: {}",
                    logs.relative
                )),
                _ => HandlerError::unexpected(format!("failed to list {}: {}", logs.relative, e)),
            })?;

            let mut candidates: Vec<(SystemTime, String, PathBuf)> = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    HandlerError::unexpected(format!("failed to list {}: {}", logs.relative, e))
                })?;
                let name = entry.file_name().to_string_lossy().into_owned();
                if !name.ends_with(".log") {
                    continue;
                }
                let path = ctx.resolve(&entry.path())?;
                let meta = std::fs::metadata(&path).map_err(|e| {
                    HandlerError::unexpected(format!("failed to stat {}: {}", name, e))
                })?;
                if !meta.is_file() {
                    continue;
                }
                let modified = meta.modified().map_err(|e| {
                    HandlerError::unexpected(format!("no modification time for {}: {}", name, e))
                })?;
                candidates.push((modified, name, path));
            }

            // Newest first; names break ties so the output is reproducible.
            candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
            candidates.truncate(limit);

            let mut out = Vec::new();
            for (_, name, path) in &candidates {
                out.extend(first_line(path, name)?);
            }
            fs::write_output(&output, &out)?;
            Ok(candidates.len())
        })
        .await?;

        tracing::info!(files = collected, "Recent log lines extracted");
        Ok("Recent logs extracted successfully.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::testing::{spec, Sandbox};
    use filetime::FileTime;

    fn write_log(sandbox: &Sandbox, name: &str, content: &str, mtime: i64) {
        let relative = format!("logs/{}", name);
        sandbox.write(&relative, content);
        filetime::set_file_mtime(sandbox.path(&relative), FileTime::from_unix_time(mtime, 0))
            .unwrap();
    }

    #[tokio::test]
    async fn test_newest_first_lines_limited() {
        let sandbox = Sandbox::new();
        for i in 0..12 {
            write_log(
                &sandbox,
                &format!("app-{:02}.log", i),
                &format!("first {}\nsecond {}\n", i, i),
                1_700_000_000 + i,
            );
        }
        write_log(&sandbox, "notes.txt", "ignored\n", 1_800_000_000);
        let ctx = sandbox.context(spec(ActionKind::RecentLogs), &[]);

        let msg = RecentLogsHandler::default().execute(&ctx).await.unwrap();
        assert_eq!(msg, "Recent logs extracted successfully.");

        let written = sandbox.read("logs-recent.txt");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "first 11");
        assert_eq!(lines[9], "first 2");
        assert!(!written.contains("ignored"));
    }

    #[tokio::test]
    async fn test_line_without_newline_is_terminated() {
        let sandbox = Sandbox::new();
        write_log(&sandbox, "a.log", "only line", 1_700_000_000);
        write_log(&sandbox, "b.log", "", 1_600_000_000);
        let ctx = sandbox.context(spec(ActionKind::RecentLogs), &[]);

        RecentLogsHandler::new(5).execute(&ctx).await.unwrap();
        assert_eq!(sandbox.read("logs-recent.txt"), "only line\n\n");
    }

    #[tokio::test]
    async fn test_missing_logs_directory_is_domain_error() {
        let sandbox = Sandbox::new();
        let ctx = sandbox.context(spec(ActionKind::RecentLogs), &[]);

        let err = RecentLogsHandler::default().execute(&ctx).await.unwrap_err();
        assert_eq!(
            err,
            HandlerError::Domain("input directory not found: logs".to_string())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_log_outside_sandbox_is_rejected() {
        let sandbox = Sandbox::new();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.log"), "secret\n").unwrap();
        std::fs::create_dir(sandbox.path("logs")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.log"),
            sandbox.path("logs/secret.log"),
        )
        .unwrap();
        let ctx = sandbox.context(spec(ActionKind::RecentLogs), &[]);

        let err = RecentLogsHandler::default().execute(&ctx).await.unwrap_err();
        assert_eq!(err, HandlerError::Domain("path outside sandbox".to_string()));
        assert!(!sandbox.path("logs-recent.txt").exists());
    }
}
