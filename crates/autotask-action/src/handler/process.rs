//! External tool invocation.
//!
//! Tools are spawned directly with an argument vector (never through a
//! shell), bounded by the configured timeout and killed if they overrun.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::HandlerError;
use crate::types::ActionKind;

/// Longest stderr excerpt carried into an error message.
const STDERR_EXCERPT: usize = 512;

/// Run `program` with `args` in `cwd`.
///
/// Non-zero exit and timeout are domain failures naming `action`; failing to
/// launch the program at all is unexpected.
pub async fn run_tool<I, S>(
    action: ActionKind,
    program: &str,
    args: I,
    cwd: &Path,
    timeout: Duration,
) -> Result<String, HandlerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(action = %action, program = %program, "Spawning external tool");

    let child = command.spawn().map_err(|e| {
        HandlerError::unexpected(format!("failed to launch {}: {}", program, e))
    })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| {
            HandlerError::unexpected(format!("failed to wait for {}: {}", program, e))
        })?,
        Err(_) => {
            tracing::warn!(action = %action, program = %program, "External tool timed out");
            return Err(HandlerError::domain(format!(
                "{} failed: {} timed out after {} seconds",
                action,
                program,
                timeout.as_secs()
            )));
        }
    };

    if !output.status.success() {
        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let stderr = String::from_utf8_lossy(&output.stderr);
        let excerpt = excerpt(stderr.trim());
        tracing::warn!(action = %action, program = %program, code = %code, "External tool failed");
        let mut msg = format!("{} failed: {} exited with code {}", action, program, code);
        if !excerpt.is_empty() {
            msg.push_str(": ");
            msg.push_str(excerpt);
        }
        return Err(HandlerError::domain(msg));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Last `STDERR_EXCERPT` bytes of `text`, cut on a char boundary.
fn excerpt(text: &str) -> &str {
    if text.len() <= STDERR_EXCERPT {
        return text;
    }
    let mut start = text.len() - STDERR_EXCERPT;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_tool_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_tool(
            ActionKind::Datagen,
            "echo",
            ["hello"],
            dir.path(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_domain_error_naming_action() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            ActionKind::MarkdownToHtml,
            "false",
            Vec::<String>::new(),
            dir.path(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        match err {
            HandlerError::Domain(msg) => {
                assert!(msg.starts_with("markdown_to_html failed: false exited with code 1"));
            }
            other => panic!("expected domain error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_unexpected() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            ActionKind::CloneRepo,
            "autotask-definitely-not-installed",
            ["x"],
            dir.path(),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HandlerError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_domain_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_tool(
            ActionKind::Datagen,
            "sleep",
            ["5"],
            dir.path(),
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HandlerError::Domain(msg) if msg.contains("timed out")));
    }

    #[test]
    fn test_excerpt_keeps_tail_on_char_boundary() {
        let text = format!("{}{}", "é".repeat(400), "tail");
        let cut = excerpt(&text);
        assert!(cut.len() <= STDERR_EXCERPT);
        assert!(cut.ends_with("tail"));
        assert_eq!(excerpt("short"), "short");
    }
}
