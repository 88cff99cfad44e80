//! Sandbox file helpers shared by handlers.
//!
//! Reads classify a missing or undecodable input as a domain failure.
//! Writes go to a temporary file next to the destination and are renamed
//! into place, so a failed action never leaves a half-written output.
//! A replaced file keeps its permissions; a new one gets mode 0644.

use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::HandlerError;
use crate::handler::ResolvedTarget;

/// Run blocking file or database work off the async executor.
pub async fn blocking<F, T>(f: F) -> Result<T, HandlerError>
where
    F: FnOnce() -> Result<T, HandlerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| HandlerError::unexpected(format!("blocking task failed: {}", e)))?
}

/// Fail with a domain error unless the input exists.
pub fn require_input(target: &ResolvedTarget) -> Result<(), HandlerError> {
    if target.path.exists() {
        Ok(())
    } else {
        Err(HandlerError::domain(format!(
            "input file not found: {}",
            target.relative
        )))
    }
}

pub fn read_input(target: &ResolvedTarget) -> Result<String, HandlerError> {
    read_text(&target.path, target.relative)
}

/// Read a UTF-8 file, naming it by `label` in errors.
pub fn read_text(path: &Path, label: &str) -> Result<String, HandlerError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => HandlerError::domain(format!("input file not found: {}", label)),
        ErrorKind::InvalidData => {
            HandlerError::domain(format!("input file is not valid UTF-8: {}", label))
        }
        _ => HandlerError::unexpected(format!("failed to read {}: {}", label, e)),
    })
}

/// Atomically replace `target` with `content`.
pub fn write_output(target: &ResolvedTarget, content: &[u8]) -> Result<(), HandlerError> {
    write_atomic(&target.path, target.relative, content)
}

pub fn write_atomic(path: &Path, label: &str, content: &[u8]) -> Result<(), HandlerError> {
    let parent = output_dir(path, label)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| HandlerError::unexpected(format!("failed to stage {}: {}", label, e)))?;
    tmp.write_all(content)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| HandlerError::unexpected(format!("failed to write {}: {}", label, e)))?;
    inherit_permissions(tmp.path(), path, label)?;
    tmp.persist(path)
        .map_err(|e| HandlerError::unexpected(format!("failed to finalize {}: {}", label, e)))?;
    Ok(())
}

/// Empty temporary file with `suffix` next to `path`, for tools that write
/// their result to a path of their own. Dropping it removes the file.
pub fn stage_beside(
    path: &Path,
    label: &str,
    suffix: &str,
) -> Result<tempfile::NamedTempFile, HandlerError> {
    let parent = output_dir(path, label)?;
    tempfile::Builder::new()
        .prefix(".autotask-")
        .suffix(suffix)
        .tempfile_in(parent)
        .map_err(|e| HandlerError::unexpected(format!("failed to stage {}: {}", label, e)))
}

/// Move a staged file over `path`.
pub fn commit_staged(
    staged: tempfile::NamedTempFile,
    path: &Path,
    label: &str,
) -> Result<(), HandlerError> {
    inherit_permissions(staged.path(), path, label)?;
    staged
        .persist(path)
        .map_err(|e| HandlerError::unexpected(format!("failed to finalize {}: {}", label, e)))?;
    Ok(())
}

/// Give a staged file the permissions of the file it will replace.
///
/// Temporary files are created owner-only; without this, every output would
/// end up 0600 and an edited input would lose its original mode.
fn inherit_permissions(staged: &Path, dest: &Path, label: &str) -> Result<(), HandlerError> {
    let permissions = match std::fs::metadata(dest) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == ErrorKind::NotFound => match default_permissions() {
            Some(permissions) => permissions,
            None => return Ok(()),
        },
        Err(e) => {
            return Err(HandlerError::unexpected(format!(
                "failed to inspect {}: {}",
                label, e
            )))
        }
    };
    std::fs::set_permissions(staged, permissions)
        .map_err(|e| HandlerError::unexpected(format!("failed to stage {}: {}", label, e)))
}

#[cfg(unix)]
fn default_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<std::fs::Permissions> {
    None
}

/// Directory an output lands in; it must already exist.
pub fn output_dir<'a>(path: &'a Path, label: &str) -> Result<&'a Path, HandlerError> {
    match path.parent() {
        Some(parent) if parent.is_dir() => Ok(parent),
        _ => Err(HandlerError::domain(format!(
            "output directory does not exist for {}",
            label
        ))),
    }
}
