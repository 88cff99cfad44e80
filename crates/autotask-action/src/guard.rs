//! Sandbox path containment.
//!
//! Every path an action reads or writes is resolved through [`PathGuard`]
//! before any I/O happens. Containment is decided on canonical paths,
//! compared component by component, so `/data2/x` is never inside `/data`.

use std::path::{Component, Path, PathBuf};

use crate::error::PathViolation;

/// Checks that paths resolve inside a single sandbox root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for `root`. The root must exist; it is canonicalized
    /// once here.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PathViolation> {
        let root = root.as_ref();
        let canonical = std::fs::canonicalize(root).map_err(|e| PathViolation::Unresolvable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { root: canonical })
    }

    /// The canonical sandbox root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True iff `path` resolves to the root or one of its descendants.
    pub fn is_contained(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).is_ok()
    }

    /// Resolve `path` (relative paths are taken from the root) to its
    /// canonical form and check it stays inside the sandbox.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, PathViolation> {
        let path = path.as_ref();
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let (mut resolved, reentered) = canonicalize_partial(&absolute)?;
        // A `..` in the non-existent tail can climb back into existing
        // directories whose symlinks were never resolved; resolve again.
        if reentered {
            resolved = canonicalize_partial(&resolved)?.0;
        }

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(PathViolation::Outside(path.to_path_buf()))
        }
    }
}

/// Canonicalize the longest existing prefix of `path` and append the rest
/// lexically. Returns whether the lexical tail contained a `..`.
fn canonicalize_partial(path: &Path) -> Result<(PathBuf, bool), PathViolation> {
    let mut existing = PathBuf::new();
    let mut tail: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        if tail.is_empty() {
            let candidate = existing.join(component.as_os_str());
            if candidate.exists() {
                existing = candidate;
                continue;
            }
            if candidate.symlink_metadata().is_ok() {
                return Err(PathViolation::DanglingSymlink(candidate));
            }
        }
        tail.push(component);
    }

    let mut resolved =
        std::fs::canonicalize(&existing).map_err(|e| PathViolation::Unresolvable {
            path: existing.clone(),
            reason: e.to_string(),
        })?;

    let mut reentered = false;
    for component in tail {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
                reentered = true;
            }
            Component::Normal(name) => resolved.push(name),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Ok((resolved, reentered))
}
