//! `go.mod` discovery
//!
//! Only the `module` directive is read. It supplies the default local import
//! prefix and a lookup root for module-mode trees.

use crate::error::{BinscopeError, BinscopeResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A module declared by a `go.mod` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Module import path, e.g. `github.com/acme/proj`
    pub path: String,

    /// Directory containing the `go.mod`
    pub dir: PathBuf,
}

/// Find the nearest `go.mod` at or above `start` and read its module path.
///
/// Returns `Ok(None)` when there is no `go.mod` or it declares no module.
pub fn find_module(start: &Path) -> BinscopeResult<Option<GoModule>> {
    let start = fs::canonicalize(start)
        .map_err(|e| BinscopeError::io(format!("resolving {}", start.display()), e))?;

    for dir in start.ancestors() {
        let manifest = dir.join("go.mod");
        if !manifest.is_file() {
            continue;
        }

        let content = fs::read_to_string(&manifest)
            .map_err(|e| BinscopeError::io(format!("reading {}", manifest.display()), e))?;

        return Ok(module_path(&content).map(|path| {
            debug!("Found module {} in {}", path, manifest.display());
            GoModule {
                path,
                dir: dir.to_path_buf(),
            }
        }));
    }

    Ok(None)
}

/// Extract the module path from `go.mod` content
pub fn module_path(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with([' ', '\t', '"']) {
            return None;
        }
        let path = rest.trim().trim_matches('"').trim_matches('`');
        (!path.is_empty()).then(|| path.to_string())
    })
}
