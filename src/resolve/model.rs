//! Records produced by resolution and discovery

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Settings that stay fixed for one discovery run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Import namespace owned by the project, e.g. `github.com/acme/proj`
    pub local_prefix: String,

    /// Whether `_test.go` files contribute imports when a package directory is expanded
    pub include_tests: bool,
}

impl Resolution {
    pub fn new(local_prefix: impl Into<String>) -> Self {
        Self {
            local_prefix: local_prefix.into(),
            include_tests: false,
        }
    }

    pub fn with_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Check whether an import belongs to the project
    pub fn is_local(&self, import: &str) -> bool {
        is_local(import, &self.local_prefix)
    }
}

/// Plain prefix test deciding whether an import is project-owned.
///
/// No segment-boundary check is made: with prefix `example.com/proj`,
/// `example.com/project` is local too.
pub fn is_local(import: &str, prefix: &str) -> bool {
    import.starts_with(prefix)
}

/// A local package reachable from some binary.
///
/// Two dependencies are the same dependency when their import paths match,
/// whatever their on-disk path looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Import path as written in source
    pub import: String,

    /// Directory the import resolved to
    pub path: PathBuf,
}

impl Dependency {
    pub fn new(import: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            import: import.into(),
            path: path.into(),
        }
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.import == other.import
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.import.hash(state);
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.import.cmp(&other.import)
    }
}

/// A runnable entry point and every local package it pulls in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binary {
    /// Name of the directory holding the entry file
    pub name: String,

    /// File declaring `package main` and `func main`
    pub entry_file: PathBuf,

    /// Local dependencies, unique and sorted by import path
    pub dependencies: Vec<Dependency>,
}

impl Binary {
    /// Check whether the binary depends on the given import path
    pub fn depends_on(&self, import: &str) -> bool {
        self.dependencies
            .binary_search_by(|dep| dep.import.as_str().cmp(import))
            .is_ok()
    }
}

/// Name a binary after the directory its entry file lives in.
///
/// Falls back to the canonical directory name for paths like `./main.go`,
/// and to `main` when no name can be found at all.
pub fn binary_name(entry_file: &Path) -> String {
    let dir = entry_file.parent().unwrap_or_else(|| Path::new("."));

    let named = match dir.file_name() {
        Some(name) => Some(name.to_os_string()),
        None => std::fs::canonicalize(if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        })
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_os_string())),
    };

    named
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "main".to_string())
}
