//! Import extraction from Go sources
//!
//! The resolver and discoverer only talk to the [`ImportExtractor`] trait;
//! [`GoSourceExtractor`] is the filesystem-backed implementation.

pub mod gomod;
pub mod scanner;

pub use gomod::{find_module, GoModule};

use crate::error::{BinscopeError, BinscopeResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What one source file declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub package: String,
    pub has_main: bool,
    pub imports: Vec<String>,
}

impl EntryInfo {
    /// A runnable program: `package main` with a top-level `func main`
    pub fn is_entry_point(&self) -> bool {
        self.package == "main" && self.has_main
    }
}

/// Reads package headers from source files
pub trait ImportExtractor: Send + Sync {
    /// Scan a single file
    fn entry_info(&self, file: &Path) -> BinscopeResult<EntryInfo>;

    /// Merged imports of every source file in `dir`, in file-name then
    /// declaration order, without repeats.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    fn directory_imports(&self, dir: &Path, include_tests: bool) -> BinscopeResult<Vec<String>>;
}

/// Extractor for `.go` files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSourceExtractor;

impl GoSourceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ImportExtractor for GoSourceExtractor {
    fn entry_info(&self, file: &Path) -> BinscopeResult<EntryInfo> {
        let src = fs::read_to_string(file)
            .map_err(|e| BinscopeError::io(format!("reading {}", file.display()), e))?;

        let parsed = scanner::parse(&src)
            .map_err(|e| BinscopeError::parse(file, e.line, e.reason))?;

        Ok(EntryInfo {
            package: parsed.package,
            has_main: parsed.has_main,
            imports: parsed.imports,
        })
    }

    fn directory_imports(&self, dir: &Path, include_tests: bool) -> BinscopeResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut imports = Vec::new();

        for file in package_files(dir, include_tests)? {
            match self.entry_info(&file) {
                Ok(info) => {
                    for import in info.imports {
                        if seen.insert(import.clone()) {
                            imports.push(import);
                        }
                    }
                }
                Err(e) => warn!("Skipping {}: {}", file.display(), e),
            }
        }

        debug!("{} imports {} packages", dir.display(), imports.len());
        Ok(imports)
    }
}

/// Go source files directly inside `dir`, sorted by file name
pub fn package_files(dir: &Path, include_tests: bool) -> BinscopeResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| BinscopeError::io(format!("listing {}", dir.display()), e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_go_source(path))
        .filter(|path| include_tests || !is_test_file(path))
        .collect();

    files.sort();
    Ok(files)
}

/// Check for a `.go` extension
pub fn is_go_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

/// Check for a `_test.go` suffix
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with("_test.go"))
}
