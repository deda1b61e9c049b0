//! Binary discovery
//!
//! Walks a source tree, picks out every runnable entry file and attaches the
//! local packages it depends on. One resolver cache is shared across the
//! whole run, so a common base library is expanded only once no matter how
//! many binaries import it.

use crate::error::{BinscopeError, BinscopeResult};
use crate::resolve::{binary_name, Binary, DependencyResolver, LocalPathResolver, Resolution};
use crate::source::{is_go_source, ImportExtractor};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names never searched for entry points
pub const EXCLUDED_DIRS: &[&str] = &["vendor", ".git", ".hg", ".svn", ".bzr"];

/// Result of scanning a tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct Discovery {
    /// One record per entry file, in walk order
    pub binaries: Vec<Binary>,

    /// Files left out because they could not be read or parsed
    pub skipped: Vec<SkippedFile>,

    /// Distinct local imports resolved during the run
    pub packages: usize,
}

/// A candidate file that was left out of the scan
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Finds binaries and resolves their local dependencies
#[derive(Clone)]
pub struct Discoverer {
    resolver: DependencyResolver,
    extractor: Arc<dyn ImportExtractor>,
    exclude: Vec<String>,
    strict: bool,
}

impl Discoverer {
    pub fn new(
        resolution: Resolution,
        extractor: Arc<dyn ImportExtractor>,
        paths: Arc<dyn LocalPathResolver>,
    ) -> Self {
        Self {
            resolver: DependencyResolver::new(resolution, Arc::clone(&extractor), paths),
            extractor,
            exclude: Vec::new(),
            strict: false,
        }
    }

    /// Skip these directory names too, on top of [`EXCLUDED_DIRS`]
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Abort on the first entry file that cannot be parsed instead of skipping it
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Find every binary under `root`
    pub fn discover(&self, root: &Path) -> BinscopeResult<Vec<Binary>> {
        Ok(self.scan(root)?.binaries)
    }

    /// Find every binary under `root`, one entry file at a time
    pub fn scan(&self, root: &Path) -> BinscopeResult<Discovery> {
        let mut discovery = Discovery::default();

        for file in self.candidates(root)? {
            let outcome = self.inspect(&file);
            self.record(&mut discovery, file, outcome)?;
        }

        discovery.packages = self.resolver.cache().resolved();
        Ok(discovery)
    }

    /// Like [`scan`](Self::scan), with entry files spread over at most
    /// `workers` blocking tasks (0 = available parallelism).
    ///
    /// Workers share the resolver cache; the output matches a sequential scan.
    pub async fn scan_parallel(&self, root: &Path, workers: usize) -> BinscopeResult<Discovery> {
        let workers = if workers == 0 {
            default_workers()
        } else {
            workers
        };
        debug!("Scanning with {} workers", workers);

        let candidates = {
            let this = self.clone();
            let root = root.to_path_buf();
            tokio::task::spawn_blocking(move || this.candidates(&root))
                .await
                .map_err(|e| BinscopeError::Worker(e.to_string()))??
        };

        let permits = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();

        for (index, file) in candidates.into_iter().enumerate() {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| BinscopeError::Worker(e.to_string()))?;
            let this = self.clone();

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let outcome = this.inspect(&file);
                (index, file, outcome)
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined.map_err(|e| BinscopeError::Worker(e.to_string()))?);
        }
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut discovery = Discovery::default();
        for (_, file, outcome) in outcomes {
            self.record(&mut discovery, file, outcome)?;
        }

        discovery.packages = self.resolver.cache().resolved();
        Ok(discovery)
    }

    /// Source files under `root` in file-name order, excluded directories pruned
    fn candidates(&self, root: &Path) -> BinscopeResult<Vec<PathBuf>> {
        if !root.exists() {
            return Err(BinscopeError::RootNotFound(root.to_path_buf()));
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(BinscopeError::Walk {
                        path: root.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && is_go_source(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("{} source files under {}", files.len(), root.display());
        Ok(files)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let name: &str = &name;
        EXCLUDED_DIRS.contains(&name) || self.exclude.iter().any(|d| d == name)
    }

    /// Build the binary for `file`, or `None` when it is not an entry point
    fn inspect(&self, file: &Path) -> BinscopeResult<Option<Binary>> {
        let info = self.extractor.entry_info(file)?;
        if !info.is_entry_point() {
            return Ok(None);
        }

        let mut seen = HashSet::new();
        let mut dependencies = Vec::new();
        for import in &info.imports {
            for dep in self.resolver.resolve(import).iter() {
                if seen.insert(dep.import.clone()) {
                    dependencies.push(dep.clone());
                }
            }
        }
        dependencies.sort();

        Ok(Some(Binary {
            name: binary_name(file),
            entry_file: file.to_path_buf(),
            dependencies,
        }))
    }

    fn record(
        &self,
        discovery: &mut Discovery,
        file: PathBuf,
        outcome: BinscopeResult<Option<Binary>>,
    ) -> BinscopeResult<()> {
        match outcome {
            Ok(Some(binary)) => {
                info!(
                    "Found binary {} in {} ({} local dependencies)",
                    binary.name,
                    file.display(),
                    binary.dependencies.len()
                );
                discovery.binaries.push(binary);
            }
            Ok(None) => {}
            Err(e) if self.strict => return Err(e),
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                discovery.skipped.push(SkippedFile {
                    path: file,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
