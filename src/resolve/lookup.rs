//! Import path lookup
//!
//! Maps a local import path to a package directory by searching, in order:
//! 1. Vendored: `{root}/vendor/{import}`
//! 2. Module: `{module dir}/{import without module path}` (from `go.mod`)
//! 3. GOPATH: `{gopath}/src/{import}`
//! 4. Any extra tree roots from configuration
//!
//! The first existing directory wins.

use crate::error::{BinscopeError, BinscopeResult};
use std::fmt;
use std::path::{Path, PathBuf};

/// Maps import paths to package directories
pub trait LocalPathResolver: Send + Sync {
    /// Find the directory holding the package for `import`
    fn resolve_local_path(&self, import: &str) -> BinscopeResult<PathBuf>;
}

/// One place an import path may live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRoot {
    /// The full import path is appended to the directory (GOPATH `src`, `vendor`)
    Tree(PathBuf),

    /// Directory holding the module whose import path is `module`
    Module { module: String, dir: PathBuf },
}

impl LookupRoot {
    /// Candidate directory for `import`, if this root could hold it at all
    fn candidate(&self, import: &str) -> Option<PathBuf> {
        match self {
            Self::Tree(dir) => Some(dir.join(import)),
            Self::Module { module, dir } => {
                if import == module {
                    Some(dir.clone())
                } else {
                    import
                        .strip_prefix(module.as_str())
                        .and_then(|rest| rest.strip_prefix('/'))
                        .map(|rest| dir.join(rest))
                }
            }
        }
    }
}

impl fmt::Display for LookupRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(dir) => write!(f, "{}", dir.display()),
            Self::Module { module, dir } => write!(f, "{} (module {})", dir.display(), module),
        }
    }
}

/// Prioritized list of lookup roots
#[derive(Debug, Clone, Default)]
pub struct LookupRoots {
    roots: Vec<LookupRoot>,
}

impl LookupRoots {
    pub fn new(roots: Vec<LookupRoot>) -> Self {
        Self { roots }
    }

    /// Append a root with the lowest priority so far
    pub fn push(&mut self, root: LookupRoot) {
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    pub fn roots(&self) -> &[LookupRoot] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl LocalPathResolver for LookupRoots {
    fn resolve_local_path(&self, import: &str) -> BinscopeResult<PathBuf> {
        if validate_import_path(import) {
            for root in &self.roots {
                if let Some(dir) = root.candidate(import) {
                    if dir.is_dir() {
                        return Ok(dir);
                    }
                }
            }
        }

        let searched = if self.roots.is_empty() {
            "no lookup roots configured".to_string()
        } else {
            self.roots
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        Err(BinscopeError::UnresolvedImport {
            import: import.to_string(),
            searched,
        })
    }
}

/// Reject import paths that could escape a lookup root
fn validate_import_path(import: &str) -> bool {
    !import.is_empty()
        && !import.contains('\\')
        && !import.contains('\0')
        && !Path::new(import).is_absolute()
        && import
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mkdir(base: &Path, rel: &str) -> PathBuf {
        let dir = base.join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn tree_root_appends_full_import() {
        let temp = TempDir::new().unwrap();
        let expected = mkdir(temp.path(), "src/example.com/proj/libA");
        let roots = LookupRoots::new(vec![LookupRoot::Tree(temp.path().join("src"))]);

        let dir = roots.resolve_local_path("example.com/proj/libA").unwrap();
        assert_eq!(dir, expected);
    }

    #[test]
    fn module_root_strips_module_path() {
        let temp = TempDir::new().unwrap();
        let expected = mkdir(temp.path(), "internal/db");
        let roots = LookupRoots::new(vec![LookupRoot::Module {
            module: "example.com/proj".into(),
            dir: temp.path().to_path_buf(),
        }]);

        assert_eq!(
            roots.resolve_local_path("example.com/proj/internal/db").unwrap(),
            expected
        );
        assert_eq!(
            roots.resolve_local_path("example.com/proj").unwrap(),
            temp.path()
        );
        // Sibling module sharing a string prefix is not inside this module
        assert!(roots.resolve_local_path("example.com/projx/db").is_err());
    }

    #[test]
    fn first_matching_root_wins() {
        let temp = TempDir::new().unwrap();
        let vendored = mkdir(temp.path(), "vendor/example.com/proj/lib");
        mkdir(temp.path(), "gopath/src/example.com/proj/lib");

        let roots = LookupRoots::new(vec![
            LookupRoot::Tree(temp.path().join("vendor")),
            LookupRoot::Tree(temp.path().join("gopath/src")),
        ]);

        assert_eq!(
            roots.resolve_local_path("example.com/proj/lib").unwrap(),
            vendored
        );
    }

    #[test]
    fn missing_import_lists_searched_roots() {
        let temp = TempDir::new().unwrap();
        let roots = LookupRoots::new(vec![LookupRoot::Tree(temp.path().join("vendor"))]);

        let err = roots
            .resolve_local_path("example.com/proj/libC")
            .unwrap_err()
            .to_string();
        assert!(err.contains("example.com/proj/libC"));
        assert!(err.contains("vendor"));
    }

    #[test]
    fn files_do_not_resolve() {
        let temp = TempDir::new().unwrap();
        mkdir(temp.path(), "example.com/proj");
        std::fs::write(temp.path().join("example.com/proj/lib"), "not a dir").unwrap();
        let roots = LookupRoots::new(vec![LookupRoot::Tree(temp.path().to_path_buf())]);

        assert!(roots.resolve_local_path("example.com/proj/lib").is_err());
    }

    #[test]
    fn rejects_traversal() {
        let temp = TempDir::new().unwrap();
        mkdir(temp.path(), "outside");
        let roots = LookupRoots::new(vec![LookupRoot::Tree(temp.path().join("src"))]);

        assert!(roots.resolve_local_path("../outside").is_err());
        assert!(!validate_import_path("a//b"));
        assert!(!validate_import_path("a/./b"));
        assert!(!validate_import_path("/abs/path"));
        assert!(validate_import_path("example.com/proj/lib"));
    }

    #[test]
    fn push_skips_duplicates() {
        let mut roots = LookupRoots::default();
        roots.push(LookupRoot::Tree(PathBuf::from("vendor")));
        roots.push(LookupRoot::Tree(PathBuf::from("vendor")));
        assert_eq!(roots.roots().len(), 1);
    }
}
