//! Error types for binscope
//!
//! All modules use `BinscopeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for binscope operations
pub type BinscopeResult<T> = Result<T, BinscopeError>;

/// All errors that can occur in binscope
#[derive(Error, Debug)]
pub enum BinscopeError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No local import prefix configured and no go.mod found in {0}")]
    MissingLocalPrefix(PathBuf),

    // Discovery errors
    #[error("Scan root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Failed to parse {path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    #[error("Discovery worker failed: {0}")]
    Worker(String),

    // Resolution errors
    #[error("Import {import} not found under any lookup root ({searched})")]
    UnresolvedImport { import: String, searched: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl BinscopeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a parse error for a source file
    pub fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingLocalPrefix(_) => {
                Some("Pass --prefix or set resolution.local_prefix in .binscope.toml")
            }
            Self::Parse { .. } => Some("Drop --strict to skip unparsable files with a warning"),
            Self::ConfigInvalid { .. } => {
                Some("Fix the file, or pass --no-local to ignore .binscope.toml")
            }
            _ => None,
        }
    }
}
