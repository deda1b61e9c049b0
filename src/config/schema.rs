//! Configuration schema for binscope
//!
//! Global configuration lives at `~/.config/binscope/config.toml`; a
//! `.binscope.toml` in the scanned tree overrides it key by key.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Import resolution settings
    pub resolution: ResolutionConfig,

    /// Tree walking settings
    pub discovery: DiscoveryConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// How imports are classified and located
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Import prefix owned by the project (defaults to the go.mod module path)
    pub local_prefix: Option<String>,

    /// Let `_test.go` files contribute imports
    pub include_tests: bool,

    /// Look up imports under `<root>/vendor`
    pub vendor: bool,

    /// Look up imports inside the module declared by `go.mod`
    pub go_mod: bool,

    /// GOPATH whose `src` directory is searched
    pub gopath: Option<PathBuf>,

    /// Extra directories searched as `<dir>/<import path>`
    pub extra_roots: Vec<PathBuf>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            local_prefix: None,
            include_tests: false,
            vendor: true,
            go_mod: true,
            gopath: None,
            extra_roots: vec![],
        }
    }
}

/// Tree walking settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Resolve binaries on a worker pool
    pub parallel: bool,

    /// Worker count for parallel discovery (0 = available parallelism)
    pub workers: usize,

    /// Abort on the first unparsable entry file
    pub strict: bool,

    /// Extra directory names to skip, on top of vendor and VCS directories
    pub exclude: Vec<String>,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default format: "table", "json" or "plain"
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
        }
    }
}
