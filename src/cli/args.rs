//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// binscope - Go binaries and the local packages they pull in
///
/// Finds every `package main` entry point in a tree and lists the
/// project-owned packages each one depends on, so CI can tell which
/// binaries to rebuild when a package changes.
#[derive(Parser, Debug)]
#[command(name = "binscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BINSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .binscope.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List binaries and their local dependencies
    List(ListArgs),

    /// List binaries affected by changes to the given packages
    Affected(AffectedArgs),

    /// Create a project-local .binscope.toml
    Init(InitArgs),

    /// Show or initialise configuration
    Config(ConfigArgs),
}

/// Options shared by every command that scans a tree
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Root of the source tree (defaults to current directory)
    pub root: Option<PathBuf>,

    /// Import prefix owned by the project (defaults to the go.mod module path)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Let _test.go files contribute imports
    #[arg(long)]
    pub include_tests: bool,

    /// GOPATH whose src directory is searched for imports
    #[arg(long, env = "GOPATH")]
    pub gopath: Option<PathBuf>,

    /// Extra lookup root searched as <dir>/<import path> (repeatable)
    #[arg(long = "root-dir", value_name = "DIR")]
    pub root_dirs: Vec<PathBuf>,

    /// Extra directory name to skip while walking (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Resolve binaries on a worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Worker count for parallel scans (0 = available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Abort on the first unparsable entry file instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Output format (defaults to output.format from config)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the affected command
#[derive(Parser, Debug)]
pub struct AffectedArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Changed package import path; `path/...` matches sub-packages too
    #[arg(short, long = "package", value_name = "IMPORT", required = true)]
    pub packages: Vec<String>,

    /// Output format (defaults to output.format from config)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite existing .binscope.toml
    #[arg(short, long)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list and affected
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

impl OutputFormat {
    /// Parse a format name from configuration
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}
