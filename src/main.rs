//! binscope - Go binaries and their local dependencies
//!
//! CLI entry point that dispatches to subcommands.

use binscope::cli::{Cli, Commands};
use binscope::config::{Config, ConfigManager};
use binscope::error::{BinscopeError, BinscopeResult};
use clap::Parser;
use console::style;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> BinscopeResult<()> {
    let cli = Cli::parse();

    // Init command doesn't need config loading
    if let Commands::Init(args) = cli.command {
        init_logging(cli.verbose, &Config::default());
        return binscope::cli::commands::init(args).await;
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        None
    } else {
        let start = match scan_root(&cli.command) {
            Some(root) => std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf()),
            None => std::env::current_dir()
                .map_err(|e| BinscopeError::io("getting current directory", e))?,
        };
        ConfigManager::find_local_config(&start)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(cli.verbose, &config);
    if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
    } else if let Some(ref path) = local_config_path {
        debug!("Loaded local config: {}", path.display());
    }

    match cli.command {
        Commands::Init(_) => unreachable!("Init handled above"),
        Commands::List(args) => binscope::cli::commands::list(args, &config).await,
        Commands::Affected(args) => binscope::cli::commands::affected(args, &config).await,
        Commands::Config(args) => {
            binscope::cli::commands::config(args, &config_manager, &config).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; logs go to stderr
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("binscope=warn"),
        1 => EnvFilter::new("binscope=info"),
        _ => EnvFilter::new("binscope=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

/// Tree the command will scan, used to find a project-local config
fn scan_root(command: &Commands) -> Option<&Path> {
    let root: &Option<PathBuf> = match command {
        Commands::List(args) => &args.scan.root,
        Commands::Affected(args) => &args.scan.root,
        Commands::Init(_) | Commands::Config(_) => return None,
    };
    Some(root.as_deref().unwrap_or(Path::new(".")))
}
