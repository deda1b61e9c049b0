//! Scan setup shared by the list and affected commands

use crate::cli::args::{OutputFormat, ScanArgs};
use crate::config::Config;
use crate::discover::{Discoverer, Discovery};
use crate::error::{BinscopeError, BinscopeResult};
use crate::resolve::{LookupRoot, LookupRoots, Resolution};
use crate::source::{find_module, GoModule, GoSourceExtractor};
use crate::ui::{TaskSpinner, UiContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Everything needed to scan one tree, merged from flags and configuration
pub(crate) struct ScanPlan {
    pub root: PathBuf,
    pub resolution: Resolution,
    pub roots: LookupRoots,
    pub exclude: Vec<String>,
    pub parallel: bool,
    pub workers: usize,
    pub strict: bool,
}

impl ScanPlan {
    /// Merge flags over configuration. Flags win; the local prefix falls back
    /// to the `go.mod` module path.
    pub fn build(args: &ScanArgs, config: &Config) -> BinscopeResult<Self> {
        let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
        if !root.is_dir() {
            return Err(BinscopeError::RootNotFound(root));
        }

        let resolution_config = &config.resolution;
        let module = if resolution_config.go_mod || resolution_config.local_prefix.is_none() {
            find_module(&root)?
        } else {
            None
        };

        let prefix = args
            .prefix
            .clone()
            .or_else(|| resolution_config.local_prefix.clone())
            .or_else(|| module.as_ref().map(|m| m.path.clone()))
            .filter(|p| !p.is_empty())
            .ok_or_else(|| BinscopeError::MissingLocalPrefix(root.clone()))?;
        debug!("Local import prefix: {}", prefix);

        let resolution = Resolution::new(prefix)
            .with_tests(args.include_tests || resolution_config.include_tests);

        let gopath = args.gopath.as_ref().or(resolution_config.gopath.as_ref());
        let extra_roots = resolution_config.extra_roots.iter().chain(&args.root_dirs);
        let roots = lookup_roots(
            &root,
            resolution_config.vendor,
            module.filter(|_| resolution_config.go_mod),
            gopath.map(PathBuf::as_path),
            extra_roots,
        );

        let mut exclude = config.discovery.exclude.clone();
        exclude.extend(args.exclude.iter().cloned());

        Ok(Self {
            root,
            resolution,
            roots,
            exclude,
            parallel: args.parallel || config.discovery.parallel,
            workers: args.workers.unwrap_or(config.discovery.workers),
            strict: args.strict || config.discovery.strict,
        })
    }

    /// Walk the tree and resolve every binary
    pub async fn run(self) -> BinscopeResult<Discovery> {
        for root in self.roots.roots() {
            debug!("Lookup root: {}", root);
        }

        let discoverer = Discoverer::new(
            self.resolution,
            Arc::new(GoSourceExtractor::new()),
            Arc::new(self.roots),
        )
        .with_excluded_dirs(self.exclude)
        .strict(self.strict);

        if self.parallel {
            discoverer.scan_parallel(&self.root, self.workers).await
        } else {
            let root = self.root;
            tokio::task::spawn_blocking(move || discoverer.scan(&root))
                .await
                .map_err(|e| BinscopeError::Worker(e.to_string()))?
        }
    }
}

/// Output format from the flag, falling back to `output.format`
pub(crate) fn output_format(
    flag: Option<OutputFormat>,
    config: &Config,
) -> BinscopeResult<OutputFormat> {
    match flag {
        Some(format) => Ok(format),
        None => OutputFormat::from_config(&config.output.format).ok_or_else(|| {
            BinscopeError::User(format!(
                "Unknown output format in configuration: {}",
                config.output.format
            ))
        }),
    }
}

/// Run a scan, with a spinner when the output is meant for a human
pub(crate) async fn discover(
    args: &ScanArgs,
    config: &Config,
    format: OutputFormat,
) -> BinscopeResult<Discovery> {
    let plan = ScanPlan::build(args, config)?;
    if format != OutputFormat::Table {
        return plan.run().await;
    }

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Scanning {}...", plan.root.display()));

    match plan.run().await {
        Ok(discovery) => {
            spinner.stop(&format!(
                "Scanned {} binaries, {} local packages",
                discovery.binaries.len(),
                discovery.packages
            ));
            Ok(discovery)
        }
        Err(e) => {
            spinner.stop_error("Scan failed");
            Err(e)
        }
    }
}

/// Lookup roots in priority order: vendor, module, GOPATH, extra roots
fn lookup_roots<'a>(
    root: &Path,
    vendor: bool,
    module: Option<GoModule>,
    gopath: Option<&Path>,
    extra: impl IntoIterator<Item = &'a PathBuf>,
) -> LookupRoots {
    let mut roots = LookupRoots::default();

    if vendor {
        roots.push(LookupRoot::Tree(root.join("vendor")));
    }
    if let Some(module) = module {
        roots.push(LookupRoot::Module {
            module: module.path,
            dir: module.dir,
        });
    }
    if let Some(gopath) = gopath {
        roots.push(LookupRoot::Tree(gopath.join("src")));
    }
    for dir in extra {
        roots.push(LookupRoot::Tree(dir.clone()));
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(root: &Path) -> ScanArgs {
        ScanArgs {
            root: Some(root.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn prefix_from_go_mod() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("go.mod"), "module example.com/proj\n").unwrap();

        let plan = ScanPlan::build(&args_for(temp.path()), &Config::default()).unwrap();
        assert_eq!(plan.resolution.local_prefix, "example.com/proj");
        assert!(matches!(
            plan.roots.roots(),
            [LookupRoot::Tree(_), LookupRoot::Module { .. }]
        ));
    }

    #[test]
    fn flag_prefix_beats_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.resolution.local_prefix = Some("example.com/config".to_string());
        config.resolution.go_mod = false;

        let mut args = args_for(temp.path());
        args.prefix = Some("example.com/flag".to_string());

        let plan = ScanPlan::build(&args, &config).unwrap();
        assert_eq!(plan.resolution.local_prefix, "example.com/flag");
    }

    #[test]
    fn missing_prefix_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = ScanPlan::build(&args_for(temp.path()), &Config::default())
            .err()
            .unwrap();
        assert!(matches!(err, BinscopeError::MissingLocalPrefix(_)));
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = ScanPlan::build(&args_for(&temp.path().join("nope")), &Config::default())
            .err()
            .unwrap();
        assert!(matches!(err, BinscopeError::RootNotFound(_)));
    }

    #[test]
    fn output_format_falls_back_to_config() {
        let mut config = Config::default();
        assert_eq!(
            output_format(Some(OutputFormat::Json), &config).unwrap(),
            OutputFormat::Json
        );
        assert_eq!(output_format(None, &config).unwrap(), OutputFormat::Table);

        config.output.format = "plain".to_string();
        assert_eq!(output_format(None, &config).unwrap(), OutputFormat::Plain);

        config.output.format = "yaml".to_string();
        assert!(output_format(None, &config).is_err());
    }

    #[test]
    fn workers_flag_with_parallel_from_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.resolution.local_prefix = Some("example.com/proj".to_string());
        config.discovery.parallel = true;

        let mut args = args_for(temp.path());
        args.workers = Some(4);

        let plan = ScanPlan::build(&args, &config).unwrap();
        assert!(plan.parallel);
        assert_eq!(plan.workers, 4);
    }

    #[test]
    fn lookup_root_order() {
        let extra = vec![PathBuf::from("/extra")];
        let roots = lookup_roots(
            Path::new("/repo"),
            true,
            Some(GoModule {
                path: "example.com/proj".to_string(),
                dir: PathBuf::from("/repo"),
            }),
            Some(Path::new("/go")),
            &extra,
        );

        assert_eq!(
            roots.roots(),
            &[
                LookupRoot::Tree(PathBuf::from("/repo/vendor")),
                LookupRoot::Module {
                    module: "example.com/proj".to_string(),
                    dir: PathBuf::from("/repo"),
                },
                LookupRoot::Tree(PathBuf::from("/go/src")),
                LookupRoot::Tree(PathBuf::from("/extra")),
            ]
        );
    }

    #[test]
    fn flags_and_config_combine() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.resolution.local_prefix = Some("example.com/proj".to_string());
        config.resolution.vendor = false;
        config.resolution.go_mod = false;
        config.discovery.exclude = vec!["testdata".to_string()];
        config.discovery.workers = 4;

        let mut args = args_for(temp.path());
        args.exclude = vec!["fixtures".to_string()];
        args.root_dirs = vec![PathBuf::from("/extra")];

        let plan = ScanPlan::build(&args, &config).unwrap();
        assert_eq!(plan.exclude, vec!["testdata", "fixtures"]);
        assert_eq!(plan.workers, 4);
        assert_eq!(
            plan.roots.roots(),
            &[LookupRoot::Tree(PathBuf::from("/extra"))]
        );
    }
}
