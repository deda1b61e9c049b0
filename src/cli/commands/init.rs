//! Init command - create project-local .binscope.toml

use crate::cli::args::InitArgs;
use crate::config::LOCAL_CONFIG_FILE;
use crate::error::{BinscopeError, BinscopeResult};
use crate::source::find_module;
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;

/// Template for project-local config; `{prefix}` is replaced by a
/// `local_prefix` line
const INIT_TEMPLATE: &str = r#"# binscope project configuration
# Settings here override your global config (~/.config/binscope/config.toml)

[resolution]
{prefix}
# include_tests = false
# vendor = true                     # <root>/vendor lookup root
# go_mod = true                     # module lookup root from go.mod
# gopath = "/home/me/go"            # <gopath>/src lookup root
# extra_roots = ["/opt/go/src"]

[discovery]
# parallel = false
# workers = 0                       # 0 = available parallelism
# strict = false                    # abort on unparsable entry files
# exclude = ["testdata"]

[output]
# format = "table"                  # table, json, plain
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> BinscopeResult<()> {
    let ctx = UiContext::detect();

    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => std::env::current_dir()
            .map_err(|e| BinscopeError::io("getting current directory", e))?,
    };

    let config_path = target_dir.join(LOCAL_CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(BinscopeError::User(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        )));
    }

    ensure_dir(&target_dir).await?;

    let module = find_module(&target_dir)?;
    let content = render_template(module.as_ref().map(|m| m.path.as_str()));

    fs::write(&config_path, content)
        .await
        .map_err(|e| BinscopeError::io(format!("writing {}", config_path.display()), e))?;

    ui::step_ok_detail(
        &ctx,
        "Created project config",
        &config_path.display().to_string(),
    );
    if module.is_none() {
        ui::remark(&ctx, "No go.mod found; set resolution.local_prefix before scanning");
    }

    Ok(())
}

fn render_template(module: Option<&str>) -> String {
    let prefix = match module {
        Some(path) => format!("local_prefix = {}", toml::Value::String(path.to_string())),
        None => "# local_prefix = \"github.com/acme/proj\"".to_string(),
    };
    INIT_TEMPLATE.replace("{prefix}", &prefix)
}

async fn ensure_dir(dir: &Path) -> BinscopeResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| BinscopeError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_creates_config() {
        let temp = TempDir::new().unwrap();
        let args = InitArgs {
            force: false,
            path: Some(temp.path().to_path_buf()),
        };
        execute(args).await.unwrap();

        let content = std::fs::read_to_string(temp.path().join(LOCAL_CONFIG_FILE)).unwrap();
        assert!(content.contains("[resolution]"));
        assert!(content.contains("[discovery]"));
        assert!(content.contains("# local_prefix"));
    }

    #[tokio::test]
    async fn init_fills_prefix_from_go_mod() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module example.com/proj\n\ngo 1.22\n").unwrap();

        let args = InitArgs {
            force: false,
            path: Some(temp.path().to_path_buf()),
        };
        execute(args).await.unwrap();

        let content = std::fs::read_to_string(temp.path().join(LOCAL_CONFIG_FILE)).unwrap();
        let config: Config = toml::from_str(&content).unwrap();
        assert_eq!(
            config.resolution.local_prefix.as_deref(),
            Some("example.com/proj")
        );
    }

    #[tokio::test]
    async fn init_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_FILE), "existing").unwrap();

        let args = InitArgs {
            force: false,
            path: Some(temp.path().to_path_buf()),
        };
        let result = execute(args).await;
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("already exists"));
    }

    #[tokio::test]
    async fn init_overwrites_with_force() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_FILE), "old content").unwrap();

        let args = InitArgs {
            force: true,
            path: Some(temp.path().to_path_buf()),
        };
        execute(args).await.unwrap();

        let content = std::fs::read_to_string(temp.path().join(LOCAL_CONFIG_FILE)).unwrap();
        assert!(content.contains("[resolution]"));
    }

    #[test]
    fn template_is_valid_toml() {
        let _: Config = toml::from_str(&render_template(None)).unwrap();
        let config: Config = toml::from_str(&render_template(Some("example.com/\"odd\""))).unwrap();
        assert_eq!(
            config.resolution.local_prefix.as_deref(),
            Some("example.com/\"odd\"")
        );
    }
}
