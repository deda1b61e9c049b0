//! Integration tests for binscope

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Command isolated from the user's global config and GOPATH
    fn binscope(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("binscope");
        cmd.env("BINSCOPE_CONFIG", home.join("config.toml"))
            .env_remove("GOPATH");
        cmd
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Two binaries sharing a logging package:
    /// api -> lib/db -> lib/log, tool -> lib/log
    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "go.mod", "module example.com/proj\n\ngo 1.22\n");
        write(
            root,
            "cmd/api/main.go",
            "package main\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/proj/lib/db\"\n)\n\nfunc main() { fmt.Println(db.Open()) }\n",
        );
        write(
            root,
            "cmd/tool/main.go",
            "package main\n\nimport \"example.com/proj/lib/log\"\n\nfunc main() { log.Info() }\n",
        );
        write(
            root,
            "lib/db/db.go",
            "package db\n\nimport \"example.com/proj/lib/log\"\n\nfunc Open() string { log.Info(); return \"\" }\n",
        );
        write(root, "lib/log/log.go", "package log\n\nfunc Info() {}\n");
        temp
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        binscope(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Go binaries"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        binscope(home.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("binscope"));
    }

    #[test]
    fn list_json_reports_closures() {
        let home = TempDir::new().unwrap();
        let tree = sample_tree();

        let output = binscope(home.path())
            .args(["list", "--format", "json"])
            .arg(tree.path())
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let binaries = report["binaries"].as_array().unwrap();
        assert_eq!(binaries.len(), 2);

        assert_eq!(binaries[0]["name"], "api");
        let api_deps: Vec<&str> = binaries[0]["dependencies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["import"].as_str().unwrap())
            .collect();
        assert_eq!(api_deps, ["example.com/proj/lib/db", "example.com/proj/lib/log"]);

        assert_eq!(binaries[1]["name"], "tool");
        assert_eq!(binaries[1]["dependencies"].as_array().unwrap().len(), 1);
        assert!(report["skipped"].as_array().unwrap().is_empty());
    }

    #[test]
    fn list_plain_output() {
        let home = TempDir::new().unwrap();
        let tree = sample_tree();

        binscope(home.path())
            .args(["list", "--format", "plain", "--parallel", "--workers", "2"])
            .arg(tree.path())
            .assert()
            .success()
            .stdout(
                "api\n  example.com/proj/lib/db\n  example.com/proj/lib/log\ntool\n  example.com/proj/lib/log\n",
            );
    }

    #[test]
    fn list_table_output() {
        let home = TempDir::new().unwrap();
        let tree = sample_tree();

        binscope(home.path())
            .arg("list")
            .arg(tree.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("NAME"))
            .stdout(predicate::str::contains("2 binary(s)"));
    }

    #[test]
    fn affected_lists_dependents() {
        let home = TempDir::new().unwrap();
        let tree = sample_tree();

        binscope(home.path())
            .args(["affected", "--format", "plain", "-p", "example.com/proj/lib/db"])
            .arg(tree.path())
            .assert()
            .success()
            .stdout("api\n");

        binscope(home.path())
            .args(["affected", "--format", "plain", "-p", "example.com/proj/lib/..."])
            .arg(tree.path())
            .assert()
            .success()
            .stdout("api\ntool\n");
    }

    #[test]
    fn missing_prefix_fails_with_hint() {
        let home = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write(tree.path(), "main.go", "package main\n\nfunc main() {}\n");

        binscope(home.path())
            .arg("list")
            .arg(tree.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"))
            .stderr(predicate::str::contains("--prefix"));
    }

    #[test]
    fn explicit_prefix_without_go_mod() {
        let home = TempDir::new().unwrap();
        let tree = TempDir::new().unwrap();
        write(
            tree.path(),
            "cmd/app/main.go",
            "package main\n\nimport \"acme/util\"\n\nfunc main() {}\n",
        );
        write(tree.path(), "src/acme/util/util.go", "package util\n");

        binscope(home.path())
            .args(["list", "--format", "plain", "--prefix", "acme/"])
            .arg("--root-dir")
            .arg(tree.path().join("src"))
            .arg(tree.path())
            .assert()
            .success()
            .stdout("app\n  acme/util\n");
    }

    #[test]
    fn broken_entry_file_skipped_or_fatal() {
        let home = TempDir::new().unwrap();
        let tree = sample_tree();
        write(tree.path(), "cmd/broken/main.go", "package main\n\nimport (\n\t\"fmt\"\n");

        let output = binscope(home.path())
            .args(["list", "--format", "json"])
            .arg(tree.path())
            .output()
            .unwrap();
        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["binaries"].as_array().unwrap().len(), 2);
        assert_eq!(report["skipped"].as_array().unwrap().len(), 1);

        binscope(home.path())
            .args(["list", "--strict"])
            .arg(tree.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse"));
    }

    #[test]
    fn local_config_sets_format() {
        let home = TempDir::new().unwrap();
        let tree = sample_tree();
        write(tree.path(), ".binscope.toml", "[output]\nformat = \"plain\"\n");

        binscope(home.path())
            .arg("list")
            .arg(tree.path())
            .assert()
            .success()
            .stdout(predicate::str::starts_with("api\n"));

        binscope(home.path())
            .args(["--no-local", "list"])
            .arg(tree.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("NAME"));
    }

    #[test]
    fn missing_root_fails() {
        let home = TempDir::new().unwrap();
        binscope(home.path())
            .args(["list", "--prefix", "example.com/proj"])
            .arg(home.path().join("does-not-exist"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Scan root not found"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        binscope(home.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        binscope(home.path())
            .args(["--no-local", "config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[resolution]"));
    }

    #[test]
    fn config_init_writes_file() {
        let home = TempDir::new().unwrap();
        binscope(home.path())
            .args(["config", "init"])
            .assert()
            .success();
        assert!(home.path().join("config.toml").exists());
    }

    #[test]
    fn init_creates_local_config() {
        let home = TempDir::new().unwrap();
        let tree = sample_tree();

        binscope(home.path())
            .args(["init", "--path"])
            .arg(tree.path())
            .assert()
            .success();

        let content = fs::read_to_string(tree.path().join(".binscope.toml")).unwrap();
        assert!(content.contains("example.com/proj"));

        binscope(home.path())
            .args(["init", "--path"])
            .arg(tree.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn unknown_command_fails() {
        let home = TempDir::new().unwrap();
        binscope(home.path()).arg("run").assert().failure();
    }
}
