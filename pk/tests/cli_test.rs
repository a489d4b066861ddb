//! End-to-end tests for the `pk` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// `pk -C <dir>` isolated from any user-level config
fn pk(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pk").expect("pk binary not built");
    cmd.env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("-C")
        .arg(dir);
    cmd
}

#[test]
fn test_create_and_remove() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    pk(temp.path())
        .args(["create", "out/report.txt", "docs/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ensured 2 path(s)"));

    let report = temp.path().join("out/report.txt");
    assert_eq!(fs::metadata(&report).unwrap().len(), 0);
    assert!(temp.path().join("docs").is_dir());

    pk(temp.path()).args(["remove", "out/", "missing/*"]).assert().success();

    assert!(!temp.path().join("out").exists());
    assert!(temp.path().join("docs").is_dir());
}

#[test]
fn test_remove_recursive_flag() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir_all(temp.path().join("pkg/sub")).unwrap();
    fs::write(temp.path().join("pkg/sub/mod.pyc"), "").unwrap();

    pk(temp.path()).args(["remove", "**/*.pyc"]).assert().success();
    assert!(temp.path().join("pkg/sub/mod.pyc").exists());

    pk(temp.path()).args(["remove", "--recursive", "**/*.pyc"]).assert().success();
    assert!(!temp.path().join("pkg/sub/mod.pyc").exists());
}

#[test]
fn test_list_shows_tasks() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    pk(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean_build"))
        .stdout(predicate::str::contains("release_docs"))
        .stdout(predicate::str::contains("Clean python file artifacts"));
}

#[test]
fn test_run_setup_project() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    pk(temp.path())
        .args(["run", "setup_project", "setup_tox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("setup_project, setup_tox"));

    for file in ["README.rst", "LICENSE.txt", "requirements.txt", "requirements-dev.txt", "tox.ini"] {
        assert!(temp.path().join(file).is_file(), "{} missing", file);
    }
}

#[test]
fn test_run_unknown_task_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    pk(temp.path())
        .args(["run", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown task 'nope'"));
}

#[test]
fn test_run_without_tasks_or_defaults_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    pk(temp.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("default-tasks"));
}

#[test]
fn test_run_default_tasks_from_config() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("pypackage.yml"), "runner:\n  default-tasks: [clean_build]\n").unwrap();
    fs::create_dir_all(temp.path().join("dist")).unwrap();
    fs::write(temp.path().join("dist/widgets-0.1.tar.gz"), "").unwrap();
    fs::create_dir_all(temp.path().join("widgets.egg-info")).unwrap();
    fs::write(temp.path().join("setup.py"), "").unwrap();

    pk(temp.path()).arg("run").assert().success();

    assert!(!temp.path().join("dist").exists());
    assert!(!temp.path().join("widgets.egg-info").exists());
    assert!(temp.path().join("setup.py").is_file());
}

#[test]
fn test_run_dry_run_prints_actions() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("pypackage.yml"), "project:\n  package: widgets\n").unwrap();

    pk(temp.path())
        .args(["run", "--dry-run", "--builder", "latex", "docs", "setup_project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sphinx-build -b latex docs docs/_build/latex"))
        .stdout(predicate::str::contains("create_files(README.rst"));

    assert!(!temp.path().join("README.rst").exists());
}

#[test]
fn test_install_writes_config() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    pk(temp.path())
        .args(["install", "-a", "Ada", "-p", "widgets", "-g", "ada/widgets"])
        .assert()
        .success();

    let content = fs::read_to_string(temp.path().join("pypackage.yml")).unwrap();
    assert!(content.contains("author: Ada"));
    assert!(content.contains("package: widgets"));
    assert!(content.contains("github-repo: ada/widgets"));

    pk(temp.path())
        .args(["install", "-a", "Bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    pk(temp.path()).args(["install", "-a", "Bob", "--force"]).assert().success();
    let content = fs::read_to_string(temp.path().join("pypackage.yml")).unwrap();
    assert!(content.contains("author: Bob"));
}

#[test]
fn test_malformed_local_config_warns_and_uses_defaults() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("pypackage.yml"), "runner: [not, a, map").unwrap();

    pk(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean_build"))
        .stderr(predicate::str::contains("Failed to load config from pypackage.yml"));
}

#[test]
fn test_log_level_read_from_config_before_loading() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("pypackage.yml"), "log-level: info\n").unwrap();

    pk(temp.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded config from: pypackage.yml"));
}
