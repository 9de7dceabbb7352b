//! Integration tests that run the compiled `modsync` binary

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the modsync binary, isolated from the caller's env
fn modsync_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("modsync").expect("Failed to find modsync binary");
    cmd.current_dir(dir)
        .env_remove("MODSYNC_ALLOW_HOST_ONLY_REPLACEMENTS");
    cmd
}

fn scenario_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/scenarios")
        .join(name)
}

/// Copy a scenario's plugin and host files into a fresh temp dir.
fn scenario(name: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    for file in ["plugin.mod", "host.txt"] {
        fs::copy(scenario_dir(name).join(file), temp.path().join(file)).unwrap();
    }
    temp
}

fn expected(name: &str) -> String {
    fs::read_to_string(scenario_dir(name).join("expected.mod"))
        .unwrap()
        .replace("\r\n", "\n")
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

// ============================================================================
// General
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    modsync_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_completions() {
    let temp = TempDir::new().unwrap();
    modsync_cmd(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modsync"));
}

#[test]
fn test_missing_plugin_file() {
    let temp = scenario("success");
    modsync_cmd(temp.path())
        .args(["compare", "missing.mod", "host.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.mod file not found"));
}

#[test]
fn test_plugin_path_is_directory() {
    let temp = scenario("success");
    fs::create_dir(temp.path().join("dir.mod")).unwrap();
    modsync_cmd(temp.path())
        .args(["compare", "dir.mod", "host.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a directory"));
}

#[test]
fn test_same_file_twice() {
    let temp = scenario("success");
    modsync_cmd(temp.path())
        .args(["compare", "plugin.mod", "plugin.mod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be different files"));
}

#[test]
fn test_malformed_host_list() {
    let temp = TempDir::new().unwrap();
    for file in ["plugin.mod", "host.txt"] {
        fs::copy(scenario_dir("malformed").join(file), temp.path().join(file)).unwrap();
    }

    modsync_cmd(temp.path())
        .args(["compare", "plugin.mod", "host.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed dependency on line 3"));
}

// ============================================================================
// compare
// ============================================================================

#[test]
fn test_compare_mismatch_writes_report_and_suggestions() {
    let temp = scenario("success");

    modsync_cmd(temp.path())
        .args(["compare", "plugin.mod", "host.txt"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("2 mismatched dependencies"))
        .stdout(predicate::str::contains("pin your dependency"));

    let report = fs::read_to_string(temp.path().join("mismatched_dependencies.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["module"], "github.com/solo-io/bar");
    assert_eq!(value[0]["hostDependency"]["version"], "v1.2.3");

    let suggestions = fs::read_to_string(temp.path().join("suggestions")).unwrap();
    assert!(suggestions.starts_with("require ("));
    assert!(suggestions.contains("\tgithub.com/solo-io/bar v1.2.3\n"));
}

#[test]
fn test_compare_reconciled_pair() {
    let temp = TempDir::new().unwrap();
    fs::copy(
        scenario_dir("success").join("expected.mod"),
        temp.path().join("plugin.mod"),
    )
    .unwrap();
    fs::copy(scenario_dir("success").join("host.txt"), temp.path().join("host.txt")).unwrap();

    modsync_cmd(temp.path())
        .args(["compare", "plugin.mod", "host.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All shared dependencies match"));

    assert!(!temp.path().join("mismatched_dependencies.json").exists());
}

#[test]
fn test_compare_resolved_level() {
    let temp = scenario("mismatch_replace_3");

    modsync_cmd(temp.path())
        .args(["compare", "plugin.mod", "host.txt", "--resolved"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("replace-mismatch"));
}

#[test]
fn test_compare_forked_replacement_via_env() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "plugin.mod", "module example.com/plugin\nrequire example.com/a v1\n");
    write(temp.path(), "host.txt", "example.com/host\nexample.com/a v1 => example.com/a v2\n");

    modsync_cmd(temp.path())
        .args(["compare", "plugin.mod", "host.txt"])
        .assert()
        .code(1);

    modsync_cmd(temp.path())
        .env("MODSYNC_ALLOW_HOST_ONLY_REPLACEMENTS", "true")
        .args(["compare", "plugin.mod", "host.txt"])
        .assert()
        .success();
}

#[test]
fn test_compare_settings_file() {
    let temp = scenario("success");
    write(
        temp.path(),
        "settings.toml",
        "report_file = \"out/report.yaml\"\nreport_format = \"yaml\"\n",
    );

    modsync_cmd(temp.path())
        .args(["--config", "settings.toml", "compare", "plugin.mod", "host.txt"])
        .assert()
        .code(1);

    let report = fs::read_to_string(temp.path().join("out/report.yaml")).unwrap();
    assert!(report.starts_with("- module: github.com/solo-io/bar"));
}

#[test]
fn test_default_settings_file_is_picked_up() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "plugin.mod", "module example.com/plugin\nrequire example.com/a v1\n");
    write(temp.path(), "host.txt", "example.com/host\nexample.com/a v1 => example.com/a v2\n");
    write(temp.path(), "modsync.toml", "allow_host_only_replacements = true\n");

    modsync_cmd(temp.path())
        .args(["compare", "plugin.mod", "host.txt"])
        .assert()
        .success();
}

// ============================================================================
// merge
// ============================================================================

#[test]
fn test_merge_to_output_leaves_plugin_alone() {
    let temp = scenario("mismatch_replace_1");
    let original = fs::read_to_string(temp.path().join("plugin.mod")).unwrap();

    modsync_cmd(temp.path())
        .args(["merge", "plugin.mod", "host.txt", "--output", "merged.mod"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("merged.mod")).unwrap(),
        expected("mismatch_replace_1")
    );
    assert_eq!(fs::read_to_string(temp.path().join("plugin.mod")).unwrap(), original);
}

#[test]
fn test_merge_in_place_backs_up_plugin() {
    let temp = scenario("mismatch_replace_3");
    let original = fs::read_to_string(temp.path().join("plugin.mod")).unwrap();

    modsync_cmd(temp.path())
        .args(["merge", "plugin.mod", "host.txt"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("plugin.mod")).unwrap(),
        expected("mismatch_replace_3")
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("tmp/plugin.mod-1")).unwrap(),
        original
    );
}

#[test]
fn test_merge_twice_uses_next_backup_slot() {
    let temp = scenario("success");

    modsync_cmd(temp.path())
        .args(["merge", "plugin.mod", "host.txt"])
        .assert()
        .success();
    // Second run has nothing to change and leaves the backups alone
    modsync_cmd(temp.path())
        .args(["merge", "plugin.mod", "host.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
    assert!(!temp.path().join("tmp/plugin.mod-2").exists());

    write(
        temp.path(),
        "plugin.mod",
        "module example.com/plugin\nrequire github.com/solo-io/bar v0.0.1\n",
    );
    modsync_cmd(temp.path())
        .args(["merge", "plugin.mod", "host.txt"])
        .assert()
        .success();
    assert!(temp.path().join("tmp/plugin.mod-2").exists());
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_replaces_plugin() {
    let temp = scenario("mismatch_replace_2");

    modsync_cmd(temp.path())
        .args(["resolve", "plugin.mod", "host.txt", "--attempts", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All shared dependencies match"));

    assert_eq!(
        fs::read_to_string(temp.path().join("plugin.mod")).unwrap(),
        expected("mismatch_replace_2")
    );
    assert!(temp.path().join("tmp/plugin.mod-1").exists());
}

#[test]
fn test_resolve_reports_when_stuck() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "plugin.mod",
        "module example.com/plugin\nreplace example.com/a => example.com/a-fork v1\n",
    );
    write(temp.path(), "host.txt", "example.com/host\nexample.com/a v1 => example.com/a v2\n");

    modsync_cmd(temp.path())
        .args(["resolve", "plugin.mod", "host.txt", "--attempts", "4"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("replace-mismatch"));

    assert!(temp.path().join("tmp/passes/plugin.mod-1").exists());
    assert!(temp.path().join("mismatched_dependencies.json").exists());
    // The plugin file is untouched
    assert!(
        fs::read_to_string(temp.path().join("plugin.mod"))
            .unwrap()
            .contains("a-fork")
    );
}

#[test]
fn test_resolve_rejects_zero_attempts() {
    let temp = scenario("success");
    modsync_cmd(temp.path())
        .args(["resolve", "plugin.mod", "host.txt", "--attempts", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}
