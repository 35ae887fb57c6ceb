use std::fs;

use assert_cmd::Command;
use assert_fs::{TempDir, prelude::*};
use pretty_assertions::assert_eq;

const PROPERTIES: &str = "\
repo.npm.release=https://npm.example.com/
repo.npm.snapshot=https://npm-snapshot.example.com/
";

fn render_cmd() -> Command {
    Command::cargo_bin("render-deps").unwrap()
}

/// Create a deploy command with a clean credential environment
fn deploy_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("deploy-npm").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DEPLOY_NPM_USERNAME")
        .env_remove("DEPLOY_NPM_PASSWORD")
        .env_remove("DEPLOY_NPM_EMAIL");
    cmd
}

fn stderr_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn renders_version_placeholder() {
    let dir = TempDir::new().unwrap();
    dir.child("VERSION").write_str("1.2.3\n").unwrap();

    render_cmd()
        .current_dir(dir.path())
        .args([
            "--output",
            "deps.txt",
            "--version_file",
            "VERSION",
            "--deps",
            "foo-{version}",
        ])
        .assert()
        .success();

    let rendered = fs::read_to_string(dir.child("deps.txt").path()).unwrap();
    assert_eq!(rendered, "foo-1.2.3");
}

#[test]
fn joins_deps_with_comma_space() {
    let dir = TempDir::new().unwrap();
    dir.child("VERSION").write_str("1.2.3").unwrap();

    render_cmd()
        .current_dir(dir.path())
        .args([
            "--output",
            "deps.txt",
            "--version_file",
            "VERSION",
            "--deps",
            "x",
            "y",
            "z",
        ])
        .assert()
        .success();

    let rendered = fs::read_to_string(dir.child("deps.txt").path()).unwrap();
    assert_eq!(rendered, "x, y, z");
}

#[test]
fn renders_workspace_references() {
    let dir = TempDir::new().unwrap();
    dir.child("VERSION").write_str("1.2.3").unwrap();
    dir.child("refs.json")
        .write_str(r#"{"commits": {"a": "deadbeef"}, "tags": {"b": "v1.0.0"}}"#)
        .unwrap();

    render_cmd()
        .current_dir(dir.path())
        .args([
            "--output",
            "deps.txt",
            "--version_file",
            "VERSION",
            "--workspace_refs",
            "refs.json",
            "--deps",
            "pkg@%{@a}",
            "lib@%{@b}",
        ])
        .assert()
        .success();

    let rendered = fs::read_to_string(dir.child("deps.txt").path()).unwrap();
    assert_eq!(rendered, "pkg@0.0.0-deadbeef, lib@v1.0.0");
}

#[test]
fn render_fails_without_version_file() {
    let dir = TempDir::new().unwrap();

    render_cmd()
        .current_dir(dir.path())
        .args([
            "--output",
            "deps.txt",
            "--version_file",
            "VERSION",
            "--deps",
            "foo",
        ])
        .assert()
        .failure();

    assert!(!dir.child("deps.txt").path().exists());
}

#[test]
fn render_fails_on_malformed_workspace_refs() {
    let dir = TempDir::new().unwrap();
    dir.child("VERSION").write_str("1.2.3").unwrap();
    dir.child("refs.json")
        .write_str(r#"{"commits": {}}"#)
        .unwrap();

    render_cmd()
        .current_dir(dir.path())
        .args([
            "--output",
            "deps.txt",
            "--version_file",
            "VERSION",
            "--workspace_refs",
            "refs.json",
            "--deps",
            "foo",
        ])
        .assert()
        .failure();
}

#[test]
fn unknown_repo_type_lists_valid_types() {
    let dir = TempDir::new().unwrap();
    dir.child("deployment.properties")
        .write_str(PROPERTIES)
        .unwrap();

    let assert = deploy_cmd(&dir).arg("central").assert().failure();

    let stderr = stderr_of(&assert);
    assert!(stderr.contains("invalid repo type"), "stderr: {stderr}");
    assert!(stderr.contains("release"), "stderr: {stderr}");
    assert!(stderr.contains("snapshot"), "stderr: {stderr}");

    // fails before any archive work
    assert!(!dir.child("deploy_npm_updated.tgz").path().exists());
}

#[test]
fn missing_credentials_name_the_variable() {
    let dir = TempDir::new().unwrap();
    dir.child("deployment.properties")
        .write_str(PROPERTIES)
        .unwrap();

    let assert = deploy_cmd(&dir).arg("release").assert().failure();
    assert!(stderr_of(&assert).contains("DEPLOY_NPM_USERNAME"));

    let assert = deploy_cmd(&dir)
        .env("DEPLOY_NPM_USERNAME", "bob")
        .arg("release")
        .assert()
        .failure();
    assert!(stderr_of(&assert).contains("DEPLOY_NPM_PASSWORD"));

    let assert = deploy_cmd(&dir)
        .env("DEPLOY_NPM_USERNAME", "bob")
        .env("DEPLOY_NPM_PASSWORD", "hunter2")
        .arg("release")
        .assert()
        .failure();
    assert!(stderr_of(&assert).contains("DEPLOY_NPM_EMAIL"));
}

#[test]
fn deploy_fails_without_properties_file() {
    let dir = TempDir::new().unwrap();

    let assert = deploy_cmd(&dir).arg("release").assert().failure();
    assert!(stderr_of(&assert).contains("deployment.properties"));
}
