//! Command line behaviour of the binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn bin(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("central_portal_bundler").unwrap();
    cmd.current_dir(dir)
        .env_remove("CENTRAL_PORTAL_USERNAME")
        .env_remove("CENTRAL_PORTAL_PASSWORD")
        .env_remove("CENTRAL_PORTAL_TOKEN");
    cmd
}

#[test]
fn bundle_reads_project_file_and_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("central-portal.toml"),
        "group_id = \"com.example\"\nartifact_id = \"foo\"\nversion = \"1.0.0\"\n",
    );
    write(&dir.path().join("build/outputs/aar/foo.aar"), "aar");
    write(&dir.path().join("build/publications/maven/foo.pom"), "<project/>");

    bin(dir.path())
        .args(["bundle", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"com/example/foo/1.0.0/foo-1.0.0.aar\"",
        ))
        .stdout(predicate::str::contains("\"upload\"").not());

    assert!(dir.path().join("build/central-portal-upload.zip").is_file());
}

#[test]
fn bundle_without_coordinates_fails() {
    let dir = tempfile::tempdir().unwrap();

    bin(dir.path())
        .arg("bundle")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("group_id"));
}

#[test]
fn upload_without_credentials_fails_before_bundling() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("build/outputs/aar/foo.aar"), "aar");

    bin(dir.path())
        .args([
            "--group-id",
            "com.example",
            "--artifact-id",
            "foo",
            "--artifact-version",
            "1.0.0",
            "upload",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CENTRAL_PORTAL_USERNAME"));

    assert!(!dir.path().join("build/central-portal-upload.zip").exists());
}

#[test]
fn missing_explicit_project_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    bin(dir.path())
        .args(["--config", "elsewhere.toml", "bundle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("elsewhere.toml"));
}
