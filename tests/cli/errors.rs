//! Error reporting tests.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_malformed_project_file() {
    let t = Test::new();
    t.write(".dotsync.toml", "folder = [unterminated");

    let output = t.pull();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

#[test]
fn test_unknown_type_flag() {
    let t = Test::init("api", "env");

    let output = t.run(&["pull", "--type", "json"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "unsupported secrets type 'json'");
}

#[test]
fn test_corrupt_vault_file() {
    let t = Test::init("api", "env");
    std::fs::write(t.vault_path(), "not json").unwrap();

    let output = t.pull();
    assert_failure(&output);
    assert_stderr_contains(&output, "json error");
}

#[cfg(unix)]
#[test]
fn test_pull_dotnet_without_tool() {
    let t = Test::init("api", "dotnet");
    t.seed_folder("api", &[("A", "1")]);
    let empty = tempfile::TempDir::new().unwrap();

    let output = t.cmd().env("PATH", empty.path()).arg("pull").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "dotnet not found on PATH");
    assert_stderr_contains(&output, "install the .NET SDK");
}

#[test]
fn test_errors_use_stderr_only() {
    let t = Test::new();

    t.cmd()
        .arg("pull")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("✗ "));
}
