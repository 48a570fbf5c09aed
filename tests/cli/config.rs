//! Tests for `dotsync configure`, `whoami` and `completions`.

use crate::support::*;
use predicates::prelude::*;

fn credentials_path(t: &Test) -> std::path::PathBuf {
    t.home.path().join(".config").join("dotsync").join("config.toml")
}

#[test]
fn test_configure_saves_credentials() {
    let t = Test::new();

    let output = t.run(&[
        "configure",
        "--server",
        "https://vault.example.com",
        "--token",
        "tok-abcdef123456",
        "--key",
        "ABCD1234",
    ]);
    assert_success(&output);
    assert_stdout_contains(&output, "saved credentials");

    let saved = std::fs::read_to_string(credentials_path(&t)).unwrap();
    assert!(saved.contains("https://vault.example.com"));
    assert!(saved.contains("ABCD1234"));
}

#[cfg(unix)]
#[test]
fn test_configure_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    assert_success(&t.run(&["configure", "--token", "tok-abcdef123456"]));

    let mode = std::fs::metadata(credentials_path(&t))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_configure_http_server_requires_token() {
    let t = Test::new();

    let output = t.run(&["configure", "--server", "https://vault.example.com"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required field: token");
    assert_stderr_contains(&output, "run: dotsync configure");
}

#[test]
fn test_configure_without_server_fails() {
    let t = Test::new();

    let output = t.cmd().env_remove("DOTSYNC_SERVER").arg("configure").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required field: server");
}

#[test]
fn test_whoami_masks_token() {
    let t = Test::new();
    assert_success(&t.run(&[
        "configure",
        "--server",
        "https://vault.example.com",
        "--token",
        "tok-abcdef123456",
    ]));

    let output = t.cmd().env_remove("DOTSYNC_SERVER").arg("whoami").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "https://vault.example.com");
    assert_stdout_contains(&output, "3456");
    assert_stdout_excludes(&output, "tok-abcdef123456");
}

#[test]
fn test_whoami_without_credentials() {
    let t = Test::new();

    let output = t.cmd().env_remove("DOTSYNC_SERVER").arg("whoami").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "(not set)");
    assert_stderr_contains(&output, "run: dotsync configure");
}

#[test]
fn test_completions_bash() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dotsync").and(predicate::str::contains("pull")));
}

#[test]
fn test_completions_reject_unknown_shell() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
