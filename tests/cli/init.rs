//! Tests for `dotsync init`.

use crate::support::*;

#[test]
fn test_init_writes_project_file() {
    let t = Test::new();

    let output = t.init_cmd("api", "env");
    assert_success(&output);
    assert_stdout_contains(&output, "initialized .dotsync.toml");

    let config = t.read(".dotsync.toml");
    assert!(config.contains("folder = \"api\""));
    assert!(config.contains("type = \"env\""));
}

#[test]
fn test_init_env_adds_gitignore_entry() {
    let t = Test::new();
    t.write(".gitignore", "target/\n");

    assert_success(&t.run(&["init", "api", "--type", "env", "--file", "config/app.env"]));

    let gitignore = t.read(".gitignore");
    assert!(gitignore.contains("target/"));
    assert!(gitignore.contains("config/app.env"));
}

#[test]
fn test_init_dotnet_keeps_project_path() {
    let t = Test::new();

    assert_success(&t.run(&["init", "api", "--type", "dotnet", "--project", "./src/Api"]));

    let config = t.read(".dotsync.toml");
    assert!(config.contains("type = \"dotnet\""));
    assert!(config.contains("./src/Api"));
    assert!(!t.project_path(".gitignore").exists());
}

#[test]
fn test_init_twice_requires_force() {
    let t = Test::init("api", "env");

    let output = t.init_cmd("web", "env");
    assert_failure(&output);
    assert_stderr_contains(&output, "already initialized");

    assert_success(&t.run(&["init", "web", "--type", "env", "--force"]));
    assert!(t.read(".dotsync.toml").contains("folder = \"web\""));
}

#[test]
fn test_init_without_folder_fails_without_terminal() {
    let t = Test::new();

    let output = t.run(&["init", "--type", "env"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required field: folder");
}

#[test]
fn test_init_rejects_unknown_type() {
    let t = Test::new();

    let output = t.init_cmd("api", "yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "unsupported secrets type 'yaml'");
}
