//! Tests for `dotsync push`.

use crate::support::*;

#[test]
fn test_push_creates_and_updates() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[("API_KEY", "old")]);
    t.write(".env", "# keys\nAPI_KEY=\"new\"\nDB_HOST=db.internal\n");

    let output = t.push();
    assert_success(&output);
    assert_stdout_contains(&output, "1 created, 1 updated");

    assert_eq!(t.vault_secret("api", "API_KEY").as_deref(), Some("new"));
    assert_eq!(t.vault_secret("api", "DB_HOST").as_deref(), Some("db.internal"));
}

#[test]
fn test_push_never_deletes_remote_secrets() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[("REMOTE_ONLY", "keep")]);
    t.write(".env", "A=1\n");

    assert_success(&t.push());

    assert_eq!(t.vault_secret("api", "REMOTE_ONLY").as_deref(), Some("keep"));
    assert_eq!(t.vault_secret("api", "A").as_deref(), Some("1"));
}

#[test]
fn test_push_dry_run_changes_nothing() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[("API_KEY", "old")]);
    t.write(".env", "API_KEY=new\nDB_HOST=h\n");

    let output = t.push_dry_run();
    assert_success(&output);
    assert_stdout_contains(&output, "update API_KEY");
    assert_stdout_contains(&output, "create DB_HOST");
    assert_stderr_contains(&output, "dry run");

    assert_eq!(t.vault_secret("api", "API_KEY").as_deref(), Some("old"));
    assert_eq!(t.vault_secret("api", "DB_HOST"), None);
}

#[test]
fn test_push_skips_bare_keys() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[]);
    t.write(".env", "BARE\nSET=1\n");

    assert_success(&t.push());

    assert_eq!(t.vault_secret("api", "BARE"), None);
    assert_eq!(t.vault_secret("api", "SET").as_deref(), Some("1"));
}

#[test]
fn test_push_empty_store_is_a_noop() {
    let t = Test::init("api", "env");

    let output = t.push();
    assert_success(&output);
    assert_stdout_contains(&output, "no secrets in .env");
}

#[test]
fn test_push_missing_folder_fails() {
    let t = Test::init("api", "env");
    t.write(".env", "A=1\n");

    let output = t.push();
    assert_failure(&output);
    assert_stderr_contains(&output, "folder not found: api");
}

#[test]
fn test_pull_after_push_round_trips() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[]);
    t.write(".env", "A=\"1\"\nB=\"two words\"\n");
    assert_success(&t.push());

    let other = Test::new();
    std::fs::copy(t.vault_path(), other.vault_path()).unwrap();
    assert_success(&other.run(&["pull", "api", "--type", "env"]));

    assert_eq!(other.read(".env"), "A=\"1\"\nB=\"two words\"\n");
}
