//! Tests for `dotsync pull`.

use crate::support::*;

#[test]
fn test_pull_writes_new_env_file() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[("DB_HOST", "db.internal"), ("API_KEY", "k-123")]);

    let output = t.pull();
    assert_success(&output);
    assert_stdout_contains(&output, "pulled 2 secrets into .env");

    assert_eq!(t.read(".env"), "API_KEY=\"k-123\"\nDB_HOST=\"db.internal\"\n");
}

#[test]
fn test_pull_preserves_layout() {
    let t = Test::init("api", "env");
    t.write(".env", SAMPLE_ENV);
    t.seed_folder(
        "api",
        &[
            ("DB_HOST", "prod-db"),
            ("DB_PORT", "5432"),
            ("API_KEY", "new"),
            ("NEW_KEY", "x"),
        ],
    );

    assert_success(&t.pull());

    assert_eq!(
        t.read(".env"),
        "# database\n\
         DB_HOST=\"prod-db\"\n\
         DB_PORT = 5432\n\
         \n\
         API_KEY=\"new\"\n\
         NEW_KEY=\"x\"\n"
    );
}

#[test]
fn test_pull_keeps_keys_the_vault_does_not_have() {
    let t = Test::init("api", "env");
    t.write(".env", "LOCAL_ONLY=1\nAPI_KEY=old\n");
    t.seed_folder("api", &[("API_KEY", "new")]);

    assert_success(&t.pull());

    assert_eq!(t.read(".env"), "LOCAL_ONLY=1\nAPI_KEY=\"new\"\n");
}

#[test]
fn test_pull_twice_is_stable() {
    let t = Test::init("api", "env");
    t.write(".env", SAMPLE_ENV);
    t.seed_folder("api", &[("DB_HOST", "prod-db"), ("EXTRA", "1")]);

    assert_success(&t.pull());
    let first = t.read(".env");
    assert_success(&t.pull());

    assert_eq!(t.read(".env"), first);
}

#[test]
fn test_pull_skips_failing_secret_and_writes_the_rest() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[("A", "1"), ("B", "2"), ("C", "3")]);
    t.fail_secret("api", "B");

    let output = t.pull();
    assert_success(&output);
    assert_stderr_contains(&output, "skipped resource");
    assert_stdout_contains(&output, "pulled 2 secrets into .env");

    assert_eq!(t.read(".env"), "A=\"1\"\nC=\"3\"\n");
}

#[test]
fn test_pull_round_trips_escaped_values() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[("WIN_PATH", r"C:\new\table"), ("PEM", "line1\nline2")]);

    assert_success(&t.pull());
    let first = t.read(".env");
    assert_eq!(first, "PEM=\"line1\\nline2\"\nWIN_PATH=\"C:\\\\new\\\\table\"\n");

    assert_success(&t.pull());
    assert_eq!(t.read(".env"), first);

    assert_success(&t.push());
    assert_eq!(t.vault_secret("api", "WIN_PATH").as_deref(), Some(r"C:\new\table"));
    assert_eq!(t.vault_secret("api", "PEM").as_deref(), Some("line1\nline2"));
}

#[test]
fn test_pull_with_overrides_and_no_project_file() {
    let t = Test::new();
    t.write("config/.keep", "");
    t.seed_folder("web", &[("PORT", "8080")]);

    let output = t.run(&["pull", "web", "--type", "env", "--file", "config/web.env"]);
    assert_success(&output);

    assert_eq!(t.read("config/web.env"), "PORT=\"8080\"\n");
    assert!(!t.project_path(".env").exists());
}

#[test]
fn test_pull_empty_folder_writes_nothing() {
    let t = Test::init("api", "env");
    t.seed_folder("api", &[]);

    let output = t.pull();
    assert_success(&output);
    assert_stdout_contains(&output, "no secrets to pull");
    assert!(!t.project_path(".env").exists());
}

#[test]
fn test_pull_missing_folder_fails() {
    let t = Test::init("missing", "env");
    t.seed_folder("api", &[("A", "1")]);

    let output = t.pull();
    assert_failure(&output);
    assert_stderr_contains(&output, "folder not found: missing");
}

#[test]
fn test_pull_prefers_exact_case_match() {
    let t = Test::init("Api", "env");
    t.seed_folder("api", &[("A", "lower")]);
    t.seed_folder("Api", &[("A", "title")]);

    assert_success(&t.pull());

    assert_eq!(t.read(".env"), "A=\"title\"\n");
}

#[test]
fn test_pull_ambiguous_folder_fails() {
    let t = Test::init("api", "env");
    t.seed_folder("API", &[("A", "1")]);
    t.seed_folder("Api", &[("A", "2")]);

    let output = t.pull();
    assert_failure(&output);
    assert_stderr_contains(&output, "ambiguous");
}

#[test]
fn test_pull_without_project_fails_with_hint() {
    let t = Test::new();

    let output = t.pull();
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required field: folder");
    assert_stderr_contains(&output, "run: dotsync init");
}
