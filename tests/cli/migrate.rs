//! Tests for `dotsync migrate`.

use crate::support::*;
use dotsync::core::domain::PermissionLevel;

#[test]
fn test_migrate_creates_group_and_moves_folder() {
    let t = Test::init("api", "env");
    let parent = t.seed_folder("dotsync", &[]);
    let folder = t.seed_folder("api", &[("A", "1")]);
    let alice = t.seed_user("alice@example.com", "Alice", "Smith");
    let bob = t.seed_user("bob@example.com", "Bob", "Jones");
    t.grant(&folder, &alice, PermissionLevel::Owner);
    t.grant(&folder, &bob, PermissionLevel::Read);

    let output = t.migrate("devs");
    assert_success(&output);
    assert_stdout_contains(&output, "devs (create)");
    assert_stdout_contains(&output, "Alice Smith (manager)");
    assert_stdout_contains(&output, "Bob Jones (member)");

    let group = t.vault_group("devs").expect("group created");
    assert_eq!(group.members.len(), 2);
    assert!(group
        .members
        .iter()
        .any(|m| m.user_id == alice.id && m.is_manager));
    assert!(group
        .members
        .iter()
        .any(|m| m.user_id == bob.id && !m.is_manager));
    assert_eq!(t.vault().parent_of(&folder), Some(parent));
}

#[test]
fn test_migrate_updates_existing_group() {
    let t = Test::init("api", "env");
    t.seed_folder("dotsync", &[]);
    let folder = t.seed_folder("api", &[]);
    let alice = t.seed_user("alice@example.com", "Alice", "Smith");
    let bob = t.seed_user("bob@example.com", "Bob", "Jones");
    t.seed_group("devs", &[(&bob, true)]);
    t.grant(&folder, &alice, PermissionLevel::Update);

    let output = t.migrate("devs");
    assert_success(&output);
    assert_stdout_contains(&output, "devs (update)");

    let group = t.vault_group("devs").expect("group exists");
    assert_eq!(group.members.len(), 2);
    assert!(group.has_member(&alice.id));
}

#[test]
fn test_migrate_records_team_in_project_file() {
    let t = Test::init("api", "env");
    t.seed_folder("dotsync", &[]);
    let folder = t.seed_folder("api", &[]);
    let alice = t.seed_user("alice@example.com", "Alice", "Smith");
    t.grant(&folder, &alice, PermissionLevel::Owner);

    assert_success(&t.migrate("devs"));

    assert!(t.read(".dotsync.toml").contains("team = \"devs\""));
}

#[test]
fn test_migrate_requires_parent_folder() {
    let t = Test::init("api", "env");
    let folder = t.seed_folder("api", &[]);
    let alice = t.seed_user("alice@example.com", "Alice", "Smith");
    t.grant(&folder, &alice, PermissionLevel::Owner);

    let output = t.migrate("devs");
    assert_failure(&output);
    assert_stderr_contains(&output, "folder not found: dotsync");
}

#[test]
fn test_migrate_without_yes_needs_a_terminal() {
    let t = Test::init("api", "env");
    t.seed_folder("dotsync", &[]);
    t.seed_folder("api", &[]);

    let output = t.run(&["migrate", "--team", "devs"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cancelled");
    assert_stderr_contains(&output, "--yes");
    assert!(t.vault_group("devs").is_none());
}
