//! Tests for `dotsync team list/add`.

use crate::support::*;

fn team_with_members(t: &Test) {
    let alice = t.seed_user("alice@example.com", "Alice", "Smith");
    let bob = t.seed_user("bob@example.com", "Bob", "Jones");
    t.seed_group("devs", &[(&alice, true), (&bob, false)]);
}

#[test]
fn test_team_list_shows_members() {
    let t = Test::new();
    team_with_members(&t);

    let output = t.team_list("devs");
    assert_success(&output);
    assert_stdout_contains(&output, "2 members of devs");
    assert_stdout_contains(&output, "alice@example.com  manager");
    assert_stdout_contains(&output, "bob@example.com  member");
}

#[test]
fn test_team_list_json_output() {
    let t = Test::new();
    team_with_members(&t);

    let output = t.team_list_json("devs");
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["count"], 2);
    assert_eq!(parsed["members"][0]["name"], "Alice Smith");
    assert_eq!(parsed["members"][0]["manager"], true);
}

#[test]
fn test_team_list_uses_configured_team() {
    let t = Test::new();
    team_with_members(&t);
    assert_success(&t.run(&["init", "api", "--type", "env", "--team", "devs"]));

    let output = t.run(&["team", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "members of devs");
}

#[test]
fn test_team_list_group_name_is_case_insensitive() {
    let t = Test::new();
    team_with_members(&t);

    assert_success(&t.team_list("DEVS"));
}

#[test]
fn test_team_without_team_fails() {
    let t = Test::init("api", "env");

    let output = t.run(&["team", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required field: team");
}

#[test]
fn test_team_unknown_group_fails() {
    let t = Test::new();

    let output = t.team_list("ghosts");
    assert_failure(&output);
    assert_stderr_contains(&output, "group not found: ghosts");
}

#[test]
fn test_team_add_user() {
    let t = Test::new();
    team_with_members(&t);
    t.seed_user("carol@example.com", "Carol", "White");

    let output = t.team_add("Carol@Example.com", "devs");
    assert_success(&output);
    assert_stdout_contains(&output, "added carol@example.com to devs as member");

    let group = t.vault_group("devs").expect("group exists");
    assert_eq!(group.members.len(), 3);
}

#[test]
fn test_team_add_manager_promotes_member() {
    let t = Test::new();
    team_with_members(&t);

    assert_success(&t.run(&["team", "add", "bob@example.com", "--manager", "--team", "devs"]));

    let group = t.vault_group("devs").expect("group exists");
    let bob = group
        .members
        .iter()
        .find(|m| m.username == "bob@example.com")
        .expect("bob is a member");
    assert!(bob.is_manager);
}

#[test]
fn test_team_add_existing_member_warns() {
    let t = Test::new();
    team_with_members(&t);

    let output = t.team_add("bob@example.com", "devs");
    assert_success(&output);
    assert_stderr_contains(&output, "already in devs");
}

#[test]
fn test_team_add_unknown_user_fails() {
    let t = Test::new();
    team_with_members(&t);

    let output = t.team_add("nobody@example.com", "devs");
    assert_failure(&output);
    assert_stderr_contains(&output, "user not found: nobody@example.com");
}
