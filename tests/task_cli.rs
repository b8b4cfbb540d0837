mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{json_data, TestHub};

fn add_task(hub: &TestHub, user: &str, text: &str, extra: &[&str]) -> String {
    let mut args = vec!["task", "add", text, "--json"];
    args.extend_from_slice(extra);
    let output = hub
        .cmd_as(user)
        .args(&args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    json_data(&output)["id"].as_str().expect("task id").to_string()
}

fn list_tasks(hub: &TestHub, user: &str) -> Vec<Value> {
    let output = hub
        .cmd_as(user)
        .args(["task", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    json_data(&output).as_array().expect("task array").clone()
}

#[test]
fn board_merges_own_and_shared_tasks_newest_first() {
    let hub = TestHub::init();

    add_task(&hub, "Alice", "alice private", &["--private"]);
    add_task(&hub, "Alice", "alice shared", &[]);
    add_task(&hub, "Bob", "bob shared", &[]);
    add_task(&hub, "Bob", "bob private", &["--private"]);

    let alice_board = list_tasks(&hub, "Alice");
    let texts: Vec<&str> = alice_board
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    // Own tasks (private included) plus bob's shared one, newest first
    assert_eq!(texts, vec!["bob shared", "alice shared", "alice private"]);

    let bob_board = list_tasks(&hub, "Bob");
    let texts: Vec<&str> = bob_board
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["bob private", "bob shared", "alice shared"]);
}

#[test]
fn only_the_owner_may_complete_or_remove() {
    let hub = TestHub::init();

    let id = add_task(&hub, "Alice", "dishes", &[]);

    hub.cmd_as("Bob")
        .args(["task", "done", &id])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Only the owner"));

    hub.cmd_as("Bob")
        .args(["task", "rm", &id])
        .assert()
        .failure()
        .code(3);

    hub.cmd_as("Alice")
        .args(["task", "done", &id])
        .assert()
        .success()
        .stdout(contains("completed task"));

    hub.cmd_as("Alice")
        .args(["task", "reopen", &id])
        .assert()
        .success()
        .stdout(contains("reopened task"));

    hub.cmd_as("Alice")
        .args(["task", "rm", &id])
        .assert()
        .success();
}

#[test]
fn claim_and_unassign_follow_assignment_rules() {
    let hub = TestHub::init();

    let id = add_task(&hub, "Alice", "rake leaves", &[]);

    hub.cmd_as("Bob")
        .args(["task", "claim", &id])
        .assert()
        .success()
        .stdout(contains("assigned to Bob"));

    // A second claim cannot land
    hub.cmd_as("Alice")
        .args(["task", "claim", &id])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("already assigned"));

    // Only the assignee clears the assignment, even against the owner
    hub.cmd_as("Alice")
        .args(["task", "unassign", &id])
        .assert()
        .failure()
        .code(3);

    hub.cmd_as("Bob")
        .args(["task", "unassign", &id])
        .assert()
        .success();

    let board = list_tasks(&hub, "Alice");
    assert!(board[0]["assignedToId"].is_null());
}

#[test]
fn private_tasks_cannot_be_claimed_by_others() {
    let hub = TestHub::init();

    let id = add_task(&hub, "Alice", "secret errand", &["--private"]);

    hub.cmd_as("Bob")
        .args(["task", "claim", &id])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("private"));
}

#[test]
fn clear_removes_only_own_completed_tasks() {
    let hub = TestHub::init();

    let a1 = add_task(&hub, "Alice", "done one", &[]);
    add_task(&hub, "Alice", "still open", &[]);
    let b1 = add_task(&hub, "Bob", "bob done", &[]);

    hub.cmd_as("Alice").args(["task", "done", &a1]).assert().success();
    hub.cmd_as("Bob").args(["task", "done", &b1]).assert().success();

    hub.cmd_as("Alice")
        .args(["task", "clear"])
        .assert()
        .success()
        .stdout(contains("cleared 1 completed task"));

    let board = list_tasks(&hub, "Alice");
    let texts: Vec<&str> = board.iter().map(|t| t["text"].as_str().unwrap()).collect();
    assert!(texts.contains(&"still open"));
    assert!(texts.contains(&"bob done"));
    assert_eq!(board.len(), 2);

    hub.cmd_as("Alice")
        .args(["task", "clear"])
        .assert()
        .success()
        .stdout(contains("no completed tasks"));
}

#[test]
fn edit_changes_text_category_and_visibility() {
    let hub = TestHub::init();

    let id = add_task(&hub, "Alice", "watr plants", &[]);

    hub.cmd_as("Alice")
        .args([
            "task", "edit", &id, "--text", "water plants", "--category", "garden", "--private",
        ])
        .assert()
        .success();

    let board = list_tasks(&hub, "Alice");
    assert_eq!(board[0]["text"], "water plants");
    assert_eq!(board[0]["category"], "Garden");
    assert_eq!(board[0]["isPrivate"], true);

    // Bob no longer sees it
    assert!(list_tasks(&hub, "Bob").is_empty());
}

#[test]
fn unknown_category_warns_but_does_not_block() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["task", "add", "mystery job", "--category", "spelunking"])
        .assert()
        .success()
        .stdout(contains("Spelunking is not in the household set"));
}

#[test]
fn edit_to_an_unknown_category_warns_but_applies() {
    let hub = TestHub::init();

    let id = add_task(&hub, "Alice", "mystery job", &[]);

    hub.cmd_as("Alice")
        .args(["task", "edit", &id, "--category", "spelunking"])
        .assert()
        .success()
        .stdout(contains("Spelunking is not in the household set"))
        .stdout(contains("hearth category add Spelunking"));

    let board = list_tasks(&hub, "Alice");
    assert_eq!(board[0]["category"], "Spelunking");
}

#[test]
fn json_envelope_reports_command_and_policy_errors() {
    let hub = TestHub::init();

    let id = add_task(&hub, "Alice", "dishes", &[]);

    let output = hub
        .cmd_as("Bob")
        .args(["task", "done", &id, "--json"])
        .assert()
        .failure()
        .code(3)
        .get_output()
        .stdout
        .clone();
    let envelope: Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(envelope["schema_version"], "hearth.v1");
    assert_eq!(envelope["command"], "task done");
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["error"]["kind"], "policy_blocked");
    assert_eq!(envelope["error"]["code"], 3);
    assert_eq!(envelope["error"]["details"]["task_id"], id);
}

#[test]
fn events_flag_writes_jsonl() {
    let hub = TestHub::init();
    let events_path = hub.path().join("events.jsonl");

    hub.cmd_as("Alice")
        .args(["task", "add", "log me"])
        .args(["--events", events_path.to_str().unwrap()])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&events_path).expect("events file");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    let event: Value = serde_json::from_str(lines[0]).expect("event json");
    assert_eq!(event["schema_version"], "hearth.event.v1");
    assert_eq!(event["event"], "task_created");
    assert_eq!(event["actor"], "alice");
}
