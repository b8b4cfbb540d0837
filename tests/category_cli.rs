mod support;

use predicates::str::contains;

use support::{json_data, TestHub};

fn list_names(hub: &TestHub) -> Vec<String> {
    let output = hub
        .cmd_as("Alice")
        .args(["category", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    json_data(&output)
        .as_array()
        .expect("name array")
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn fresh_hub_lists_the_default_set() {
    let hub = TestHub::init();

    assert_eq!(
        list_names(&hub),
        vec!["General", "Cleaning", "Meals", "Garden", "Errands"]
    );
}

#[test]
fn add_normalizes_and_rejects_duplicates() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["category", "add", "  yard WORK "])
        .assert()
        .success()
        .stdout(contains("added category Yard work"));

    // Case-insensitive collision with a default label
    hub.cmd_as("Alice")
        .args(["category", "add", "cleaning"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("already exists"));

    let names = list_names(&hub);
    assert!(names.contains(&"Yard work".to_string()));
    assert_eq!(names.len(), 6);
}

#[test]
fn remove_warns_about_orphaned_labels() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["task", "add", "mow", "--category", "Garden"])
        .assert()
        .success();

    hub.cmd_as("Alice")
        .args(["category", "rm", "garden"])
        .assert()
        .success()
        .stdout(contains("removed category Garden"))
        .stdout(contains("tasks already using this label keep it"));

    assert!(!list_names(&hub).contains(&"Garden".to_string()));

    // The task kept the orphaned label
    let output = hub
        .cmd_as("Alice")
        .args(["task", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let board = json_data(&output);
    assert_eq!(board[0]["category"], "Garden");
}

#[test]
fn removing_an_unknown_category_fails() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["category", "rm", "Spelunking"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("no such category"));
}
