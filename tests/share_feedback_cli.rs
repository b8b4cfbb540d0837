mod support;

use predicates::str::contains;

use support::{json_data, TestHub};

#[test]
fn feedback_is_logged_and_listed() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args([
            "feedback",
            "add",
            "--kind",
            "feature",
            "--title",
            "Emoji reactions",
            "--description",
            "React to messages with emoji",
            "--priority",
            "high",
        ])
        .assert()
        .success()
        .stdout(contains("logged feedback"));

    let output = hub
        .cmd_as("Bob")
        .args(["feedback", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let entries = json_data(&output);
    let entries = entries.as_array().expect("entry array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["kind"], "feature");
    assert_eq!(entries[0]["priority"], "high");
    assert_eq!(entries[0]["authorName"], "Alice");
}

#[test]
fn feedback_requires_a_description() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["feedback", "add", "--title", "Broken", "--description", "  "])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("description are required"));
}

#[test]
fn shared_posts_are_author_removable_only() {
    let hub = TestHub::init();

    let output = hub
        .cmd_as("Alice")
        .args([
            "share",
            "post",
            "--title",
            "Soup recipe",
            "--content",
            "Carrots, thyme, patience",
            "--kind",
            "recipe",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let id = json_data(&output)["id"].as_str().expect("post id").to_string();

    hub.cmd_as("Bob")
        .args(["share", "list"])
        .assert()
        .success()
        .stdout(contains("Soup recipe"));

    hub.cmd_as("Bob")
        .args(["share", "rm", &id])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("Only the author"));

    hub.cmd_as("Alice")
        .args(["share", "rm", &id])
        .assert()
        .success();

    hub.cmd_as("Alice")
        .args(["share", "list"])
        .assert()
        .success()
        .stdout(contains("0 post(s)"));
}
