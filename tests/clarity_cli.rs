mod support;

use predicates::str::contains;

use support::{json_data, TestHub};

fn post_message(hub: &TestHub, user: &str, title: &str) -> String {
    let output = hub
        .cmd_as(user)
        .args([
            "clarity",
            "post",
            "--title",
            title,
            "--observation",
            "The hose was left out in the rain",
            "--question",
            "Should we have a put-away routine?",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    json_data(&output)["id"]
        .as_str()
        .expect("message id")
        .to_string()
}

#[test]
fn post_then_resolve_moves_message_to_agreements() {
    let hub = TestHub::init();

    let id = post_message(&hub, "Mom", "Garden Hose");

    hub.cmd_as("Mom")
        .args(["clarity", "list"])
        .assert()
        .success()
        .stdout(contains("1 active message(s)"))
        .stdout(contains("Garden Hose"));

    // Any member may resolve, not just the author
    hub.cmd_as("Dad")
        .args(["clarity", "resolve", &id, "--resolution", "Hose duty rotates weekly"])
        .assert()
        .success()
        .stdout(contains("resolved into agreement"));

    hub.cmd_as("Mom")
        .args(["clarity", "list"])
        .assert()
        .success()
        .stdout(contains("0 active message(s)"));

    let output = hub
        .cmd_as("Mom")
        .args(["clarity", "list", "--resolved", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let agreements = json_data(&output);
    let agreements = agreements.as_array().expect("agreement array");
    assert_eq!(agreements.len(), 1);
    assert_eq!(agreements[0]["originalAuthorName"], "Mom");
    assert_eq!(agreements[0]["resolvedByName"], "Dad");
    assert_eq!(agreements[0]["resolution"], "Hose duty rotates weekly");
}

#[test]
fn post_requires_all_fields() {
    let hub = TestHub::init();

    hub.cmd_as("Mom")
        .args([
            "clarity",
            "post",
            "--title",
            "Hose",
            "--observation",
            "  ",
            "--question",
            "What now?",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("observation is required"));

    hub.cmd_as("Mom")
        .args(["clarity", "list"])
        .assert()
        .success()
        .stdout(contains("0 active message(s)"));
}

#[test]
fn resolving_a_missing_message_fails() {
    let hub = TestHub::init();

    hub.cmd_as("Mom")
        .args(["clarity", "resolve", "missing", "--resolution", "done"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Message not found"));
}

#[test]
fn agreements_list_newest_resolution_first() {
    let hub = TestHub::init();

    let first = post_message(&hub, "Mom", "First");
    let second = post_message(&hub, "Mom", "Second");

    hub.cmd_as("Dad")
        .args(["clarity", "resolve", &first, "--resolution", "settled first"])
        .assert()
        .success();
    hub.cmd_as("Dad")
        .args(["clarity", "resolve", &second, "--resolution", "settled second"])
        .assert()
        .success();

    let output = hub
        .cmd_as("Mom")
        .args(["clarity", "list", "--resolved", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let agreements = json_data(&output);
    let titles: Vec<&str> = agreements
        .as_array()
        .expect("agreement array")
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}
