mod support;

use predicates::str::contains;

use support::{json_data, TestHub};

#[test]
fn skills_round_trip_through_the_cli() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["skill", "add", "Cooking", "beginner"])
        .assert()
        .success()
        .stdout(contains("added skill Cooking"));

    hub.cmd_as("Alice")
        .args(["skill", "add", "Plumbing", "novice"])
        .assert()
        .success();

    // Case-insensitive duplicate
    hub.cmd_as("Alice")
        .args(["skill", "add", "cooking", "expert"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("already exists"));

    hub.cmd_as("Alice")
        .args(["skill", "set", "cooking", "expert"])
        .assert()
        .success();

    let output = hub
        .cmd_as("Alice")
        .args(["skill", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let skills = json_data(&output);
    let skills = skills.as_array().expect("skill array");
    assert_eq!(skills.len(), 2);
    let cooking = skills.iter().find(|s| s["name"] == "Cooking").unwrap();
    assert_eq!(cooking["level"], "expert");

    hub.cmd_as("Alice")
        .args(["skill", "rm", "COOKING"])
        .assert()
        .success();

    hub.cmd_as("Alice")
        .args(["skill", "list"])
        .assert()
        .success()
        .stdout(contains("1 skill(s)"));
}

#[test]
fn skills_are_per_member() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["skill", "add", "Gardening", "expert"])
        .assert()
        .success();

    hub.cmd_as("Bob")
        .args(["skill", "list"])
        .assert()
        .success()
        .stdout(contains("0 skill(s)"));
}

#[test]
fn profile_set_updates_only_given_fields() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["profile", "set", "--status", "home", "--notes", "back at 6"])
        .assert()
        .success();

    hub.cmd_as("Alice")
        .args(["profile", "set", "--vibe", "cheerful"])
        .assert()
        .success();

    let output = hub
        .cmd_as("Alice")
        .args(["profile", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let profile = json_data(&output);
    assert_eq!(profile["availabilityStatus"], "home");
    assert_eq!(profile["notes"], "back at 6");
    assert_eq!(profile["currentVibe"], "cheerful");
}

#[test]
fn profile_set_with_no_fields_fails() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["profile", "set"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("nothing to update"));
}

#[test]
fn any_member_can_view_another_profile() {
    let hub = TestHub::init();

    hub.cmd_as("Alice")
        .args(["skill", "add", "Cooking", "expert"])
        .assert()
        .success();

    hub.cmd_as("Bob")
        .args(["profile", "show", "alice"])
        .assert()
        .success()
        .stdout(contains("Alice (alice)"))
        .stdout(contains("Cooking | expert"));

    hub.cmd_as("Bob")
        .args(["profile", "show", "nobody"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Profile not found"));
}
