mod support;

use predicates::str::contains;

use support::{json_data, TestHub};

#[test]
fn signin_whoami_signout_flow() {
    let hub = TestHub::init();

    hub.cmd()
        .args(["signin", "Alice", "--email", "alice@example.com"])
        .assert()
        .success()
        .stdout(contains("signed in as Alice"));

    hub.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(contains("Alice (alice)"));

    hub.cmd()
        .arg("signout")
        .assert()
        .success()
        .stdout(contains("signed out Alice"));

    hub.cmd()
        .arg("whoami")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Not signed in"))
        .stderr(contains("hearth signin"));
}

#[test]
fn signout_when_signed_out_is_noop() {
    let hub = TestHub::init();

    hub.cmd()
        .arg("signout")
        .assert()
        .success()
        .stdout(contains("nothing to do"));
}

#[test]
fn user_flag_overrides_session() {
    let hub = TestHub::init();

    hub.cmd().args(["signin", "Alice"]).assert().success();

    let output = hub
        .cmd()
        .args(["whoami", "--user", "Bob", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let data = json_data(&output);
    assert_eq!(data["uid"], "bob");
    assert_eq!(data["displayName"], "Bob");
}

#[test]
fn signin_creates_a_profile() {
    let hub = TestHub::init();

    hub.cmd().args(["signin", "Big Sister"]).assert().success();

    let output = hub
        .cmd()
        .args(["profile", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let data = json_data(&output);
    assert_eq!(data["uid"], "big-sister");
    assert_eq!(data["displayName"], "Big Sister");
}

#[test]
fn commands_fail_without_a_hub() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cmd = assert_cmd::Command::cargo_bin("hearth").expect("hearth binary");
    cmd.current_dir(dir.path());
    cmd.env_remove("HEARTH_USER");
    cmd.env("HEARTH_HUB", dir.path());

    cmd.arg("whoami")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Not a hearth hub"))
        .stderr(contains("hearth init"));
}
