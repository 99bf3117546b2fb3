use super::*;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_views() {
    Command::cargo_bin("websec")
        .expect("Failed to find websec binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("progress"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn index_for_anonymous_user() {
    let ctx = TestContext::new();
    let result = ctx.run_websec(&[]);

    assert_success(&result);
    assert_output_contains(&result, "You are not signed in.");
    assert_output_contains(&result, "Backend: `http://localhost:8081/`");
}

#[test]
fn index_for_admin_mentions_admin_view() {
    let ctx = TestContext::new();
    ctx.sign_in_as("ADMIN");

    let result = ctx.run_websec(&[]);

    assert_success(&result);
    assert_output_contains(&result, "Signed in as **Ana**");
    assert_output_contains(&result, "`websec admin`");
}

#[test]
fn first_run_writes_default_config() {
    let ctx = TestContext::new();
    let result = ctx.run_websec(&["config", "show"]);

    assert_success(&result);
    assert_output_contains(&result, "backend:       http://localhost:8081");

    let config = ctx.load_config();
    assert_eq!(config.api.url, "http://localhost:8081");
    assert_eq!(config.poll.interval_ms, 2000);
}

#[test]
fn whoami_without_session() {
    let ctx = TestContext::new();
    let result = ctx.run_websec(&["whoami"]);

    assert_success(&result);
    assert_output_contains(&result, "Not signed in");
}

#[test]
fn logout_clears_session() {
    let ctx = TestContext::new();
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["whoami"]);
    assert_output_contains(&result, "Ana <ana@example.com> (USER, id 7)");

    let result = ctx.run_websec(&["logout"]);
    assert_success(&result);
    assert!(!ctx.home().join("session.json").exists());

    let result = ctx.run_websec(&["whoami"]);
    assert_output_contains(&result, "Not signed in");
}
