use super::*;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scan(id: u64, url: &str, status: &str, created: &str) -> serde_json::Value {
    json!({"id": id, "url": url, "status": status, "severity": "MEDIUM", "createdAt": created})
}

#[tokio::test(flavor = "multi_thread")]
async fn login_stores_session_for_later_commands() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ana@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-fresh",
            "user": {"id": 7, "name": "Ana", "email": "ana@example.com", "role": "USER"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());

    let result = ctx.run_websec(&[
        "login",
        "--email",
        " ana@example.com ",
        "--password",
        "hunter22",
    ]);

    assert_success(&result);
    assert_stderr_contains(&result, "✔ Signed in as Ana");
    ctx.assert_file_exists("home/session.json");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        let mode = fs::metadata(ctx.home().join("session.json"))
            .expect("session metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600, "session file must be owner-only");
    }

    let result = ctx.run_websec(&["whoami"]);
    assert_output_contains(&result, "Ana <ana@example.com> (USER, id 7)");
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_lists_newest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scan/user/scans"))
        .and(header("authorization", "Bearer tok-e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            scan(1, "https://old.example", "COMPLETED", "2024-01-01T09:00:00"),
            scan(2, "https://new.example", "IN_PROGRESS", "2024-03-01T09:00:00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["dashboard"]);

    assert_success(&result);
    assert_output_contains(&result, "# My scans");

    let newer = result.stdout.find("https://new.example").expect("newer scan listed");
    let older = result.stdout.find("https://old.example").expect("older scan listed");
    assert!(newer < older, "scans should be newest first:\n{}", result.stdout);

    assert_output_contains(
        &result,
        "| 2 | https://new.example | In progress | Medium | 01/03/2024 09:00 |",
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_filter_is_case_insensitive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scan/user/scans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            scan(1, "https://A.com", "COMPLETED", "2024-01-01T09:00:00"),
            scan(2, "https://b.com", "COMPLETED", "2024-01-02T09:00:00"),
        ])))
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["dashboard", "--filter", "a.com"]);

    assert_success(&result);
    assert_output_contains(&result, "https://A.com");
    assert!(!result.stdout.contains("https://b.com"));
    assert_output_contains(&result, "Showing 1 of 2 scans matching `a.com`");
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_is_followed_until_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scan/start"))
        .and(body_json(json!({"url": "https://example.com"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"siteId": 1, "scanResultId": 42})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // first poll sees the spider phase, every later one the finished scan
    Mock::given(method("GET"))
        .and(path("/api/scan/progress/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scanResultId": 42, "progress": 30.0, "status": "IN_PROGRESS",
            "message": "Spider running"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/scan/progress/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scanResultId": 42, "progress": 100.0, "status": "COMPLETED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["scan", "https://example.com"]);

    assert_success(&result);
    assert_stderr_contains(&result, "Scan #42 started for https://example.com");
    assert_output_contains(
        &result,
        "[In progress] 30% · Crawling site pages (spider scan: 60%)",
    );
    assert_output_contains(&result, "  Spider running");
    assert_output_contains(&result, "[Completed] 100%");
    assert_output_contains(&result, "Report ready: run `websec report 42`.");

    assert_eq!(
        result.stderr.matches("Scan completed successfully").count(),
        1,
        "terminal notification should be shown once:\n{}",
        result.stderr
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_scan_is_reported_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scan/progress/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scanResultId": 8, "progress": 64.0, "status": "FAILED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["open", "/scan/8/progress"]);

    assert_success(&result);
    assert_output_contains(&result, "[Failed] 64%");
    assert_eq!(result.stderr.matches("✖ Scan failed").count(), 1);
    assert!(!result.stdout.contains("Report ready"));
}

#[tokio::test(flavor = "multi_thread")]
async fn scan_without_watching() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/scan/start"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"siteId": 1, "scanResultId": 5})),
        )
        .mount(&server)
        .await;

    Mock::given(path("/api/scan/progress/5"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["scan", "http://example.com", "--no-watch"]);

    assert_success(&result);
    assert_output_contains(&result, "Follow it with `websec progress 5`.");
}

#[tokio::test(flavor = "multi_thread")]
async fn stats_render_headline_and_charts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scan/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "byType": [{"type": "XSS", "count": 3}, {"type": "SQL Injection", "count": 1}],
            "bySeverity": [{"severity": "HIGH", "count": 2}, {"severity": "LOW", "count": 2}],
            "scanCount": 5
        })))
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["stats"]);

    assert_success(&result);
    assert_output_contains(&result, "| 5 | 2 | 2 |");
    assert_output_contains(&result, "`High`");
    assert_output_contains(&result, "`XSS`");
    assert_output_contains(&result, "(50%)");
}

#[tokio::test(flavor = "multi_thread")]
async fn html_report_is_printed_and_pdf_downloaded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/scan/rapports/generer-html/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"content": "<h1>Scan report</h1>"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/scan/rapports/generer/42"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 fake".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("USER");

    let result = ctx.run_websec(&["report", "42"]);
    assert_success(&result);
    assert_output_contains(&result, "<h1>Scan report</h1>");

    let result = ctx.run_websec(&["report", "42", "--html", "report.html"]);
    assert_success(&result);
    assert_eq!(ctx.read_file("report.html"), "<h1>Scan report</h1>");

    let result = ctx.run_websec(&["report", "42", "--pdf"]);
    assert_success(&result);
    assert_eq!(ctx.read_file("websec-report-42.pdf"), "%PDF-1.7 fake");
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_lists_and_deletes_users() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Ana", "email": "ana@example.com", "role": "ADMIN", "scanCount": 0},
            {"id": 9, "name": "Bob", "email": "bob@example.com", "role": "USER", "scanCount": 4}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/admin/users/9"))
        .and(header("authorization", "Bearer tok-e2e"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("ADMIN");

    let result = ctx.run_websec(&["admin"]);
    assert_success(&result);
    assert_output_contains(&result, "| 9 | Bob | bob@example.com | USER | 4 |");

    let result = ctx.run_websec(&["admin", "delete", "9", "--yes"]);
    assert_success(&result);
    assert_stderr_contains(&result, "✔ User deleted");
    assert_output_contains(&result, "| 7 | Ana |");
    assert!(!result.stdout.contains("bob@example.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_views_user_scans() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/users/9/scans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            scan(3, "https://bob.example", "COMPLETED", "2024-02-02T10:00:00")
        ])))
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());
    ctx.sign_in_as("ADMIN");

    let result = ctx.run_websec(&["admin", "scans", "9"]);

    assert_success(&result);
    assert_output_contains(&result, "# Scans of user #9");
    assert_output_contains(&result, "https://bob.example");
}

#[tokio::test(flavor = "multi_thread")]
async fn register_does_not_sign_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "name": "Bob", "email": "bob@example.com", "password": "longenough"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_backend(server.uri());

    let result = ctx.run_websec(&[
        "register",
        "--name",
        "Bob",
        "--email",
        "bob@example.com",
        "--password",
        "longenough",
        "--confirm-password",
        "longenough",
    ]);

    assert_success(&result);
    assert_output_contains(&result, "websec login --email bob@example.com");
    assert!(!ctx.home().join("session.json").exists());
}
