//! CLI integration tests against a mock API.

mod common;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::Sandbox;

async fn login(sandbox: &Sandbox, server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/community/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": token, "refreshToken": "refresh-1"})),
        )
        .mount(server)
        .await;

    sandbox
        .run_success(
            &server.uri(),
            &["auth", "login", "--email", "a@b.c", "--password", "pw"],
        )
        .await;
}

#[tokio::test]
async fn test_login_then_get_sends_bearer() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();
    login(&sandbox, &server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/community/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = sandbox
        .run_success(&server.uri(), &["get", "/api/community/me", "--compact"])
        .await;
    let value: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value, json!({"id": 7}));
}

#[tokio::test]
async fn test_post_sends_data_as_json() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();

    Mock::given(method("POST"))
        .and(path("/api/community/posts"))
        .and(body_json(json!({"title": "hello"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = sandbox
        .run_success(
            &server.uri(),
            &[
                "post",
                "/api/community/posts",
                "--data",
                r#"{"title":"hello"}"#,
            ],
        )
        .await;
    assert!(stdout.contains("\"ok\": true"));
}

#[tokio::test]
async fn test_api_error_prints_status_and_message() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();

    Mock::given(method("GET"))
        .and(path("/api/community/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not found"})))
        .mount(&server)
        .await;

    let stderr = sandbox
        .run_failure(&server.uri(), &["get", "/api/community/missing"])
        .await;
    assert!(stderr.contains("404: Not found"), "stderr: {}", stderr);
}

#[tokio::test]
async fn test_failed_refresh_logs_out() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();
    login(&sandbox, &server, "stale").await;

    Mock::given(method("GET"))
        .and(path("/api/community/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/community/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let stderr = sandbox
        .run_failure(&server.uri(), &["get", "/api/community/me"])
        .await;
    assert!(
        stderr.contains("401: Authentication failed"),
        "stderr: {}",
        stderr
    );

    let status = sandbox.run_success(&server.uri(), &["auth", "status"]).await;
    assert!(status.contains("Authenticated: no"), "status: {}", status);
}

#[tokio::test]
async fn test_set_token_and_logout() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();

    sandbox
        .run_success(&server.uri(), &["auth", "set-token", "--token", "cb-token"])
        .await;
    let status = sandbox.run_success(&server.uri(), &["auth", "status"]).await;
    assert!(status.contains("Authenticated: yes"));
    assert!(!status.contains("cb-token"));

    sandbox.run_success(&server.uri(), &["auth", "logout"]).await;
    let status = sandbox.run_success(&server.uri(), &["auth", "status"]).await;
    assert!(status.contains("Authenticated: no"));
}

#[tokio::test]
async fn test_refresh_without_token_fails() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();

    let stderr = sandbox
        .run_failure(&server.uri(), &["auth", "refresh"])
        .await;
    assert!(stderr.contains("No stored token"), "stderr: {}", stderr);
}

#[tokio::test]
async fn test_upload_sends_multipart() {
    let server = MockServer::start().await;
    let sandbox = Sandbox::new();
    let file = sandbox.path().join("avatar.png");
    std::fs::write(&file, b"png-bytes").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/community/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "/a.png"})))
        .expect(1)
        .mount(&server)
        .await;

    sandbox
        .run_success(
            &server.uri(),
            &[
                "upload",
                "/api/community/upload",
                "--file",
                file.to_str().unwrap(),
                "--text",
                "kind=avatar",
            ],
        )
        .await;

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("filename=\"avatar.png\""));
    assert!(body.contains("png-bytes"));
    assert!(body.contains("avatar"));
}

#[tokio::test]
async fn test_missing_api_url_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run_offline(&["get", "/api/x"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No API URL"), "stderr: {}", stderr);
}

#[tokio::test]
async fn test_local_auth_commands_need_no_api_url() {
    let sandbox = Sandbox::new();

    let output = sandbox
        .run_offline(&["auth", "set-token", "--token", "cb-token", "--refresh-token", "r"])
        .await;
    assert!(output.status.success());

    let output = sandbox.run_offline(&["auth", "status"]).await;
    assert!(output.status.success());
    let status = String::from_utf8_lossy(&output.stdout);
    assert!(status.contains("Authenticated: yes"), "status: {}", status);
    assert!(!status.contains("API:"));

    let output = sandbox.run_offline(&["auth", "logout"]).await;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stored = std::fs::read_to_string(sandbox.store_path()).unwrap();
    let stored: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["values"], json!({}));
}
