mod common;

use common::{build_console, establish_session};
use mockito::{Matcher, Server};
use serde_json::json;
use userman_console::models::User;
use userman_console::pipeline::{RefreshError, RequestError};
use userman_console::session::StorageBackend;

/// A single expired request is refreshed and replayed transparently: the
/// caller sees the final result, the replay carries the fresh bearer token
/// and a Retried-Times counter, and the store picks up the new token.
#[tokio::test]
async fn test_expired_token_is_refreshed_and_replayed() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    let expired = server
        .mock("GET", "/api/v1/users")
        .match_header("authorization", "Bearer t1")
        .with_status(401)
        .with_body(r#"{"status":"error","error":"token expired"}"#)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/refresh")
        .match_body(Matcher::Json(json!({
            "username": "alice",
            "refreshToken": "r1",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"done","data":{"accessToken":"t2"}}"#)
        .create_async()
        .await;
    let replayed = server
        .mock("GET", "/api/v1/users")
        .match_header("authorization", "Bearer t2")
        .match_header("retried-times", "1")
        .with_status(200)
        .with_body(r#"{"status":"done","data":[]}"#)
        .create_async()
        .await;

    let users: Vec<User> = console
        .client
        .get("/api/v1/users")
        .await
        .expect("request should succeed after a refresh");

    assert!(users.is_empty());
    expired.assert_async().await;
    refresh.assert_async().await;
    replayed.assert_async().await;

    // The session was established durably, so the refreshed token lands in
    // the durable backend.
    assert_eq!(console.session.access_token().as_deref(), Some("t2"));
    assert_eq!(console.durable.get("accessToken").await.as_deref(), Some("t2"));
}

/// N requests failing 401 before the refresh resolves share exactly one
/// refresh call, and all of them are replayed off its outcome.
#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    let expired = server
        .mock("GET", "/api/v1/users")
        .match_header("authorization", "Bearer t1")
        .expect(4)
        .with_status(401)
        .with_body(r#"{"status":"error","error":"token expired"}"#)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/refresh")
        .expect(1)
        .with_status(200)
        .with_body(r#"{"status":"done","data":{"accessToken":"t2"}}"#)
        .create_async()
        .await;
    let replayed = server
        .mock("GET", "/api/v1/users")
        .match_header("authorization", "Bearer t2")
        .expect(4)
        .with_status(200)
        .with_body(r#"{"status":"done","data":[]}"#)
        .create_async()
        .await;

    let calls = (0..4).map(|_| {
        let client = console.client.clone();
        async move { client.get::<Vec<User>>("/api/v1/users").await }
    });
    let results = futures::future::join_all(calls).await;

    for result in results {
        assert!(result.expect("request should succeed").is_empty());
    }
    expired.assert_async().await;
    refresh.assert_async().await;
    replayed.assert_async().await;
}

/// A refresh the backend rejects is terminal: every queued caller fails with
/// the server's message, the session is cleared, and the user lands on the
/// login page.
#[tokio::test]
async fn test_rejected_refresh_logs_out_all_subscribers() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    let _expired = server
        .mock("GET", "/api/v1/users")
        .with_status(401)
        .with_body(r#"{"status":"error","error":"token expired"}"#)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/refresh")
        .expect(1)
        .with_status(400)
        .with_body(r#"{"status":"error","error":"invalid_token"}"#)
        .create_async()
        .await;

    let first = console.client.clone();
    let second = console.client.clone();
    let (a, b) = tokio::join!(
        first.get::<Vec<User>>("/api/v1/users"),
        second.get::<Vec<User>>("/api/v1/users"),
    );

    for result in [a, b] {
        let err = result.expect_err("refresh rejection should fail the request");
        assert!(
            err.to_string().contains("invalid_token"),
            "unexpected error: {err}"
        );
    }
    refresh.assert_async().await;

    assert!(!console.session.is_authenticated());
    assert!(console.durable.keys().await.is_empty());
    assert!(console.ephemeral.keys().await.is_empty());
    assert_eq!(console.navigator.last().as_deref(), Some("/login"));
}

/// "done" without a token payload breaks the backend contract and is handled
/// like a rejection: terminal, with logout.
#[tokio::test]
async fn test_tampered_refresh_response_forces_logout() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    let _expired = server
        .mock("GET", "/api/v1/users")
        .with_status(401)
        .create_async()
        .await;
    let _refresh = server
        .mock("POST", "/api/v1/refresh")
        .with_status(200)
        .with_body(r#"{"status":"done"}"#)
        .create_async()
        .await;

    let err = console
        .client
        .get::<Vec<User>>("/api/v1/users")
        .await
        .expect_err("tampered refresh should fail the request");

    assert!(matches!(
        err,
        RequestError::Refresh(RefreshError::Tampered(_))
    ));
    assert!(!console.session.is_authenticated());
    assert_eq!(console.navigator.last().as_deref(), Some("/login"));
}

/// A request that keeps coming back 401 is replayed five times and then
/// failed permanently, even though every refresh succeeds. The session
/// itself survives.
#[tokio::test]
async fn test_replays_stop_after_max_retries() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    // Initial send plus five replays.
    let unauthorized = server
        .mock("GET", "/api/v1/users")
        .expect(6)
        .with_status(401)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/refresh")
        .expect(6)
        .with_status(200)
        .with_body(r#"{"status":"done","data":{"accessToken":"t2"}}"#)
        .create_async()
        .await;

    let err = console
        .client
        .get::<Vec<User>>("/api/v1/users")
        .await
        .expect_err("retries should be exhausted");

    assert!(matches!(err, RequestError::RetryLimit(5)));
    assert!(err.to_string().contains("max retries"));
    unauthorized.assert_async().await;
    refresh.assert_async().await;
    assert!(console.session.is_authenticated());
}

/// Non-401 HTTP errors are propagated unchanged and never trigger a refresh.
#[tokio::test]
async fn test_non_auth_error_passes_through() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    let failure = server
        .mock("GET", "/api/v1/users")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/refresh")
        .expect(0)
        .create_async()
        .await;

    let err = console
        .client
        .get::<Vec<User>>("/api/v1/users")
        .await
        .expect_err("500 should fail the request");

    match err {
        RequestError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got: {other}"),
    }
    failure.assert_async().await;
    refresh.assert_async().await;
    assert!(console.session.is_authenticated());
}

/// Connection-level failures are not auth failures: no refresh, no logout.
#[tokio::test]
async fn test_transport_error_passes_through() {
    // Nothing listens here; the connection is refused.
    let console = build_console("http://127.0.0.1:9").await;
    establish_session(&console, true).await;

    let err = console
        .client
        .get::<Vec<User>>("/api/v1/users")
        .await
        .expect_err("connection should be refused");

    assert!(matches!(err, RequestError::Transport(_)));
    assert!(console.session.is_authenticated());
    assert_ne!(console.navigator.last().as_deref(), Some("/login"));
}

/// The refresh call itself failing at the transport level rejects the queued
/// callers but leaves the session intact: the refresh token may still be
/// good.
#[tokio::test]
async fn test_refresh_transport_failure_keeps_session() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    // No mock for /api/v1/refresh: mockito answers it with a bare 501, which
    // is not a well-formed envelope.
    let _expired = server
        .mock("GET", "/api/v1/users")
        .with_status(401)
        .create_async()
        .await;

    let err = console
        .client
        .get::<Vec<User>>("/api/v1/users")
        .await
        .expect_err("refresh failure should fail the request");

    assert!(matches!(
        err,
        RequestError::Refresh(RefreshError::Transport(_))
    ));
    assert!(console.session.is_authenticated());
    assert_ne!(console.navigator.last().as_deref(), Some("/login"));
}

/// There is no unauthenticated request path: a missing access token forces a
/// logout before anything is sent.
#[tokio::test]
async fn test_missing_token_forces_logout() {
    let mut server = Server::new_async().await;
    let untouched = server
        .mock("GET", "/api/v1/users")
        .expect(0)
        .create_async()
        .await;
    let console = build_console(&server.url()).await;

    let err = console
        .client
        .get::<Vec<User>>("/api/v1/users")
        .await
        .expect_err("request without a token should fail");

    assert!(matches!(err, RequestError::NotAuthenticated));
    untouched.assert_async().await;
    assert_eq!(console.navigator.last().as_deref(), Some("/login"));
}

/// A well-formed error envelope on a successful response surfaces as an API
/// error with the server's message.
#[tokio::test]
async fn test_error_envelope_surfaces_message() {
    let mut server = Server::new_async().await;
    let console = build_console(&server.url()).await;
    establish_session(&console, true).await;

    let _listed = server
        .mock("GET", "/api/v1/users")
        .with_status(200)
        .with_body(r#"{"status":"error","error":"insufficient permissions"}"#)
        .create_async()
        .await;

    let err = console
        .client
        .get::<Vec<User>>("/api/v1/users")
        .await
        .expect_err("error envelope should fail the request");

    match err {
        RequestError::Api(message) => assert_eq!(message, "insufficient permissions"),
        other => panic!("expected api error, got: {other}"),
    }
}
