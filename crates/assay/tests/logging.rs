//! Request/response logging as seen through the tracing subscriber.

use assay::{Config, LogConfig, RequestLogLevel, ResponseLogLevel};
use httpmock::prelude::*;
use serde_json::json;
use tracing_test::traced_test;

async fn not_found(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"error":"no such place"}"#);
        })
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_request_log_levels() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/places");
            then.status(201);
        })
        .await;

    assay::given()
        .log(RequestLogLevel::All)
        .basic_auth("user", "pass")
        .header("X-Trace", "t-1")
        .json_body(&json!({"Name": "Sun City"}))
        .when()
        .post(&server.url("/places"))
        .await
        .expect("request should succeed");

    assert!(logs_contain("Request: POST http://"));
    assert!(logs_contain("x-trace: t-1"));
    assert!(logs_contain("authorization: *****"));
    assert!(logs_contain("\"Name\": \"Sun City\""));
}

#[tokio::test]
#[traced_test]
async fn test_response_logged_on_error() {
    let server = MockServer::start_async().await;
    not_found(&server).await;

    let config = Config {
        log: LogConfig {
            response: ResponseLogLevel::OnError,
            ..Default::default()
        },
        ..Default::default()
    };
    assay::given_with(&config)
        .when()
        .get(&server.url("/missing"))
        .await
        .expect("request should succeed");

    assert!(logs_contain("Response: HTTP 404 (Not Found)"));
    assert!(logs_contain("no such place"));
}

#[tokio::test]
#[traced_test]
async fn test_response_logged_on_verification_failure() {
    let server = MockServer::start_async().await;
    not_found(&server).await;

    let response = assay::given()
        .when()
        .get(&server.url("/missing"))
        .await
        .expect("request should succeed");
    assert!(!logs_contain("Response: HTTP 404"));

    let err = response
        .then()
        .log(ResponseLogLevel::OnVerificationFailure)
        .status_code(200)
        .unwrap_err();
    assert_eq!(err.message(), "Expected status code to be 200, but was 404");
    assert!(logs_contain(
        "Verification failed: Expected status code to be 200, but was 404"
    ));
    assert!(logs_contain("Response: HTTP 404 (Not Found)"));
}

#[tokio::test]
#[traced_test]
async fn test_explicit_response_log() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/login");
            then.status(200)
                .header("Set-Cookie", "session=abc123; HttpOnly")
                .body("welcome");
        })
        .await;

    let config = Config {
        log: LogConfig {
            sensitive_cookies: vec!["session".to_string()],
            ..Default::default()
        },
        ..Default::default()
    };
    let response = assay::given_with(&config)
        .when()
        .get(&server.url("/login"))
        .await
        .expect("request should succeed");
    response.then().log(ResponseLogLevel::Headers);

    assert!(logs_contain("Response: HTTP 200 (OK)"));
    assert!(logs_contain("set-cookie: session=*****; HttpOnly"));
}
