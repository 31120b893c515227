//! Integration tests for `AssistantClient` against a wiremock server.
//!
//! No real network traffic: each test stands up a local mock of the
//! chat-completions endpoint and exercises one success or failure path.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use geoquery_assistant::{intent_from_response, AssistantClient, AssistantError};

fn test_client(base_url: &str) -> AssistantClient {
    AssistantClient::with_base_url(
        base_url,
        "test-key",
        "gpt-4o-mini",
        "2025-01-01-preview",
        5,
        "geoquery-test/0.1",
    )
    .expect("failed to build test AssistantClient")
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn parse_query_returns_generated_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4o-mini/chat/completions"))
        .and(query_param("api-version", "2025-01-01-preview"))
        .and(header("api-key", "test-key"))
        .and(body_partial_json(json!({
            "max_tokens": 200,
            "temperature": 0.0,
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"content": "parks", "location": "Manhattan", "bbox": [-74.01, 40.70, -73.99, 40.72]}"#,
        )))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let text = client
        .parse_query("parks in manhattan")
        .await
        .expect("expected successful completion");

    let intent = intent_from_response(&text, "parks in manhattan");
    assert_eq!(intent.content, "parks");
    assert_eq!(intent.location.as_deref(), Some("Manhattan"));
    assert!(intent.bbox.is_some());
}

#[tokio::test]
async fn request_carries_user_query_in_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "User input: cafes in berlin\nRespond with JSON only."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.parse_query("cafes in berlin").await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn non_2xx_status_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.parse_query("parks").await.unwrap_err();
    assert!(
        matches!(err, AssistantError::Status { status: 429, ref body } if body.contains("rate limited")),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn missing_choices_is_an_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.parse_query("parks").await.unwrap_err();
    assert!(
        matches!(err, AssistantError::InvalidResponse { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn non_json_body_is_an_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.parse_query("parks").await.unwrap_err();
    assert!(
        matches!(err, AssistantError::InvalidResponse { .. }),
        "unexpected error: {err:?}"
    );
}
