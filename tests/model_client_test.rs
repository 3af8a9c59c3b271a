//! Integration tests for `HttpModelClient` against a mocked provider API.

mod common;

use best_commits::error::{ModelError, WorkflowError};
use best_commits::llm::{HttpModelClient, ModelClient, Provider};
use common::{anthropic_reply, chat_reply, config_from, mock_config};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_anthropic_request_shape_and_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-haiku-4-5-20251001",
            "max_tokens": 1024,
            "messages": [{ "role": "user", "content": "describe this diff" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply("  feat: add parser\n")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpModelClient::from_config(&mock_config(&server.uri())).unwrap();
    let text = client.complete("describe this diff", 1024).await.unwrap();

    assert_eq!(text, "feat: add parser");
    assert_eq!(client.model_name(), "claude-haiku-4-5-20251001");
}

#[tokio::test]
async fn test_anthropic_joins_text_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "type": "text", "text": "## Summary\n" },
                { "type": "tool_use", "id": "t1", "name": "noop", "input": {} },
                { "type": "text", "text": "All good." }
            ]
        })))
        .mount(&server)
        .await;

    let client = HttpModelClient::from_config(&mock_config(&server.uri())).unwrap();
    let text = client.complete("review", 2048).await.unwrap();
    assert_eq!(text, "## Summary\nAll good.");
}

#[tokio::test]
async fn test_legacy_key_authenticates_default_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-legacy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_from(&[
        ("GIT_API_KEY", "sk-legacy"),
        ("BETTER_COMMIT_API_BASE", server.uri().as_str()),
    ]);
    let client = HttpModelClient::from_config(&config).unwrap();
    assert_eq!(client.complete("hi", 16).await.unwrap(), "ok");
}

#[tokio::test]
async fn test_openai_uses_bearer_auth_and_completion_token_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-openai"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "max_completion_tokens": 2048,
            "messages": [{ "role": "user", "content": "review this" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Looks fine.")))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_from(&[
        ("BETTER_COMMIT_MODEL", "gpt-4o-mini"),
        ("OPENAI_API_KEY", "sk-openai"),
        ("BETTER_COMMIT_API_BASE", server.uri().as_str()),
    ]);
    let client = HttpModelClient::from_config(&config).unwrap();
    assert_eq!(client.selection().provider, Provider::OpenAi);
    assert_eq!(client.complete("review this", 2048).await.unwrap(), "Looks fine.");
}

#[tokio::test]
async fn test_routing_prefix_is_stripped_from_model_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk-test"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "max_tokens": 1024
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("chore: tidy")))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_from(&[
        ("BETTER_COMMIT_MODEL", "groq/llama-3.1-8b-instant"),
        ("GROQ_API_KEY", "gsk-test"),
        ("BETTER_COMMIT_API_BASE", server.uri().as_str()),
    ]);
    let client = HttpModelClient::from_config(&config).unwrap();
    assert_eq!(client.complete("x", 1024).await.unwrap(), "chore: tidy");
}

#[tokio::test]
async fn test_auth_failure_maps_to_api_error_with_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" }
        })))
        .mount(&server)
        .await;

    let client = HttpModelClient::from_config(&mock_config(&server.uri())).unwrap();
    let err = client.complete("x", 1024).await.unwrap_err();

    match &err {
        ModelError::Api {
            provider,
            status,
            message,
        } => {
            assert_eq!(*provider, Provider::Anthropic);
            assert_eq!(*status, 401);
            assert_eq!(message, "invalid x-api-key");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }

    let hint = WorkflowError::from(err).hint().unwrap();
    assert!(hint.contains("ANTHROPIC_API_KEY"));
}

#[tokio::test]
async fn test_non_json_error_body_is_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(502).set_body_string("x".repeat(1000)))
        .mount(&server)
        .await;

    let client = HttpModelClient::from_config(&mock_config(&server.uri())).unwrap();
    match client.complete("x", 1024).await {
        Err(ModelError::Api { status, message, .. }) => {
            assert_eq!(status, 502);
            assert_eq!(message.len(), 200);
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = HttpModelClient::from_config(&mock_config(&server.uri())).unwrap();
    let result = client.complete("x", 1024).await;
    assert!(
        matches!(result, Err(ModelError::MalformedResponse { .. })),
        "got {:?}",
        result
    );
}

#[tokio::test]
async fn test_empty_content_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_reply("   \n")))
        .mount(&server)
        .await;

    let client = HttpModelClient::from_config(&mock_config(&server.uri())).unwrap();
    let result = client.complete("x", 1024).await;
    assert!(matches!(result, Err(ModelError::EmptyResponse { .. })));
}

#[tokio::test]
async fn test_chat_reply_without_choices_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let config = config_from(&[
        ("BETTER_COMMIT_MODEL", "gpt-4o-mini"),
        ("OPENAI_API_KEY", "sk-openai"),
        ("BETTER_COMMIT_API_BASE", server.uri().as_str()),
    ]);
    let client = HttpModelClient::from_config(&config).unwrap();
    let result = client.complete("x", 1024).await;
    assert!(matches!(result, Err(ModelError::EmptyResponse { .. })));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_request_error() {
    let config = config_from(&[
        ("ANTHROPIC_API_KEY", "sk-ant-test"),
        ("BETTER_COMMIT_API_BASE", "http://127.0.0.1:1"),
    ]);
    let client = HttpModelClient::from_config(&config).unwrap();
    let result = client.complete("x", 1024).await;
    assert!(matches!(result, Err(ModelError::Request(_))));
}

#[test]
fn test_missing_key_for_non_default_provider_ignores_legacy() {
    let config = config_from(&[
        ("BETTER_COMMIT_MODEL", "gemini-2.0-flash"),
        ("GIT_API_KEY", "sk-legacy"),
    ]);
    match HttpModelClient::from_config(&config) {
        Err(ModelError::MissingCredential {
            provider,
            env_var,
            legacy,
        }) => {
            assert_eq!(provider, Provider::Gemini);
            assert_eq!(env_var, "GEMINI_API_KEY");
            assert_eq!(legacy, None);
        }
        other => panic!("Expected MissingCredential, got {:?}", other.map(|_| ())),
    }
}
