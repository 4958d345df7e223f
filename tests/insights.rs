//! End-to-end tests: service, real HTTP client, and a mock completion API.

use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use interview_insights::credentials::{KeyStore, StaticCredential, API_KEY_NAME};
use interview_insights::llm::{LlmConfig, OpenAiClient};
use interview_insights::models::{PromptMode, Theme};
use interview_insights::services::{InsightRequest, InsightService};
use interview_insights::{InsightError, StudyCatalog};

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

fn client_for(server: &MockServer) -> Arc<OpenAiClient> {
    let config = LlmConfig::default().with_endpoint(&server.uri());
    Arc::new(OpenAiClient::new(config).unwrap())
}

#[tokio::test]
async fn generate_through_http_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(body_partial_json(json!({"response_format": {"type": "json_object"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(
            r#"{"summary":"Admins want SSO first.","themes":[{"title":"SSO","description":"Blocked on SSO setup."},"Docs",{"name":"no title"}]}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let service = InsightService::new(
        StudyCatalog::builtin(),
        client_for(&server),
        Arc::new(StaticCredential::new("sk-test")),
        None,
    );

    let request = InsightRequest::new("2", "We couldn't invite anyone until SSO worked.")
        .with_mode(PromptMode::Stepwise)
        .with_objective(Some("Shorten time to first invite".into()));
    let result = service.generate(&request).await.unwrap();

    assert_eq!(result.summary, "Admins want SSO first.");
    assert_eq!(result.themes.len(), 3);
    assert_eq!(result.themes[0], Theme::new("SSO", "Blocked on SSO setup."));
    assert_eq!(result.themes[1], Theme::new("Docs", ""));
    assert_eq!(result.themes[2].title, r#"{"name":"no title"}"#);
}

#[tokio::test]
async fn rejected_key_is_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})))
        .mount(&server)
        .await;

    let service = InsightService::new(
        StudyCatalog::builtin(),
        client_for(&server),
        Arc::new(StaticCredential::new("sk-wrong")),
        None,
    );

    let err = service
        .generate(&InsightRequest::new("1", "snippet"))
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::InvalidCredential));
}

#[tokio::test]
async fn prose_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Here are some insights!")))
        .mount(&server)
        .await;

    let service = InsightService::new(
        StudyCatalog::builtin(),
        client_for(&server),
        Arc::new(StaticCredential::new("sk-test")),
        None,
    );

    let err = service
        .generate(&InsightRequest::new("1", "snippet"))
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::MalformedResponse(_)));
}

#[tokio::test]
async fn key_is_stored_only_after_validation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(bearer_token("sk-good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(bearer_token("sk-bad"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = KeyStore::in_dir(dir.path());
    let service = InsightService::new(
        StudyCatalog::builtin(),
        client_for(&server),
        Arc::new(store.clone()),
        Some(store.clone()),
    );

    let err = service.save_key("sk-bad").await.unwrap_err();
    assert!(matches!(err, InsightError::InvalidCredential));
    assert_eq!(store.get(API_KEY_NAME).unwrap(), None);

    service.save_key("sk-good").await.unwrap();
    assert_eq!(store.get(API_KEY_NAME).unwrap().as_deref(), Some("sk-good"));
    assert!(service.has_key().unwrap());
}

#[tokio::test]
async fn input_errors_skip_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let service = InsightService::new(
        StudyCatalog::builtin(),
        client_for(&server),
        Arc::new(StaticCredential::new("")),
        None,
    );

    let err = service
        .generate(&InsightRequest::new("1", "\n\n"))
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::EmptyInput(_)));

    let err = service
        .generate(&InsightRequest::new("1", "real text"))
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::MissingCredential));
}
