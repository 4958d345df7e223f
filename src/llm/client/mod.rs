//! Completion client for snippet analysis.
//!
//! Talks to any OpenAI-compatible chat-completions API. One attempt per
//! call; retries are left to the caller.

mod config;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::InsightError;
use crate::models::Message;

pub use config::LlmConfig;

/// Something that turns a message list into generated text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send messages and return the raw reply text.
    async fn complete(&self, api_key: &str, messages: &[Message]) -> Result<String, InsightError>;

    /// Check that the service accepts the key.
    async fn validate_key(&self, api_key: &str) -> Result<(), InsightError>;
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Chat-completions response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible completion client.
pub struct OpenAiClient {
    config: LlmConfig,
    client: Client,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InsightError::CallFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, api_key: &str, messages: &[Message]) -> Result<String, InsightError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let url = self.config.url("v1/chat/completions")?;
        debug!(
            "Requesting completion from {} ({} messages, model {})",
            url.host_str().unwrap_or_default(),
            messages.len(),
            self.config.model
        );

        let resp = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::CallFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!("Completion request failed with HTTP {}", status);
            return Err(InsightError::from_status(status, &body));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| InsightError::CallFailed(format!("unexpected response body: {}", e)))?;

        // An empty reply is treated as an empty object, not a transport failure.
        let text = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "{}".to_string());

        Ok(text)
    }

    async fn validate_key(&self, api_key: &str) -> Result<(), InsightError> {
        let url = self.config.url("v1/models")?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| InsightError::CallFailed(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        warn!("API key check returned HTTP {}", status.as_u16());
        let body = resp.text().await.unwrap_or_default();
        Err(InsightError::from_status(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> OpenAiClient {
        let config = LlmConfig::default().with_endpoint(&server.uri());
        OpenAiClient::new(config).unwrap()
    }

    fn completion_body(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_complete_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4.1-mini",
                "response_format": { "type": "json_object" },
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hi" }
                ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(serde_json::json!("{\"summary\":\"ok\"}"))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let text = client
            .complete("sk-test", &[Message::system("sys"), Message::user("hi")])
            .await
            .unwrap();
        assert_eq!(text, "{\"summary\":\"ok\"}");
    }

    #[tokio::test]
    async fn test_complete_missing_content_is_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_body(serde_json::Value::Null)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let text = client.complete("sk-test", &[]).await.unwrap();
        assert_eq!(text, "{}");
    }

    #[tokio::test]
    async fn test_complete_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Incorrect API key provided" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.complete("sk-bad", &[]).await.unwrap_err();
        assert!(matches!(err, InsightError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        match client.complete("sk-test", &[]).await.unwrap_err() {
            InsightError::CallFailed(msg) => assert!(msg.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_garbage_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.complete("sk-test", &[]).await.unwrap_err();
        assert!(matches!(err, InsightError::CallFailed(_)));
    }

    #[tokio::test]
    async fn test_validate_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("Authorization", "Bearer sk-good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{ "id": "gpt-4.1-mini", "object": "model" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("Authorization", "Bearer sk-bad"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.validate_key("sk-good").await.is_ok());
        assert!(matches!(
            client.validate_key("sk-bad").await,
            Err(InsightError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn test_validate_key_other_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(
            client.validate_key("sk-any").await,
            Err(InsightError::CallFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_call_failed() {
        // Grab a free port, then close it so connections are refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = LlmConfig::default().with_endpoint(&format!("http://{}", addr));

        let client = OpenAiClient::new(config).unwrap();
        assert!(matches!(
            client.complete("sk-test", &[Message::user("hi")]).await,
            Err(InsightError::CallFailed(_))
        ));
        assert!(matches!(
            client.validate_key("sk-test").await,
            Err(InsightError::CallFailed(_))
        ));
    }
}
