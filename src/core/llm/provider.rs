//! Provider clients: one OpenAI-compatible HTTP client per backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::core::config::ProviderSettings;
use crate::core::models::Model;

use super::error::{ProviderError, extract_api_message};
use super::wire::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// A backend able to answer a single user turn.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `user_text` to `model` and return the reply text.
    /// Zero choices is not an error: the reply is "No response from <model>".
    async fn complete(&self, model: &Model, user_text: &str) -> Result<String, ProviderError>;
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiCompatibleClient {
    client: Client,
    endpoint: String,
    api_key: String,
    temperature: f32,
}

impl OpenAiCompatibleClient {
    pub fn new(
        settings: &ProviderSettings,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                settings.base_url.trim_end_matches('/'),
                COMPLETIONS_PATH
            ),
            api_key: settings.api_key.clone(),
            temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, model: &Model, user_text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.id.clone(),
            messages: vec![WireMessage::user(user_text)],
            temperature: self.temperature,
            max_tokens: Some(model.max_output_tokens).filter(|&n| n > 0),
            stream: false,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleClient {
    async fn complete(&self, model: &Model, user_text: &str) -> Result<String, ProviderError> {
        let request = self.build_request(model, user_text);
        log::debug!("POST {} model={}", self.endpoint, model.id);

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("{} returned HTTP {}", model.id, status.as_u16());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: extract_api_message(&body),
            });
        }

        let body = response.text().await.map_err(ProviderError::from_reqwest)?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        if let Some(usage) = parsed.usage {
            log::debug!(
                "{} usage: prompt={} completion={} total={}",
                model.id,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        match parsed.first_content() {
            Some(content) => Ok(content.to_string()),
            None => {
                log::warn!("{} returned no content", model.id);
                Ok(format!("No response from {}", model.display_name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ModelRegistry;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiCompatibleClient {
        let settings = ProviderSettings {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
        };
        OpenAiCompatibleClient::new(&settings, 0.7, Duration::from_secs(5)).unwrap()
    }

    fn llama_70b() -> Model {
        ModelRegistry::builtin()
            .find("llama3-70b-8192")
            .cloned()
            .unwrap()
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1717000000,
            "model": "llama3-70b-8192",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}
        })
    }

    #[test]
    fn endpoint_appends_completions_path() {
        let settings = ProviderSettings {
            base_url: "https://api.x.ai/".to_string(),
            api_key: "k".to_string(),
        };
        let client = OpenAiCompatibleClient::new(&settings, 0.7, Duration::from_secs(30)).unwrap();
        assert_eq!(client.endpoint(), "https://api.x.ai/v1/chat/completions");
    }

    #[tokio::test]
    async fn sends_single_user_message_with_max_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi!")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .complete(&llama_70b(), "Hello")
            .await
            .unwrap();
        assert_eq!(reply, "Hi!");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "llama3-70b-8192");
        assert_eq!(body["messages"], json!([{"role": "user", "content": "Hello"}]));
        assert_eq!(body["max_tokens"], 8192);
        assert_eq!(body["stream"], false);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn empty_choices_yield_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "x",
                "object": "chat.completion",
                "created": 0,
                "model": "llama3-70b-8192",
                "choices": [],
                "usage": null
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .complete(&llama_70b(), "Hello")
            .await
            .unwrap();
        assert_eq!(reply, "No response from Llama 3 70B (Groq)");
    }

    #[tokio::test]
    async fn null_content_yields_sentinel() {
        let server = MockServer::start().await;
        let mut body = completion("unused");
        body["choices"][0]["message"]["content"] = Value::Null;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .complete(&llama_70b(), "Hello")
            .await
            .unwrap();
        assert_eq!(reply, "No response from Llama 3 70B (Groq)");
    }

    #[tokio::test]
    async fn http_500_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": {"message": "upstream exploded"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete(&llama_70b(), "Hello")
            .await
            .unwrap_err();
        match &err {
            ProviderError::Status { status, message } => {
                assert_eq!(*status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected Status, got {:?}", other),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .complete(&llama_70b(), "Hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let settings = ProviderSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: "k".to_string(),
        };
        let client = OpenAiCompatibleClient::new(&settings, 0.7, Duration::from_secs(2)).unwrap();
        let err = client.complete(&llama_70b(), "Hello").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)), "got {:?}", err);
    }
}
