//! Ollama chat provider.
//!
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

#[derive(Debug, Serialize, PartialEq)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    model: String,
    message: OllamaReply,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}

/// Client for a local Ollama runtime.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Client against [`DEFAULT_OLLAMA_URL`].
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_OLLAMA_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn to_chat_request<'a>(&self, request: &'a LlmRequest) -> OllamaChatRequest<'a> {
        let options = (request.temperature.is_some() || request.max_tokens.is_some()).then(|| {
            OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            }
        });

        OllamaChatRequest {
            model: &request.model,
            messages: &request.messages,
            options,
            stream: false,
        }
    }

    fn convert_response(&self, request: &LlmRequest, response: OllamaChatResponse) -> LlmResponse {
        let model = if response.model.is_empty() {
            request.model.clone()
        } else {
            response.model
        };

        LlmResponse {
            content: response.message.content,
            model,
            usage: LlmUsage::new(
                response.prompt_eval_count.unwrap_or(0),
                response.eval_count.unwrap_or(0),
            ),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        request.validate()?;
        tracing::info!(
            "Sending chat request to Ollama ({}, {} messages)",
            request.model,
            request.messages.len()
        );

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&self.to_chat_request(request))
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        let converted = self.convert_response(request, chat_response);
        tracing::info!(
            "Received reply from Ollama ({} tokens)",
            converted.usage.total_tokens
        );
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_trailing_slash() {
        assert_eq!(OllamaClient::new().base_url, DEFAULT_OLLAMA_URL);
        assert_eq!(
            OllamaClient::with_base_url("http://localhost:8080/").base_url,
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_chat_request_wire_format() {
        let client = OllamaClient::new();
        let request = LlmRequest::new("llama3.2")
            .with_system("sys")
            .with_user("Hello")
            .with_temperature(0.5)
            .with_max_tokens(100);

        let value = serde_json::to_value(client.to_chat_request(&request)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "llama3.2",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "Hello"}
                ],
                "options": {"temperature": 0.5, "num_predict": 100},
                "stream": false
            })
        );
    }

    #[test]
    fn test_request_without_options() {
        let client = OllamaClient::new();
        let request = LlmRequest::new("llama3.2").with_user("Hi");
        assert!(client.to_chat_request(&request).options.is_none());
    }

    #[test]
    fn test_convert_response() {
        let client = OllamaClient::new();
        let request = LlmRequest::new("llama3.2").with_user("Hi");
        let raw = r#"{
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "Hello there"},
            "done": true,
            "prompt_eval_count": 7,
            "eval_count": 3
        }"#;
        let parsed: OllamaChatResponse = serde_json::from_str(raw).unwrap();
        let response = client.convert_response(&request, parsed);

        assert_eq!(response.content, "Hello there");
        assert_eq!(response.usage, LlmUsage::new(7, 3));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_llm_error() {
        let client = OllamaClient::with_base_url("http://127.0.0.1:9");
        let request = LlmRequest::new("llama3.2").with_user("Hi");
        let result = client.complete(&request).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_request_without_user_message_rejected() {
        let client = OllamaClient::with_base_url("http://127.0.0.1:9");
        let result = client.complete(&LlmRequest::new("llama3.2")).await;
        assert!(matches!(result, Err(AppError::Llm(msg)) if msg.contains("no user message")));
    }
}
