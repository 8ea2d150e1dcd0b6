//! LLM provider factory.
//!
//! Resolves a provider name from configuration into a concrete client.

use crate::client::LlmClient;
use crate::providers::ollama::DEFAULT_OLLAMA_URL;
use crate::providers::openai::{GROQ_BASE_URL, OPENAI_BASE_URL};
use crate::providers::{OllamaClient, OpenAiCompatibleClient};
use docqa_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "openai", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key, required by hosted providers
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a hosted
/// provider has no API key.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider = provider.to_lowercase();
    match provider.as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        "groq" | "openai" => {
            let api_key = api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
                AppError::Config(format!(
                    "{} provider requires an API key (set DOCQA_API_KEY or {}_API_KEY)",
                    provider,
                    provider.to_uppercase()
                ))
            })?;
            let default_url = if provider == "groq" {
                GROQ_BASE_URL
            } else {
                OPENAI_BASE_URL
            };
            let base_url = endpoint.unwrap_or(default_url);
            Ok(Arc::new(OpenAiCompatibleClient::new(
                provider.as_str(),
                base_url,
                api_key,
            )))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

/// Create the client for the active provider of `config`, resolving its
/// endpoint and API key.
pub fn create_client_from_config(config: &AppConfig) -> AppResult<Arc<dyn LlmClient>> {
    let endpoint = config.provider_endpoint(&config.provider);
    let api_key = config.resolve_api_key(&config.provider);

    tracing::debug!(
        "Creating LLM client: provider={}, model={}",
        config.provider,
        config.model
    );

    create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        assert!(create_client("ollama", Some("http://localhost:8080"), None).is_ok());
    }

    #[test]
    fn test_groq_requires_api_key() {
        match create_client("groq", None, None) {
            Err(AppError::Config(msg)) => assert!(msg.contains("requires an API key")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("Expected error for Groq without API key"),
        }
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(create_client("openai", None, Some("")).is_err());
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        let client = create_client("GROQ", None, Some("key")).unwrap();
        assert_eq!(client.provider_name(), "groq");
    }

    #[test]
    fn test_create_client_from_config() {
        let config = AppConfig {
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            ..Default::default()
        };

        let client = create_client_from_config(&config).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(AppError::Config(msg)) => assert!(msg.contains("Unknown provider")),
            _ => panic!("Expected config error for unknown provider"),
        }
    }
}
