//! LLM Client module for OKR Coach
//!
//! Provides the provider-neutral client trait, the Gemini and Anthropic
//! implementations, and a helper for single-shot text calls.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod gemini;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::{LlmError, RATE_LIMIT_MARKERS, mentions_rate_limit};
pub use gemini::GeminiClient;
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::{LlmConfig, StageSettings};

/// Default Anthropic endpoint, used when base-url still points at Gemini
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Create an LLM client based on the provider specified in config
///
/// Supports "gemini" and "anthropic" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            let base_url = if config.base_url.contains("googleapis.com") {
                ANTHROPIC_BASE_URL
            } else {
                config.base_url.as_str()
            };
            Ok(Arc::new(AnthropicClient::from_config(config, base_url)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::InvalidResponse(format!(
                "Unknown LLM provider: '{}'. Supported: gemini, anthropic",
                other
            )))
        }
    }
}

/// Send one rendered prompt with per-stage settings and return the raw text
///
/// A response with no text yields an empty string; the extractor decides
/// what to do with it.
pub async fn invoke(llm: &Arc<dyn LlmClient>, prompt: String, settings: &StageSettings) -> Result<String, LlmError> {
    debug!(prompt_len = prompt.len(), "invoke: called");
    send(llm, CompletionRequest::prompt(prompt, settings.max_tokens), settings).await
}

/// Send a prepared request with per-stage model, temperature and token limit applied
pub async fn send(
    llm: &Arc<dyn LlmClient>,
    mut request: CompletionRequest,
    settings: &StageSettings,
) -> Result<String, LlmError> {
    debug!(turns = request.messages.len(), ?settings.model, "send: called");
    request.model = settings.model.clone();
    request.temperature = Some(settings.temperature);
    request.max_tokens = settings.max_tokens;

    let response = llm.complete(request).await?;
    debug!(stop_reason = ?response.stop_reason, usage = ?response.usage, "send: response received");
    Ok(response.content.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::client::mock::{MockLlmClient, MockReply};
    use super::*;

    #[test]
    fn test_create_client_unknown_provider() {
        let config = LlmConfig {
            provider: "nope".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown LLM provider"));
    }

    #[tokio::test]
    async fn test_invoke_applies_stage_settings() {
        let mock = Arc::new(MockLlmClient::texts(&["pong"]));
        let llm: Arc<dyn LlmClient> = mock.clone();
        let settings = StageSettings {
            model: Some("gemini-1.5-pro".to_string()),
            temperature: 0.3,
            max_tokens: 256,
        };

        let text = invoke(&llm, "ping".to_string(), &settings).await.unwrap();
        assert_eq!(text, "pong");

        let sent = &mock.requests()[0];
        assert_eq!(sent.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(sent.temperature, Some(0.3));
        assert_eq!(sent.max_tokens, 256);
    }

    #[tokio::test]
    async fn test_send_keeps_system_prompt_and_turns() {
        let mock = Arc::new(MockLlmClient::texts(&["sure"]));
        let llm: Arc<dyn LlmClient> = mock.clone();
        let request = CompletionRequest::conversation(
            "You are a coach",
            vec![Message::user("hi"), Message::assistant("hello"), Message::user("help")],
            4096,
        );
        let settings = StageSettings {
            model: None,
            temperature: 0.7,
            max_tokens: 512,
        };

        assert_eq!(send(&llm, request, &settings).await.unwrap(), "sure");

        let sent = &mock.requests()[0];
        assert_eq!(sent.system_prompt.as_deref(), Some("You are a coach"));
        assert_eq!(sent.messages.len(), 3);
        assert_eq!(sent.messages[1].role, Role::Assistant);
        assert_eq!(sent.max_tokens, 512);
    }

    #[tokio::test]
    async fn test_invoke_propagates_rate_limit() {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(vec![MockReply::RateLimited]));
        let err = invoke(&llm, "ping".to_string(), &StageSettings::default()).await.unwrap_err();
        assert!(err.is_rate_limit());
    }
}
