use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::config::{resolve_api_key, CompletionConfig};
use crate::error::{AskfolioError, Result};

/// Who said a message in the prompt sent to the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A single non-streaming completion: system prompt plus the trimmed
/// conversation, ending with the new user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<PromptMessage>,
}

/// Opaque text-completion service.
pub trait CompletionClient: Send + Sync {
    /// `false` when no credential is available; callers must not expect a
    /// network call to succeed in that state.
    fn is_configured(&self) -> bool;

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP completion client. Model, token limit and temperature are fixed at
/// construction.
pub struct LlmClient {
    provider: LlmProvider,
    config: CompletionConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider)
            .field("model", &self.config.model)
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LlmProvider {
    OpenAI,
    Anthropic,
    Ollama,
}

impl LlmClient {
    /// Create a completion client from configuration. A missing API key is
    /// not an error here: the client is built in "not configured" mode.
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let provider = match config.provider.as_str() {
            "openai" => LlmProvider::OpenAI,
            "anthropic" | "claude" => LlmProvider::Anthropic,
            "ollama" => LlmProvider::Ollama,
            other => {
                return Err(AskfolioError::Config(format!(
                    "unknown completion provider: '{other}' (expected 'openai', 'anthropic', or 'ollama')"
                )));
            }
        };

        let api_key = match provider {
            LlmProvider::OpenAI => resolve_api_key(
                config.api_key.as_deref(),
                config.env_var.as_deref(),
                "OPENAI_API_KEY",
            ),
            LlmProvider::Anthropic => resolve_api_key(
                config.api_key.as_deref(),
                config.env_var.as_deref(),
                "ANTHROPIC_API_KEY",
            ),
            LlmProvider::Ollama => None,
        };

        if provider != LlmProvider::Ollama && api_key.is_none() {
            tracing::info!(
                provider = %config.provider,
                "no API key found, completion service runs in not-configured mode"
            );
        }

        Ok(Self {
            provider,
            config: config.clone(),
            api_key,
            client: reqwest::Client::new(),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn require_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AskfolioError::NotConfigured(format!(
                "{} completion provider requires an API key (set completion.api_key or {})",
                self.config.provider,
                self.config.env_var.as_deref().unwrap_or(match self.provider {
                    LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
                    _ => "OPENAI_API_KEY",
                })
            ))
        })
    }

    /// OpenAI: POST {base_url}/v1/chat/completions
    async fn complete_openai(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self.require_key()?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");

        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));

        let mut messages = vec![serde_json::json!({"role": "system", "content": request.system})];
        messages.extend(request.messages.iter().map(message_json));

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": false,
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AskfolioError::Completion(format!("OpenAI request failed: {e}")))?;

        let json = read_json(resp, "OpenAI").await?;
        non_empty(json["choices"][0]["message"]["content"].as_str(), "OpenAI")
    }

    /// Anthropic: POST {base_url}/v1/messages
    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self.require_key()?;
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.anthropic.com");

        let url = format!("{}/v1/messages", base_url.trim_end_matches('/'));

        let messages: Vec<serde_json::Value> = request.messages.iter().map(message_json).collect();

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": request.system,
            "messages": messages,
        });

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AskfolioError::Completion(format!("Anthropic request failed: {e}")))?;

        // Anthropic response: {"content": [{"type": "text", "text": "..."}]}
        let json = read_json(resp, "Anthropic").await?;
        non_empty(json["content"][0]["text"].as_str(), "Anthropic")
    }

    /// Ollama: POST {base_url}/api/chat
    async fn complete_ollama(&self, request: &CompletionRequest) -> Result<String> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("http://localhost:11434");

        let url = format!("{}/api/chat", base_url.trim_end_matches('/'));

        let mut messages = vec![serde_json::json!({"role": "system", "content": request.system})];
        messages.extend(request.messages.iter().map(message_json));

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "stream": false,
            "options": {
                "num_predict": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AskfolioError::Completion(format!("Ollama request failed: {e}")))?;

        let json = read_json(resp, "Ollama").await?;
        non_empty(json["message"]["content"].as_str(), "Ollama")
    }
}

impl CompletionClient for LlmClient {
    fn is_configured(&self) -> bool {
        self.provider == LlmProvider::Ollama || self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self.provider {
            LlmProvider::OpenAI => self.complete_openai(request).await,
            LlmProvider::Anthropic => self.complete_anthropic(request).await,
            LlmProvider::Ollama => self.complete_ollama(request).await,
        }
    }
}

fn message_json(msg: &PromptMessage) -> serde_json::Value {
    serde_json::json!({"role": msg.role.as_str(), "content": msg.content})
}

async fn read_json(resp: reqwest::Response, provider: &str) -> Result<serde_json::Value> {
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(AskfolioError::Completion(format!(
            "{provider} error {status}: {text}"
        )));
    }

    resp.json()
        .await
        .map_err(|e| AskfolioError::Completion(format!("{provider} response parse error: {e}")))
}

fn non_empty(text: Option<&str>, provider: &str) -> Result<String> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(AskfolioError::Completion(format!(
            "{provider} response missing content"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "You are a test.".into(),
            messages: vec![PromptMessage::user("hi")],
        }
    }

    #[test]
    fn test_from_config_unknown_provider() {
        let config = CompletionConfig {
            provider: "banana".into(),
            ..Default::default()
        };
        let result = LlmClient::from_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown completion provider"));
    }

    #[test]
    fn test_from_config_openai_with_key() {
        let config = CompletionConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let client = LlmClient::from_config(&config).unwrap();
        assert!(client.is_configured());
        assert_eq!(client.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_from_config_placeholder_key_not_configured() {
        let config = CompletionConfig {
            api_key: Some("your-openai-api-key-here".into()),
            env_var: Some("ASKFOLIO_TEST_NEVER_SET".into()),
            ..Default::default()
        };
        let client = LlmClient::from_config(&config).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = CompletionConfig {
            provider: "ollama".into(),
            model: "llama3.2".into(),
            ..Default::default()
        };
        let client = LlmClient::from_config(&config).unwrap();
        assert!(client.is_configured());
    }

    #[test]
    fn test_claude_alias() {
        let config = CompletionConfig {
            provider: "claude".into(),
            api_key: Some("sk-ant-test".into()),
            ..Default::default()
        };
        let client = LlmClient::from_config(&config).unwrap();
        assert_eq!(client.provider, LlmProvider::Anthropic);
    }

    #[tokio::test]
    async fn test_unconfigured_client_short_circuits() {
        let config = CompletionConfig {
            api_key: None,
            env_var: Some("ASKFOLIO_TEST_NEVER_SET".into()),
            // unroutable: a network attempt would surface as a Completion error
            base_url: Some("http://127.0.0.1:9".into()),
            ..Default::default()
        };
        let client = LlmClient::from_config(&config).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(err.is_not_configured());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_completion_error() {
        let config = CompletionConfig {
            api_key: Some("sk-test".into()),
            base_url: Some("http://127.0.0.1:9".into()),
            ..Default::default()
        };
        let client = LlmClient::from_config(&config).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(err.is_service_failure());
    }

    #[test]
    fn test_non_empty_rejects_blank_content() {
        assert!(non_empty(Some("   "), "OpenAI").is_err());
        assert!(non_empty(None, "OpenAI").is_err());
        assert_eq!(non_empty(Some(" ok "), "OpenAI").unwrap(), " ok ");
    }

    #[test]
    fn test_message_json_roles() {
        let json = message_json(&PromptMessage::assistant("hello"));
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hello");
    }
}
