//! Single-shot chat-completion calls over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::ModelError;

use super::provider::{ModelSelection, Provider, WireFormat};

/// Version header required by the Anthropic Messages API.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Trait for sending one prompt to a language model.
///
/// This abstraction allows mocking the provider in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Human-readable model name for progress messages.
    fn model_name(&self) -> String;

    /// Send `prompt` as a single user message and return the completion text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError>;
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    messages: [Message<'a>; 1],
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error envelope shared by Anthropic and OpenAI-compatible APIs.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Model client backed by a provider's public HTTP API.
pub struct HttpModelClient {
    http: Client,
    selection: ModelSelection,
    base_url: String,
}

impl HttpModelClient {
    /// Resolve provider, model and credential from configuration.
    ///
    /// Fails with [`ModelError::MissingCredential`] before any network
    /// activity when no usable key is configured.
    pub fn from_config(config: &Config) -> Result<Self, ModelError> {
        let selection = ModelSelection::resolve(config)?;
        let base_url = config
            .api_base
            .clone()
            .unwrap_or_else(|| selection.provider.default_base_url().to_string());
        Ok(Self::new(selection, base_url))
    }

    pub fn new(selection: ModelSelection, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            selection,
            base_url: base_url.into(),
        }
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    async fn complete_anthropic(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ModelError> {
        let provider = self.selection.provider;
        let url = format!("{}/messages", self.base_url);
        let body = AnthropicRequest {
            model: &self.selection.model,
            max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.selection.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(ModelError::Request)?;

        let text = read_success_body(provider, response).await?;
        let parsed: AnthropicResponse =
            serde_json::from_str(&text).map_err(|e| ModelError::MalformedResponse {
                provider,
                detail: e.to_string(),
            })?;

        let joined: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        non_empty(provider, joined)
    }

    async fn complete_chat(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError> {
        let provider = self.selection.provider;
        let url = format!("{}/chat/completions", self.base_url);

        // OpenAI's reasoning models reject `max_tokens`; everyone else expects it.
        let (max_tokens, max_completion_tokens) = match provider {
            Provider::OpenAi => (None, Some(max_tokens)),
            _ => (Some(max_tokens), None),
        };
        let body = ChatRequest {
            model: &self.selection.model,
            max_tokens,
            max_completion_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.selection.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ModelError::Request)?;

        let text = read_success_body(provider, response).await?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ModelError::MalformedResponse {
                provider,
                detail: e.to_string(),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        non_empty(provider, content)
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    fn model_name(&self) -> String {
        self.selection.model.clone()
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, ModelError> {
        debug!(
            "Sending {} char prompt to {} ({}), max_tokens={}",
            prompt.len(),
            self.selection.provider,
            self.selection.model,
            max_tokens
        );

        match self.selection.provider.wire_format() {
            WireFormat::Anthropic => self.complete_anthropic(prompt, max_tokens).await,
            WireFormat::OpenAiChat => self.complete_chat(prompt, max_tokens).await,
        }
    }
}

/// Return the body of a 2xx response, or map the provider's error payload.
async fn read_success_body(
    provider: Provider,
    response: reqwest::Response,
) -> Result<String, ModelError> {
    let status = response.status();
    debug!("{} responded with HTTP {}", provider, status.as_u16());

    let body = response.text().await.map_err(ModelError::Request)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        return Err(ModelError::Api {
            provider,
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

fn non_empty(provider: Provider, text: String) -> Result<String, ModelError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyResponse { provider });
    }
    Ok(trimmed.to_string())
}
