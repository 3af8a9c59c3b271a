//! Provider enumeration and model/credential resolution.

use std::fmt;

use tracing::debug;

use crate::config::Config;
use crate::error::ModelError;

/// Model used when `BETTER_COMMIT_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Pre-provider-specific credential variable, accepted for Anthropic only.
pub const LEGACY_CREDENTIAL_VAR: &str = "GIT_API_KEY";

/// Request/response shape spoken by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// Anthropic Messages API.
    Anthropic,
    /// OpenAI-style `/chat/completions`.
    OpenAiChat,
}

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Anthropic,
    OpenAi,
    Gemini,
    Groq,
    Mistral,
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::Gemini,
        Provider::Groq,
        Provider::Mistral,
        Provider::OpenRouter,
    ];

    /// Provider used for identifiers without a recognized prefix.
    pub const DEFAULT: Provider = Provider::Anthropic;

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Gemini",
            Provider::Groq => "Groq",
            Provider::Mistral => "Mistral",
            Provider::OpenRouter => "OpenRouter",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    /// Explicit routing prefix, stripped before the model name goes on the wire.
    fn routing_prefix(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic/",
            Provider::OpenAi => "openai/",
            Provider::Gemini => "gemini/",
            Provider::Groq => "groq/",
            Provider::Mistral => "mistral/",
            Provider::OpenRouter => "openrouter/",
        }
    }

    /// Model family prefixes that imply this provider and are sent as-is.
    fn family_prefixes(&self) -> &'static [&'static str] {
        match self {
            Provider::Anthropic => &["claude"],
            Provider::OpenAi => &["gpt-", "chatgpt-", "o1", "o3", "o4"],
            Provider::Gemini => &["gemini-"],
            Provider::Groq => &[],
            Provider::Mistral => &["mistral-", "codestral", "open-mistral"],
            Provider::OpenRouter => &[],
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Anthropic => "https://api.anthropic.com/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::Mistral => "https://api.mistral.ai/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    pub fn wire_format(&self) -> WireFormat {
        match self {
            Provider::Anthropic => WireFormat::Anthropic,
            _ => WireFormat::OpenAiChat,
        }
    }

    /// Map a model identifier to its provider and the name sent on the wire.
    ///
    /// Routing prefixes (`groq/llama-3.3-70b`) win over family prefixes
    /// (`gpt-4o`). Unrecognized identifiers go to [`Provider::DEFAULT`].
    pub fn for_model(identifier: &str) -> (Provider, &str) {
        for provider in Provider::ALL {
            if let Some(rest) = identifier.strip_prefix(provider.routing_prefix()) {
                return (provider, rest);
            }
        }

        let lowered = identifier.to_ascii_lowercase();
        for provider in Provider::ALL {
            if provider
                .family_prefixes()
                .iter()
                .any(|prefix| lowered.starts_with(prefix))
            {
                return (provider, identifier);
            }
        }

        (Provider::DEFAULT, identifier)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider, wire model name and credential for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
}

impl fmt::Debug for ModelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSelection")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ModelSelection {
    /// Resolve the model and its credential from the configuration snapshot.
    ///
    /// The provider-specific variable always wins. `GIT_API_KEY` is only
    /// consulted when that variable is absent and the provider is the default.
    pub fn resolve(config: &Config) -> Result<Self, ModelError> {
        let (provider, model) = Provider::for_model(&config.model);
        debug!("Model '{}' resolved to provider {}", config.model, provider);

        let legacy = (provider == Provider::DEFAULT).then_some(LEGACY_CREDENTIAL_VAR);

        let api_key = config
            .credential(provider)
            .or_else(|| legacy.and_then(|_| config.legacy_credential()))
            .ok_or(ModelError::MissingCredential {
                provider,
                env_var: provider.credential_var(),
                legacy,
            })?;

        Ok(Self {
            provider,
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}
