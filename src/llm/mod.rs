//! LLM client module.
//!
//! A trait-based abstraction over chat completion providers, with Groq's
//! OpenAI-compatible endpoint as the implementation. [`Llm`] is the shared
//! model handle every agent in a crew points at.

mod error;
mod groq;

pub use error::{classify_http_status, LlmError, LlmErrorKind, RetryConfig};
pub use groq::GroqClient;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role in a chat conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Response from a chat completion.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
    pub model: Option<String>,
}

/// Token usage information (if reported by the provider).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Create a usage object ensuring `total_tokens` is consistent.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Component-wise sum.
    pub fn add(&self, other: &TokenUsage) -> TokenUsage {
        TokenUsage::new(
            self.prompt_tokens.saturating_add(other.prompt_tokens),
            self.completion_tokens.saturating_add(other.completion_tokens),
        )
    }
}

/// Optional sampling parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u64>,
}

/// Trait for LLM clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request for `model` (provider-qualified id).
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> anyhow::Result<ChatResponse>;
}

/// Shared, read-only model handle.
///
/// Built once per process and handed to every agent by reference.
pub struct Llm {
    model: String,
    client: Arc<dyn LlmClient>,
    options: ChatOptions,
}

pub type LlmRef = Arc<Llm>;

impl Llm {
    pub fn new(model: impl Into<String>, client: Arc<dyn LlmClient>) -> Self {
        Self {
            model: model.into(),
            client,
            options: ChatOptions::default(),
        }
    }

    /// Groq-backed handle for `config`, using `default_model` unless
    /// `LLM_MODEL` overrides it.
    pub fn from_config(config: &crate::config::Config, default_model: &str) -> LlmRef {
        let client = Arc::new(GroqClient::new(
            config.api_key.clone(),
            config.api_base.clone(),
        ));
        Llm::new(config.model_or(default_model), client)
            .with_options(config.chat_options)
            .shared()
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn shared(self) -> LlmRef {
        Arc::new(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> anyhow::Result<ChatResponse> {
        self.client
            .chat_completion(&self.model, messages, self.options)
            .await
    }
}

impl std::fmt::Debug for Llm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Llm")
            .field("model", &self.model)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
