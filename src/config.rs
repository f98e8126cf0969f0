//! Configuration management for hackbox.
//!
//! Configuration is read from environment variables (a `.env` file is loaded
//! into the environment by the binaries before this runs):
//! - `GROQ_API_KEY` - Required. API key for the model provider.
//! - `GROQ_API_BASE` - Optional. OpenAI-compatible base URL.
//!   Defaults to `https://api.groq.com/openai/v1`.
//! - `LLM_MODEL` - Optional. Overrides the pipeline's default model (`provider/model` form).
//! - `LLM_TEMPERATURE`, `LLM_TOP_P`, `LLM_MAX_TOKENS` - Optional. Sampling parameters
//!   sent with every completion; provider defaults apply when unset.
//! - `STARTUP_IDEA` - Optional. Idea used by the console startup crew.
//! - `MOCK_UI_API_URL` - Optional. Wireframe generation endpoint.
//! - `DESIGN_API_KEY` - Optional. Bearer key for the wireframe endpoint.
//! - `DOCS_TOPIC` - Optional. Topic summarized by the docs crew.
//! - `DOCS_TARGET_LANGUAGE` - Optional. Language the docs crew translates into.
//! - `CREW_FILE` - Optional. YAML crew definition run by `hackbox-startup`
//!   instead of the built-in crew.
//! - `CREW_VERBOSE` - Optional. Log every task output as it completes.
//!   Defaults to on for `hackbox-docs` and off elsewhere.
//! - `HOST` - Optional. Form server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Form server port. Defaults to `8501`.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::llm::ChatOptions;
use crate::util::parse_bool;

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_STARTUP_IDEA: &str =
    "AI mentor for students that adapts to syllabus and personal learning style.";
pub const DEFAULT_DOCS_TOPIC: &str = "the react hook useEffect";
pub const DEFAULT_DOCS_LANGUAGE: &str = "Turkish";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Wireframe side-call configuration.
#[derive(Debug, Clone, Default)]
pub struct MockUiConfig {
    /// Endpoint receiving the POST
    pub api_url: Option<String>,

    /// Bearer token for the endpoint
    pub api_key: Option<String>,
}

impl MockUiConfig {
    /// The side call is only attempted when both values are present.
    pub fn is_enabled(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model provider API key
    pub api_key: String,

    /// OpenAI-compatible base URL of the provider
    pub api_base: String,

    /// Model override; `None` means each pipeline uses its own default
    pub model: Option<String>,

    /// Sampling parameters for every completion
    pub chat_options: ChatOptions,

    /// Idea fed to the console startup crew
    pub startup_idea: String,

    /// Topic for the documentation crew
    pub docs_topic: String,

    /// Target language for the documentation crew
    pub docs_language: String,

    /// Custom crew definition for the startup binary
    pub crew_file: Option<PathBuf>,

    /// Log task outputs as they complete; `None` leaves it to the binary
    pub verbose: Option<bool>,

    /// Form server host
    pub host: String,

    /// Form server port
    pub port: u16,

    /// Wireframe side-call configuration
    pub mock_ui: MockUiConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `GROQ_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key =
            get("GROQ_API_KEY").ok_or_else(|| ConfigError::MissingEnvVar("GROQ_API_KEY".into()))?;

        let api_base = get("GROQ_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let port = parse_value("PORT", get("PORT"))?.unwrap_or(8501);
        let chat_options = ChatOptions {
            temperature: parse_value("LLM_TEMPERATURE", get("LLM_TEMPERATURE"))?,
            top_p: parse_value("LLM_TOP_P", get("LLM_TOP_P"))?,
            max_tokens: parse_value("LLM_MAX_TOKENS", get("LLM_MAX_TOKENS"))?,
        };

        Ok(Self {
            api_key,
            api_base,
            model: get("LLM_MODEL"),
            chat_options,
            startup_idea: get("STARTUP_IDEA").unwrap_or_else(|| DEFAULT_STARTUP_IDEA.to_string()),
            docs_topic: get("DOCS_TOPIC").unwrap_or_else(|| DEFAULT_DOCS_TOPIC.to_string()),
            docs_language: get("DOCS_TARGET_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_DOCS_LANGUAGE.to_string()),
            crew_file: get("CREW_FILE").map(PathBuf::from),
            verbose: get("CREW_VERBOSE").map(|v| parse_bool(&v)),
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            mock_ui: MockUiConfig {
                api_url: get("MOCK_UI_API_URL"),
                api_key: get("DESIGN_API_KEY"),
            },
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: api_base.into(),
            model: None,
            chat_options: ChatOptions::default(),
            startup_idea: DEFAULT_STARTUP_IDEA.to_string(),
            docs_topic: DEFAULT_DOCS_TOPIC.to_string(),
            docs_language: DEFAULT_DOCS_LANGUAGE.to_string(),
            crew_file: None,
            verbose: None,
            host: "127.0.0.1".to_string(),
            port: 8501,
            mock_ui: MockUiConfig::default(),
        }
    }

    /// `CREW_VERBOSE` if set, otherwise `default`.
    pub fn verbose_or(&self, default: bool) -> bool {
        self.verbose.unwrap_or(default)
    }

    /// The configured model override, or the pipeline default.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(default)
    }
}

fn parse_value<T>(key: &str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.map(|v| {
        v.parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), e.to_string()))
    })
    .transpose()
}
