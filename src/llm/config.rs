//! Client configuration for the chat model endpoint.

use std::env;
use std::time::Duration;

use crate::error::LlmError;

/// Default chat model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Explicit configuration for [`crate::llm::ChatClient`].
///
/// Constructed directly or via [`ClientConfig::from_env`]; the client never
/// reads or mutates process environment on its own.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the OpenAI-compatible API (e.g. "https://api.openai.com/v1").
    pub api_base: String,
    /// Optional API key for bearer authentication.
    pub api_key: Option<String>,
    /// Default model to use when a request leaves the model field empty.
    pub default_model: String,
    /// Timeout applied to each HTTP request. A timeout surfaces as
    /// [`LlmError::RequestFailed`]; there is no internal retry.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default model and timeout.
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key,
            default_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the default model.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a configuration from environment variables.
    ///
    /// Reads:
    /// - `ADFORGE_API_BASE`: base URL for the API (required)
    /// - `ADFORGE_API_KEY`: API key (optional)
    /// - `ADFORGE_MODEL`: default model (defaults to "gpt-4o")
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiBase`] if `ADFORGE_API_BASE` is unset.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_base = env::var("ADFORGE_API_BASE").map_err(|_| LlmError::MissingApiBase)?;
        let api_key = env::var("ADFORGE_API_KEY").ok();
        let default_model =
            env::var("ADFORGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_base, api_key).with_default_model(default_model))
    }
}
