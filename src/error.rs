//! Error types for adforge operations.
//!
//! Two taxonomies cover the component's failure surface:
//! - [`LlmError`] for transport/endpoint failures calling the chat model
//! - [`AgentError`] for prompt assembly and agent orchestration failures
//!
//! Runtime failures of *generated* scripts are never raised here; they are
//! reported back by the execution collaborator as plain error text and enter
//! this crate only as an artifact's `error_message`.

use thiserror::Error;

/// Errors that can occur calling the chat model endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API base URL: ADFORGE_API_BASE environment variable not set")]
    MissingApiBase,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },
}

/// Errors that can occur during coder agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Error from the LLM provider. Never retried internally; the
    /// orchestrating caller decides whether to retry or abort.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// A required template placeholder had no non-empty binding.
    /// Raised before any model call is made.
    #[error("Missing value for template placeholder '{{{0}}}'")]
    MissingField(&'static str),

    /// The model returned a response with no content.
    #[error("Empty LLM response")]
    EmptyResponse,

    /// A repair was requested for an artifact that carries no failure
    /// reason. Repair without a concrete error is undefined.
    #[error("Cannot revise artifact '{algorithm}': error_message is empty")]
    MissingErrorMessage { algorithm: String },

    /// Unknown library family name in user input.
    #[error("Unknown library family '{0}' (expected 'pyod' or 'pygod')")]
    UnknownFamily(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;
