//! The coder agent: generation and revision of analysis scripts.

use std::sync::Arc;

use crate::error::{AgentError, AgentResult};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::{build_generation_prompt, build_repair_prompt, InstructionPayload};
use crate::utils::strip_code_fences;

use super::types::{CodeArtifact, ScriptRequest};

/// Configuration for the coder agent.
#[derive(Debug, Clone)]
pub struct CoderConfig {
    /// Model to request from the provider. Empty means the provider default.
    pub model: String,
    /// Maximum tokens for the generated script.
    pub max_tokens: u32,
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 4000,
        }
    }
}

impl CoderConfig {
    /// Creates new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Sampling temperature for every coder call. Zero so repeated identical
/// payloads converge to near-identical scripts.
const CODER_TEMPERATURE: f64 = 0.0;

/// Coder agent responsible for script generation **and** repair.
pub struct CoderAgent {
    llm_client: Arc<dyn LlmProvider>,
    config: CoderConfig,
}

impl std::fmt::Debug for CoderAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoderAgent")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CoderAgent {
    /// Agent name constant.
    pub const AGENT_NAME: &'static str = "coder";

    /// Creates a new coder agent.
    pub fn new(llm_client: Arc<dyn LlmProvider>, config: CoderConfig) -> Self {
        Self { llm_client, config }
    }

    /// Creates with default configuration.
    pub fn with_defaults(llm_client: Arc<dyn LlmProvider>) -> Self {
        Self::new(llm_client, CoderConfig::default())
    }

    /// Generates a ready-to-run analysis script for a request.
    ///
    /// Assembles the family-specific template, invokes the model once at
    /// temperature zero, and strips fence markup from the reply. No internal
    /// retry and no validation of the returned source; syntactic and
    /// semantic correctness are settled by the execution collaborator.
    ///
    /// # Errors
    ///
    /// [`AgentError::MissingField`] before any model call if a required
    /// request field is empty; [`AgentError::Llm`] when the model endpoint
    /// fails, propagated uncaught.
    pub async fn generate_script(&self, request: &ScriptRequest) -> AgentResult<String> {
        let payload = build_generation_prompt(request)?;

        tracing::debug!(
            algorithm = %request.algorithm,
            family = %request.family,
            template = payload.template_name,
            "Assembled generation payload"
        );

        let source = self.invoke(payload).await?;

        tracing::info!(
            algorithm = %request.algorithm,
            bytes = source.len(),
            "Generated analysis script"
        );

        Ok(source)
    }

    /// Produces a replacement script for a failed artifact.
    ///
    /// Requires `artifact.error_message` to be non-empty; repair without a
    /// concrete failure reason is rejected before any model call. On a
    /// successful round-trip, increments `artifact.review_count` by exactly
    /// one and leaves every other field untouched; writing the returned
    /// source back into `artifact.code` is the caller's responsibility. A
    /// failed round-trip leaves the counter unchanged.
    pub async fn revise_script(
        &self,
        artifact: &mut CodeArtifact,
        documentation: &str,
    ) -> AgentResult<String> {
        if !artifact.has_error() {
            return Err(AgentError::MissingErrorMessage {
                algorithm: artifact.algorithm.clone(),
            });
        }

        let payload = build_repair_prompt(artifact, documentation)?;

        tracing::debug!(
            algorithm = %artifact.algorithm,
            review_count = artifact.review_count,
            error = %artifact.error_message,
            "Assembled repair payload"
        );

        let source = self.invoke(payload).await?;

        artifact.review_count += 1;

        tracing::info!(
            algorithm = %artifact.algorithm,
            review_count = artifact.review_count,
            bytes = source.len(),
            "Revised analysis script"
        );

        Ok(source)
    }

    /// Single invoke/sanitize round-trip shared by both operations.
    async fn invoke(&self, payload: InstructionPayload) -> AgentResult<String> {
        let request = GenerationRequest::new(
            self.config.model.clone(),
            vec![
                Message::system(payload.system.clone()),
                Message::user(payload.user_message()),
            ],
        )
        .with_temperature(CODER_TEMPERATURE)
        .with_max_tokens(self.config.max_tokens);

        let response = self.llm_client.generate(request).await?;

        let content = response.first_content().ok_or(AgentError::EmptyResponse)?;

        Ok(strip_code_fences(content))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CoderConfig {
        &self.config
    }
}
