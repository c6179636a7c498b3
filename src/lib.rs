//! adforge: LLM coder agent for anomaly-detection pipelines.
//!
//! This library turns a natural-language specification of an
//! anomaly-detection algorithm (name, documentation excerpt, dataset paths,
//! hyperparameters) into an executable Python analysis script, and repairs a
//! failing script from its runtime error message. Documentation retrieval,
//! algorithm selection, script execution and metric parsing live in external
//! collaborators; only their I/O contracts appear here.

pub mod agents;
pub mod cli;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod utils;

// Re-export commonly used types
pub use agents::{CodeArtifact, CoderAgent, CoderConfig, LibraryFamily, ScriptRequest};
pub use error::{AgentError, AgentResult, LlmError};
