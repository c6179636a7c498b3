//! Coder agent for anomaly-detection script generation and repair.
//!
//! The agent composes the prompt assembler, the generation invoker, and the
//! output sanitizer into two top-level operations:
//!
//! - [`CoderAgent::generate_script`] — request in, ready-to-run source out
//! - [`CoderAgent::revise_script`] — failed artifact + docs in, replacement
//!   source out, review counter incremented

mod coder;
mod types;

pub use coder::{CoderAgent, CoderConfig};
pub use types::{CodeArtifact, LibraryFamily, ScriptRequest};
