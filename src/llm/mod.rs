//! LLM integration for adforge.
//!
//! This module provides the generation invoker: a client for
//! OpenAI-compatible chat-completions APIs, plus the [`LlmProvider`] trait
//! the coder agent is written against so tests can substitute a stub.
//!
//! The client is configured through an explicit [`ClientConfig`] passed into
//! its constructor; no global state is touched at load time.
//!
//! ```ignore
//! use adforge::llm::{ChatClient, ClientConfig, GenerationRequest, Message};
//!
//! let client = ChatClient::new(ClientConfig::from_env()?);
//! let request = GenerationRequest::new(
//!     "gpt-4o",
//!     vec![Message::system("You are an expert Python developer."),
//!          Message::user("Write a hello-world script.")],
//! )
//! .with_temperature(0.0);
//! let response = client.generate(request).await?;
//! ```

mod client;
mod config;

pub use client::{
    ChatClient, Choice, GenerationRequest, GenerationResponse, LlmProvider, Message, Usage,
};
pub use config::{ClientConfig, DEFAULT_MODEL};
