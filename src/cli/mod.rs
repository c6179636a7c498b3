//! Command-line interface for adforge.
//!
//! Provides `generate` and `revise` commands around the coder agent. The
//! CLI plays the orchestrating-caller role: it loads documentation and
//! artifact files, runs one agent operation, and writes results back.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
