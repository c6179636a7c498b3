//! Shared utility functions for adforge.

pub mod code_extraction;

pub use code_extraction::strip_code_fences;
