//! Code extraction utilities for LLM responses.
//!
//! Chat models frequently wrap emitted source in markdown code fences,
//! with or without a language tag. [`strip_code_fences`] removes that
//! presentation markup and returns only the executable text.
//!
//! The function is pure and idempotent; it is tested in isolation so its
//! correctness is decoupled from model nondeterminism. Known limitation:
//! fence-like sequences inside string literals of the generated code are
//! stripped as well.
//!
//! # Example
//!
//! ```
//! use adforge::utils::strip_code_fences;
//!
//! let raw = "```python\nprint('hello')\n```";
//! assert_eq!(strip_code_fences(raw), "print('hello')");
//! ```

use std::sync::OnceLock;

use regex::Regex;

/// Matches an opening fence with an optional language tag, or a bare fence.
fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_+.#-]*").expect("valid fence regex"))
}

/// Strips every markdown code fence from `raw` and trims the result.
///
/// Every occurrence of ```` ``` ````, optionally followed by a language tag
/// (e.g. ```` ```python ````), is removed; no other substring is touched.
/// Trailing and leading whitespace is trimmed last, so
/// `strip_code_fences(strip_code_fences(s)) == strip_code_fences(s)`.
pub fn strip_code_fences(raw: &str) -> String {
    fence_regex().replace_all(raw, "").trim().to_string()
}
