//! Sensitive-data masking.
//!
//! Two entry points, both infallible:
//!
//! - [`mask_object`] sanitizes arbitrary JSON metadata recursively, with a
//!   hard depth cap and an identity-based cycle guard.
//! - [`mask_text`] scrubs known secret shapes (bearer tokens, `key=value`
//!   credential fragments, email addresses) out of free-form text such as
//!   alert titles and messages.
//!
//! Masking is lossy on purpose: the original values are not recoverable from
//! the output, and the `full` strategy caps its output length so the input
//! length cannot be inferred either.

mod object;
mod text;

pub use object::mask_object;
pub use text::mask_text;

use serde::{Deserialize, Serialize};

/// Maximum number of mask characters emitted by the `full` strategy.
const FULL_MASK_CAP: usize = 20;

/// Algorithm used to obscure a sensitive string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStrategy {
    /// Replace the whole value with mask characters, capped at 20.
    Full,
    /// Keep the first and last `visible_chars` characters, mask the middle.
    Partial,
    /// Replace the value with a short deterministic tag so two identical
    /// secrets remain recognizable as equal. Not a security-grade hash.
    Hash,
}

/// Masking configuration shared by the object and text sanitizers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Strategy applied to sensitive string values.
    #[serde(default = "default_strategy")]
    pub strategy: MaskStrategy,
    /// Characters kept at each end under the `partial` strategy.
    #[serde(default = "default_visible_chars")]
    pub visible_chars: usize,
    /// Character used for masked output.
    #[serde(default = "default_mask_char")]
    pub mask_char: char,
}

fn default_strategy() -> MaskStrategy {
    MaskStrategy::Partial
}

fn default_visible_chars() -> usize {
    4
}

fn default_mask_char() -> char {
    '*'
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            visible_chars: default_visible_chars(),
            mask_char: default_mask_char(),
        }
    }
}

/// Substrings that mark a key name as sensitive, matched case-insensitively.
const SENSITIVE_KEY_PATTERNS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "token",
    "apikey",
    "api_key",
    "secret",
    "ssn",
    "email",
    "connectionstring",
    "connection_string",
    "clientsecret",
    "client_secret",
    "authorization",
    "credential",
    "creditcard",
    "credit_card",
    "privatekey",
    "private_key",
];

/// Returns `true` if the key name matches any sensitive-field pattern.
#[must_use]
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEY_PATTERNS.iter().any(|pattern| key.contains(pattern))
}

/// Masks a single sensitive string value according to the configured
/// strategy.
#[must_use]
pub fn mask_value(value: &str, config: &MaskingConfig) -> String {
    match config.strategy {
        MaskStrategy::Full => {
            let len = value.chars().count().min(FULL_MASK_CAP);
            std::iter::repeat(config.mask_char).take(len).collect()
        }
        MaskStrategy::Partial => {
            let chars: Vec<char> = value.chars().collect();
            if chars.len() <= 2 * config.visible_chars {
                return std::iter::repeat(config.mask_char).take(chars.len()).collect();
            }
            let head: String = chars[..config.visible_chars].iter().collect();
            let tail: String = chars[chars.len() - config.visible_chars..].iter().collect();
            let middle: String = std::iter::repeat(config.mask_char)
                .take(chars.len() - 2 * config.visible_chars)
                .collect();
            format!("{head}{middle}{tail}")
        }
        MaskStrategy::Hash => format!("[hash:{:08x}]", rolling_hash(value)),
    }
}

/// Rolling polynomial accumulator over the string's characters.
fn rolling_hash(value: &str) -> u32 {
    value
        .chars()
        .fold(0u32, |acc, c| acc.wrapping_mul(31).wrapping_add(c as u32))
}
