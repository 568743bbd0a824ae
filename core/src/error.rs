//! Error types for splitting and reading command arguments.
//!
//! Only two things can go wrong: a quote is opened and never closed, or a
//! recorded value cannot be coerced to the type a caller asked for.
//! Malformed flag syntax is never an error; it simply produces a flag whose
//! value is raw text or the `true` sentinel.

use thiserror::Error;

/// Errors produced by the tokenizer and the argument store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// Input ended while a quote was still open.
    ///
    /// `expected` is the closing character that was never found. It is
    /// `None` when the quote was opened by a closing-only character
    /// (e.g. `»`) in the middle of a word, which has no partner.
    #[error("expected closing quote {}", describe_quote(.expected))]
    UnterminatedQuote { expected: Option<char> },

    /// A recorded value could not be coerced by the caller's function.
    #[error("`{value}` cannot be interpreted for `{name}`: {reason}")]
    InvalidArgument {
        /// Flag whose value failed.
        name: String,
        /// The offending raw value.
        value: String,
        /// Message from the coercion function.
        reason: String,
    },
}

fn describe_quote(expected: &Option<char>) -> String {
    match expected {
        Some(close) => format!("`{close}`"),
        None => "(none matches the opening quote)".to_string(),
    }
}

/// Convenience alias for results with [`ArgsError`].
pub type Result<T> = std::result::Result<T, ArgsError>;
