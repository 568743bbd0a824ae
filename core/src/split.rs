//! Shell-like word splitting with quote and escape handling.
//!
//! Words are separated by whitespace. Any opening character from
//! [`QUOTE_PAIRS`](crate::quotes::QUOTE_PAIRS) except the apostrophe
//! starts a quoted run that may contain whitespace; the delimiters are never
//! part of the word. Inside a quoted run only the active pair can be
//! escaped with a backslash; outside, any quote character can be. A
//! backslash before anything else is kept literally.
//!
//! A closing quote only ends a word when whitespace or end of input
//! follows it. Otherwise scanning continues unquoted, so `foo"bar"baz` is
//! the single word `foobarbaz`.

use tracing::trace;

use crate::error::{ArgsError, Result};
use crate::quotes::{APOSTROPHE, closing_quote, is_quote};
use crate::view::StringView;

/// Scanning state for one word.
#[derive(Debug, Clone, Copy)]
enum Mode {
    Bare,
    Quoted { open: char, close: Option<char> },
}

impl Mode {
    fn quoted(open: char) -> Self {
        Mode::Quoted {
            open,
            close: closing_quote(open),
        }
    }

    /// Whether `ch` may follow a backslash to be taken literally.
    fn escapes(self, ch: char) -> bool {
        match self {
            Mode::Bare => is_quote(ch),
            Mode::Quoted { open, close } => ch == open || Some(ch) == close,
        }
    }
}

/// Reads the next word from `view`.
///
/// The caller is expected to skip whitespace between calls. Returns
/// `Ok(None)` when the view is already exhausted.
///
/// # Errors
///
/// Returns [`ArgsError::UnterminatedQuote`] if the input ends inside an
/// open quote.
///
/// # Examples
///
/// ```
/// use command_args_core::{StringView, next_word};
///
/// let mut view = StringView::new(r#""two words" rest"#);
/// assert_eq!(next_word(&mut view).unwrap().as_deref(), Some("two words"));
/// view.skip_ws();
/// assert_eq!(next_word(&mut view).unwrap().as_deref(), Some("rest"));
/// assert_eq!(next_word(&mut view).unwrap(), None);
/// ```
pub fn next_word(view: &mut StringView) -> Result<Option<String>> {
    let Some(first) = view.current() else {
        return Ok(None);
    };

    let mut word = String::new();
    let mut mode = if first != APOSTROPHE && closing_quote(first).is_some() {
        Mode::quoted(first)
    } else {
        word.push(first);
        Mode::Bare
    };

    loop {
        let Some(ch) = view.advance() else {
            return match mode {
                Mode::Quoted { close, .. } => Err(ArgsError::UnterminatedQuote { expected: close }),
                Mode::Bare => Ok(Some(word)),
            };
        };

        if ch == '\\' {
            match view.advance() {
                Some(next) if mode.escapes(next) => word.push(next),
                _ => {
                    view.step_back();
                    word.push(ch);
                }
            }
            continue;
        }

        match mode {
            Mode::Bare if ch != APOSTROPHE && is_quote(ch) => {
                mode = Mode::quoted(ch);
                continue;
            }
            Mode::Quoted {
                close: Some(close), ..
            } if ch == close => match view.advance() {
                None => return Ok(Some(word)),
                Some(next) if next.is_whitespace() => return Ok(Some(word)),
                Some(_) => {
                    // Not a real terminator; keep reading this word unquoted.
                    view.step_back();
                    mode = Mode::Bare;
                    continue;
                }
            },
            Mode::Bare if ch.is_whitespace() => return Ok(Some(word)),
            _ => {}
        }

        word.push(ch);
    }
}

/// Splits `input` into words.
///
/// Leading and trailing whitespace is ignored; empty input yields no words.
///
/// # Errors
///
/// Returns [`ArgsError::UnterminatedQuote`] if a quote is never closed.
///
/// # Examples
///
/// ```
/// use command_args_core::split;
///
/// let words = split(r#"-name "Bob \"The Bold\"" -level 5"#).unwrap();
/// assert_eq!(words, vec!["-name", "Bob \"The Bold\"", "-level", "5"]);
/// ```
pub fn split(input: &str) -> Result<Vec<String>> {
    let mut view = StringView::new(input.trim());
    let mut words = Vec::new();
    while !view.at_end() {
        view.skip_ws();
        let Some(word) = next_word(&mut view)? else {
            break;
        };
        trace!(word = %word, "Split word");
        words.push(word);
    }
    Ok(words)
}

/// Quotes a single word so that [`split`] reads it back unchanged.
///
/// Words that are empty, contain whitespace or a quote character (other
/// than the apostrophe), or contain `\'` are wrapped in double quotes with
/// every `"` escaped. Trailing backslashes are kept outside the closing
/// quote, where they cannot escape it. Other words are returned as-is.
///
/// # Examples
///
/// ```
/// use command_args_core::quote;
///
/// assert_eq!(quote("plain"), "plain");
/// assert_eq!(quote("don't"), "don't");
/// assert_eq!(quote(""), r#""""#);
/// assert_eq!(quote(r#"say "hi" now"#), r#""say \"hi\" now""#);
/// ```
pub fn quote(word: &str) -> String {
    if !needs_quoting(word) {
        return word.to_string();
    }
    let body = word.trim_end_matches('\\');
    let tail = &word[body.len()..];
    format!("\"{}\"{tail}", body.replace('"', "\\\""))
}

fn needs_quoting(word: &str) -> bool {
    word.is_empty()
        || word.contains("\\'")
        || word
            .chars()
            .any(|ch| ch.is_whitespace() || (ch != APOSTROPHE && is_quote(ch)))
}

/// Quotes each word with [`quote`] and joins them with single spaces.
pub fn join_quoted<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
