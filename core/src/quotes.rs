//! Quote-pair alphabet recognised by the tokenizer.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Every recognised `(opening, closing)` quote pair.
///
/// Symmetric pairs (`"`, `'`, `⹂`, `＂`) open and close with the same
/// character.
pub const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('‘', '’'),
    ('‚', '‛'),
    ('“', '”'),
    ('„', '‟'),
    ('⹂', '⹂'),
    ('「', '」'),
    ('『', '』'),
    ('〝', '〞'),
    ('﹁', '﹂'),
    ('﹃', '﹄'),
    ('＂', '＂'),
    ('｢', '｣'),
    ('«', '»'),
    ('‹', '›'),
    ('《', '》'),
    ('〈', '〉'),
];

/// The apostrophe. Never opens a quote, so contractions like `don't` stay
/// one word.
pub const APOSTROPHE: char = '\'';

static CLOSING: LazyLock<HashMap<char, char>> =
    LazyLock::new(|| QUOTE_PAIRS.iter().copied().collect());

static ALL_QUOTES: LazyLock<HashSet<char>> = LazyLock::new(|| {
    QUOTE_PAIRS
        .iter()
        .flat_map(|&(open, close)| [open, close])
        .collect()
});

/// Returns the closing partner of `open`, or `None` if `open` is not an
/// opening quote.
///
/// # Examples
///
/// ```
/// use command_args_core::quotes::closing_quote;
///
/// assert_eq!(closing_quote('«'), Some('»'));
/// assert_eq!(closing_quote('"'), Some('"'));
/// assert_eq!(closing_quote('»'), None);
/// ```
pub fn closing_quote(open: char) -> Option<char> {
    CLOSING.get(&open).copied()
}

/// Returns `true` if `ch` opens or closes any quote pair.
pub fn is_quote(ch: char) -> bool {
    ALL_QUOTES.contains(&ch)
}
