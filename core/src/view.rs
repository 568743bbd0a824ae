//! Character cursor with one step of rollback.

/// A cursor over the characters of an input string.
///
/// [`advance`](StringView::advance) remembers where it came from, so a
/// single [`step_back`](StringView::step_back) undoes one character of
/// lookahead. That is all the tokenizer needs to peek past a closing quote
/// or a backslash and change its mind.
///
/// # Examples
///
/// ```
/// use command_args_core::StringView;
///
/// let mut view = StringView::new("ab");
/// assert_eq!(view.current(), Some('a'));
/// assert_eq!(view.advance(), Some('b'));
/// assert_eq!(view.advance(), None);
/// view.step_back();
/// assert_eq!(view.current(), Some('b'));
/// ```
#[derive(Debug, Clone)]
pub struct StringView {
    chars: Vec<char>,
    index: usize,
    previous: usize,
}

impl StringView {
    /// Creates a cursor positioned on the first character of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
            previous: 0,
        }
    }

    /// Returns the character under the cursor without moving.
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// Moves one character forward and returns the new current character.
    ///
    /// The cursor keeps moving past the end, returning `None`, so that a
    /// following [`step_back`](Self::step_back) always lands where it
    /// started.
    pub fn advance(&mut self) -> Option<char> {
        self.previous = self.index;
        self.index += 1;
        self.current()
    }

    /// Returns to the position held before the last [`advance`](Self::advance).
    pub fn step_back(&mut self) {
        self.index = self.previous;
    }

    /// Returns `true` once the cursor is at or past the end of input.
    pub fn at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Advances past whitespace. Returns `true` if anything was skipped.
    pub fn skip_ws(&mut self) -> bool {
        let start = self.index;
        while self.current().is_some_and(char::is_whitespace) {
            self.index += 1;
        }
        self.previous = self.index;
        self.index != start
    }
}
