use crate::error::{Error, Result};

/// Keep track of a position within a str, updating on successful operations.
///
/// The index is a byte offset and always sits on a character boundary. All
/// matching methods either advance past the match or leave the index alone.
#[derive(Debug, Clone)]
pub struct Position<'a> {
    input: &'a str,
    idx: usize,
}

impl<'a> Position<'a> {
    /// Create a new cursor, ensuring that `start` is within bounds.
    pub fn new(input: &'a str, start: usize) -> Result<Self> {
        if start <= input.len() && input.is_char_boundary(start) {
            Ok(Position { input, idx: start })
        } else {
            Err(Error::OutOfBounds {
                offset: start,
                len: input.len(),
            })
        }
    }

    pub(crate) fn start(input: &'a str) -> Self {
        Position { input, idx: 0 }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Remaining input after the cursor.
    pub fn rest(&self) -> &'a str {
        &self.input[self.idx..]
    }

    pub fn is_eof(&self) -> bool {
        self.idx == self.input.len()
    }

    /// Current offset, to be handed back to `restore` if an attempt fails.
    pub fn save(&self) -> usize {
        self.idx
    }

    /// Move back to a previously saved offset.
    pub fn restore(&mut self, offset: usize) {
        debug_assert!(offset <= self.input.len() && self.input.is_char_boundary(offset));
        self.idx = offset;
    }

    /// Check if a string matches the current input starting at the current
    /// index. The index will be updated on match.
    pub fn match_str(&mut self, s: &str) -> bool {
        let end = self.idx + s.len();
        if self.input.get(self.idx..end) == Some(s) {
            self.idx = end;
            true
        } else {
            false
        }
    }

    /// Like `match_str`, ignoring ASCII case.
    pub fn match_str_nocase(&mut self, s: &str) -> bool {
        let end = self.idx + s.len();
        match self.input.get(self.idx..end) {
            Some(found) if found.eq_ignore_ascii_case(s) => {
                self.idx = end;
                true
            }
            _ => false,
        }
    }

    /// Consume the next character if it satisfies `f`.
    pub fn match_char_if<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(char) -> bool,
    {
        match self.rest().chars().next() {
            Some(c) if f(c) => {
                self.idx += c.len_utf8();
                true
            }
            _ => false,
        }
    }
}
