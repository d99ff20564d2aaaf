//! Terminal patterns. A terminal consumes exactly the matched text on success
//! and nothing otherwise, and never produces a node of its own.

use std::ops::RangeInclusive;

use abnf::{CharVal, NumVal, Terminal};

use crate::position::Position;

/// Something that can be matched at the cursor.
pub trait Pattern {
    /// Advance `pos` past a match and return true, or leave `pos` untouched
    /// and return false.
    fn match_at(&self, pos: &mut Position<'_>) -> bool;
}

/// Case-sensitive literal.
impl Pattern for str {
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        pos.match_str(self)
    }
}

impl Pattern for char {
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        pos.match_char_if(|c| c == *self)
    }
}

impl Pattern for RangeInclusive<char> {
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        pos.match_char_if(|c| self.contains(&c))
    }
}

/// Literal compared ignoring ASCII case.
#[derive(Debug, Clone, Copy)]
pub struct NoCase<'p>(pub &'p str);

impl<'p> Pattern for NoCase<'p> {
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        pos.match_str_nocase(self.0)
    }
}

/// A single character satisfying a predicate.
#[derive(Debug, Clone, Copy)]
pub struct Class<F>(pub F);

impl<F> Pattern for Class<F>
where
    F: Fn(char) -> bool,
{
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        pos.match_char_if(&self.0)
    }
}

impl Pattern for CharVal {
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        if self.case_sensitive {
            pos.match_str(&self.value)
        } else {
            pos.match_str_nocase(&self.value)
        }
    }
}

impl Pattern for NumVal {
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        match self {
            NumVal::Range { lo, hi, .. } => {
                pos.match_char_if(|c| (*lo..=*hi).contains(&(c as u32)))
            }
            NumVal::Sequence { values, .. } => {
                let start = pos.save();
                for v in values {
                    if !pos.match_char_if(|c| c as u32 == *v) {
                        pos.restore(start);
                        return false;
                    }
                }
                true
            }
        }
    }
}

impl Pattern for Terminal {
    fn match_at(&self, pos: &mut Position<'_>) -> bool {
        match self {
            Terminal::Num(v) => v.match_at(pos),
            Terminal::Char(v) => v.match_at(pos),
        }
    }
}
