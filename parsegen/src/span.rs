use std::fmt;

/// Describes the location of a span relative to another span.
#[derive(Debug, PartialEq)]
pub enum RelativeLocation {
    Before,
    After,
    /// The span is completely contained inside the region of text, or both
    /// spans cover the same regions.
    Within,
    /// The span completely encompasses the other span.
    Encompasses,
}

/// A region over a string.
#[derive(Clone, Copy)]
pub struct Span<'a> {
    s: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Span<'a> {
    pub(crate) fn new(s: &'a str, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= s.len());
        Span { s, start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_str(&self) -> &'a str {
        &self.s[self.start..self.end]
    }

    fn same_input(&self, other: &Self) -> bool {
        std::ptr::eq(self.s, other.s)
    }

    /// Describes this span's location relative to `other`.
    ///
    /// Returns `None` if the spans reference different inputs or partially
    /// overlap.
    pub fn relative_location(&self, other: &Self) -> Option<RelativeLocation> {
        if !self.same_input(other) {
            return None;
        }

        if self.start <= other.start && self.end <= other.start {
            Some(RelativeLocation::Before)
        } else if self.start >= other.end {
            Some(RelativeLocation::After)
        } else if self.start >= other.start && self.end <= other.end {
            Some(RelativeLocation::Within)
        } else if self.start <= other.start && self.end >= other.end {
            Some(RelativeLocation::Encompasses)
        } else {
            None
        }
    }

    /// Check if this span contains the entirety of the other span. Spans over
    /// different inputs never contain each other.
    pub fn contains(&self, other: &Self) -> bool {
        self.same_input(other) && self.start <= other.start && self.end >= other.end
    }
}

/// Spans compare by the text they cover.
impl<'a> PartialEq for Span<'a> {
    fn eq(&self, other: &Span<'a>) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<'a> Eq for Span<'a> {}

impl<'a> fmt::Debug for Span<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{} {:?}", self.start, self.end, self.as_str())
    }
}
