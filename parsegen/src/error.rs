use thiserror::Error;

use crate::diagnostics::TraceEvent;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the parse entry points.
///
/// Failures inside a parse are ordinary `Err(state)` values and never show up
/// here. `NoMatch` and `TrailingInput` describe input that does not fit the
/// grammar; everything else is fatal and aborts the parse immediately.
#[derive(Debug, Error)]
pub enum Error {
    #[error("rule '{rule}' did not match, furthest offset reached: {furthest}")]
    NoMatch {
        rule: String,
        furthest: usize,
        /// Rules being attempted at `furthest`, outermost first. Only
        /// populated when tracing is enabled.
        stack: Vec<String>,
        /// Every rule entry and exit of the failed parse, when tracing is
        /// enabled.
        trace: Option<Vec<TraceEvent<String>>>,
    },
    #[error("rule '{rule}' consumed {consumed} of {len} bytes")]
    TrailingInput {
        rule: String,
        consumed: usize,
        len: usize,
    },
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("unknown rule '{0}'")]
    UnknownRule(String),
    #[error("recursion limit of {limit} exceeded at offset {offset}")]
    RecursionLimit { limit: usize, offset: usize },
    #[error("invalid ABNF notation '{notation}'")]
    Notation {
        notation: String,
        #[source]
        source: abnf::Error,
    },
    #[error("parse function for '{rule}' produced {count} root nodes")]
    RootCount { rule: String, count: usize },
    #[error("offset {offset} is out of bounds for input of length {len}")]
    OutOfBounds { offset: usize, len: usize },
}

impl Error {
    /// Fatal errors come from the grammar or the input encoding rather than
    /// from the input failing to match.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::NoMatch { .. } | Error::TrailingInput { .. })
    }
}
