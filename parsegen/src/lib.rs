//! Runtime for grammar-driven recursive descent parsers.
//!
//! Every grammar rule becomes a parse function taking a [`State`] by value
//! and returning a [`StateResult`]: `Ok` with the state advanced past the
//! match, or `Err` with the state as it was before the attempt. Rule bodies
//! are built from the primitives on `State`: terminals, `sequence`,
//! `choice`, `repeat`. Each successful rule adds one [`Node`] to the tree,
//! carrying the exact text it matched and the nodes of the rules it matched
//! inside.
//!
//! ```
//! use parsegen::{Parser, ParseFn, Repeat, State, StateResult};
//!
//! // tag = 1*9DIGIT
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Rule {
//!     Tag,
//!     Digit,
//! }
//!
//! fn tag(state: State<Rule>) -> StateResult<Rule> {
//!     state.rule(Rule::Tag, |s| s.repeat(Repeat::new(1, 9), digit))
//! }
//!
//! fn digit(state: State<Rule>) -> StateResult<Rule> {
//!     state.rule(Rule::Digit, |s| s.abnf("%x30-39"))
//! }
//!
//! struct TagParser;
//!
//! impl Parser<Rule> for TagParser {
//!     fn rule_fn(rule: Rule) -> ParseFn<Rule> {
//!         match rule {
//!             Rule::Tag => tag,
//!             Rule::Digit => digit,
//!         }
//!     }
//! }
//!
//! let node = TagParser::parse(Rule::Tag, "1234567890").unwrap();
//! assert_eq!(node.as_str(), "123456789");
//! assert_eq!(node.children().len(), 9);
//! assert!(TagParser::parse(Rule::Tag, "").is_err());
//! ```

use std::fmt::Debug;

mod config;
mod diagnostics;
mod error;
mod grammar;
mod node;
mod position;
mod span;
mod state;
mod terminal;
mod visitor;

pub use abnf::{Repeat, Terminal};
pub use config::{Config, DEFAULT_MAX_DEPTH};
pub use diagnostics::{Diagnostics, Frame, Furthest, TraceEvent};
pub use error::{Error, Result};
pub use grammar::{Grammar, Parsed};
pub use node::{DfsParseTreeIterator, Node};
pub use position::Position;
pub use span::{RelativeLocation, Span};
pub use state::{State, StateResult};
pub use terminal::{Class, NoCase, Pattern};
pub use visitor::Dispatch;

pub(crate) use grammar::run;

/// Tags identifying the rules of a grammar, usually a fieldless enum.
pub trait ParserRule: Copy + Debug + Eq {}

impl<T: Copy + Debug + Eq> ParserRule for T {}

/// A parse function for one rule.
pub type ParseFn<R> = for<'a> fn(State<'a, R>) -> StateResult<'a, R>;

/// Static dispatch from rule tags to parse functions.
pub trait Parser<R: ParserRule> {
    /// The parse function for `rule`.
    fn rule_fn(rule: R) -> ParseFn<R>;

    /// Parse a prefix of `input` with `rule`.
    fn parse(rule: R, input: &str) -> Result<Node<'_, R>> {
        Self::parse_with(rule, input, &Config::default()).map(Parsed::into_node)
    }

    fn parse_with<'a>(rule: R, input: &'a str, config: &Config) -> Result<Parsed<'a, R>> {
        run(&format!("{:?}", rule), Self::rule_fn(rule), input, config)
    }
}
