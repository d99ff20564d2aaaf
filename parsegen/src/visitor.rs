//! Double dispatch from parse tree nodes to visitor methods.
//!
//! A grammar declares its visitor with the [`visitor!`](crate::visitor!)
//! macro, which produces a trait with one method per rule and implements
//! [`Dispatch`] for the rule enum. [`Node::accept`](crate::Node::accept) then
//! calls the method matching the node's rule. The generated `match` is
//! exhaustive, so leaving a rule out of the declaration fails to compile.
//!
//! ```
//! use parsegen::{visitor, Node, Parser, ParseFn, State, StateResult};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Rule {
//!     Number,
//!     Digit,
//! }
//!
//! visitor! {
//!     trait NumberVisitor for Rule {
//!         Number => visit_number,
//!         Digit => visit_digit,
//!     }
//! }
//!
//! fn number(state: State<Rule>) -> StateResult<Rule> {
//!     state.rule(Rule::Number, |s| s.repeat("1*".parse().unwrap(), digit))
//! }
//!
//! fn digit(state: State<Rule>) -> StateResult<Rule> {
//!     state.rule(Rule::Digit, |s| s.match_range('0', '9'))
//! }
//!
//! struct NumberParser;
//!
//! impl Parser<Rule> for NumberParser {
//!     fn rule_fn(rule: Rule) -> ParseFn<Rule> {
//!         match rule {
//!             Rule::Number => number,
//!             Rule::Digit => digit,
//!         }
//!     }
//! }
//!
//! struct Value;
//!
//! impl<'a> NumberVisitor<'a> for Value {
//!     type Output = u64;
//!
//!     fn visit_number(&mut self, node: &Node<'a, Rule>) -> u64 {
//!         node.children().iter().fold(0, |acc, d| acc * 10 + d.accept(self))
//!     }
//!
//!     fn visit_digit(&mut self, node: &Node<'a, Rule>) -> u64 {
//!         node.as_str().parse().unwrap()
//!     }
//! }
//!
//! let tree = NumberParser::parse(Rule::Number, "1024").unwrap();
//! assert_eq!(tree.accept(&mut Value), 1024);
//! ```

use crate::node::Node;
use crate::ParserRule;

/// Routes a node to the method of `V` handling the node's rule.
///
/// Implemented by the [`visitor!`](crate::visitor!) macro rather than by hand.
pub trait Dispatch<'a, V: ?Sized>: ParserRule {
    type Output;

    fn dispatch(node: &Node<'a, Self>, visitor: &mut V) -> Self::Output;
}

/// Declare a visitor trait for a rule enum.
///
/// Each `Variant => method` pair becomes a trait method taking the node for
/// that rule. The trait carries an `Output` type chosen by implementors. Only
/// one visitor trait may be declared per rule enum.
#[macro_export]
macro_rules! visitor {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident for $rule:ident {
            $( $variant:ident => $method:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis trait $name<'a> {
            type Output;

            $(
                fn $method(&mut self, node: &$crate::Node<'a, $rule>) -> Self::Output;
            )+
        }

        impl<'a, V> $crate::Dispatch<'a, V> for $rule
        where
            V: $name<'a> + ?Sized,
        {
            type Output = <V as $name<'a>>::Output;

            fn dispatch(node: &$crate::Node<'a, $rule>, visitor: &mut V) -> Self::Output {
                match node.rule() {
                    $( $rule::$variant => visitor.$method(node), )+
                }
            }
        }
    };
}
