use std::collections::HashMap;
use std::fmt;
use std::str;

use abnf::RuleName;
use log::debug;

use crate::config::Config;
use crate::diagnostics::TraceEvent;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::state::{Finished, State};
use crate::{ParseFn, ParserRule};

/// A successful parse.
#[derive(Debug)]
pub struct Parsed<'a, R: ParserRule> {
    node: Node<'a, R>,
    input_len: usize,
    trace: Option<Vec<TraceEvent<R>>>,
}

impl<'a, R: ParserRule> Parsed<'a, R> {
    pub fn node(&self) -> &Node<'a, R> {
        &self.node
    }

    pub fn into_node(self) -> Node<'a, R> {
        self.node
    }

    /// Bytes of input consumed by the root rule.
    pub fn consumed(&self) -> usize {
        self.node.end()
    }

    /// Whether the root rule consumed the entire input.
    pub fn is_complete(&self) -> bool {
        self.consumed() == self.input_len
    }

    /// Rule entries and exits in the order they happened, if tracing was
    /// enabled.
    pub fn trace(&self) -> Option<&[TraceEvent<R>]> {
        self.trace.as_deref()
    }
}

/// Run a root parse function over `input`. `name` is only used for error
/// reporting.
pub(crate) fn run<'a, R: ParserRule>(
    name: &str,
    f: ParseFn<R>,
    input: &'a str,
    config: &Config,
) -> Result<Parsed<'a, R>> {
    debug!("parsing {} byte(s) with rule '{}'", input.len(), name);

    let (state, matched) = match f(State::with_config(input, config)) {
        Ok(state) => (state, true),
        Err(state) => (state, false),
    };
    let Finished {
        mut nodes,
        diagnostics,
        abort,
    } = state.finish();

    if let Some(err) = abort {
        return Err(err);
    }

    let (trace, furthest) = diagnostics.into_parts();
    if !matched {
        let (furthest, stack) = match furthest {
            Some(f) => (f.offset, f.stack.iter().map(|r| format!("{:?}", r)).collect()),
            None => (0, Vec::new()),
        };
        debug!("rule '{}' did not match, furthest offset {}", name, furthest);
        let trace = trace.map(|events| {
            events
                .into_iter()
                .map(|e| e.map_rule(|r| format!("{:?}", r)))
                .collect()
        });
        return Err(Error::NoMatch {
            rule: name.to_owned(),
            furthest,
            stack,
            trace,
        });
    }

    if nodes.len() != 1 {
        return Err(Error::RootCount {
            rule: name.to_owned(),
            count: nodes.len(),
        });
    }
    match nodes.pop() {
        Some(node) => {
            debug!("rule '{}' matched {} byte(s)", name, node.end());
            Ok(Parsed {
                node,
                input_len: input.len(),
                trace,
            })
        }
        None => Err(Error::RootCount {
            rule: name.to_owned(),
            count: 0,
        }),
    }
}

/// Parse functions registered by rule name.
///
/// Names follow ABNF rules and are matched without regard to case. Build
/// the registry once and share it; it is read-only while parsing.
pub struct Grammar<R: ParserRule> {
    rules: HashMap<RuleName, ParseFn<R>>,
}

impl<R: ParserRule> Grammar<R> {
    pub fn new() -> Self {
        Grammar {
            rules: HashMap::new(),
        }
    }

    /// Register `f` under `name`, replacing any previous registration.
    pub fn insert(&mut self, name: &str, f: ParseFn<R>) -> Result<()> {
        let key = name.parse::<RuleName>().map_err(|source| Error::Notation {
            notation: name.to_owned(),
            source,
        })?;
        self.rules.insert(key, f);
        Ok(())
    }

    /// Builder form of `insert`.
    pub fn with_rule(mut self, name: &str, f: ParseFn<R>) -> Result<Self> {
        self.insert(name, f)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    pub fn get(&self, name: &str) -> Result<ParseFn<R>> {
        name.parse::<RuleName>()
            .ok()
            .and_then(|key| self.rules.get(&key).copied())
            .ok_or_else(|| Error::UnknownRule(name.to_owned()))
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(RuleName::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse a prefix of `input` with the rule registered as `name`. Use
    /// `Node::end` to find out how much was consumed.
    pub fn parse<'a>(&self, name: &str, input: &'a str) -> Result<Node<'a, R>> {
        self.parse_with(name, input, &Config::default())
            .map(Parsed::into_node)
    }

    pub fn parse_with<'a>(
        &self,
        name: &str,
        input: &'a str,
        config: &Config,
    ) -> Result<Parsed<'a, R>> {
        let f = self.get(name)?;
        run(name, f, input, config)
    }

    /// Like `parse`, but the input must be entirely consumed.
    pub fn parse_complete<'a>(&self, name: &str, input: &'a str) -> Result<Node<'a, R>> {
        let parsed = self.parse_with(name, input, &Config::default())?;
        if parsed.is_complete() {
            Ok(parsed.into_node())
        } else {
            Err(Error::TrailingInput {
                rule: name.to_owned(),
                consumed: parsed.consumed(),
                len: input.len(),
            })
        }
    }

    /// Parse raw bytes, which must be valid UTF-8.
    pub fn parse_bytes<'a>(&self, name: &str, input: &'a [u8]) -> Result<Node<'a, R>> {
        let input = str::from_utf8(input)?;
        self.parse(name, input)
    }
}

impl<R: ParserRule> Default for Grammar<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ParserRule> fmt::Debug for Grammar<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StateResult;

    #[derive(Copy, Debug, Eq, Clone, PartialEq)]
    enum Rule {
        Greeting,
        Name,
    }

    fn greeting(state: State<Rule>) -> StateResult<Rule> {
        state.rule(Rule::Greeting, |s| {
            s.match_str_nocase("hello ").and_then(name)
        })
    }

    fn name(state: State<Rule>) -> StateResult<Rule> {
        state.rule(Rule::Name, |s| {
            s.repeat("1*".parse().unwrap(), |s| s.match_class(char::is_alphabetic))
        })
    }

    fn not_a_rule(state: State<Rule>) -> StateResult<Rule> {
        state.match_str("x")
    }

    fn grammar() -> Grammar<Rule> {
        Grammar::new()
            .with_rule("greeting", greeting)
            .and_then(|g| g.with_rule("name", name))
            .and_then(|g| g.with_rule("not-a-rule", not_a_rule))
            .unwrap()
    }

    #[test]
    fn lookup_ignores_case() {
        let g = grammar();
        assert_eq!(g.len(), 3);
        assert!(g.contains("Greeting"));
        assert!(g.contains("NAME"));
        assert!(!g.contains("farewell"));
        assert!(!g.contains("not a name"));
    }

    #[test]
    fn invalid_names_rejected() {
        let mut g = Grammar::new();
        let err = g.insert("2fast", greeting).unwrap_err();
        assert!(matches!(err, Error::Notation { .. }));
        assert!(g.is_empty());
    }

    #[test]
    fn parse_by_name() {
        let g = grammar();
        let node = g.parse("greeting", "Hello World!").unwrap();
        assert_eq!(node.as_str(), "Hello World");
        assert_eq!(node.end(), 11);
        assert_eq!(node.child(Rule::Name).unwrap().as_str(), "World");
    }

    #[test]
    fn unknown_rule_is_fatal() {
        let err = grammar().parse("farewell", "bye").unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, Error::UnknownRule(ref n) if n == "farewell"));
    }

    #[test]
    fn no_match_reports_furthest_offset() {
        let g = grammar();
        let err = g.parse("greeting", "hello 42").unwrap_err();
        assert!(!err.is_fatal());
        match err {
            Error::NoMatch {
                rule,
                furthest,
                stack,
                trace,
            } => {
                assert_eq!(rule, "greeting");
                assert_eq!(furthest, 6);
                assert!(stack.is_empty());
                assert!(trace.is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }

        let config = Config::default().with_trace(true);
        match g.parse_with("greeting", "hello 42", &config).unwrap_err() {
            Error::NoMatch { stack, .. } => assert_eq!(stack, vec!["Greeting", "Name"]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn failed_parse_keeps_trace() {
        let config = Config::default().with_trace(true);
        let err = grammar()
            .parse_with("greeting", "hello 42", &config)
            .unwrap_err();
        let trace = match err {
            Error::NoMatch {
                trace: Some(trace), ..
            } => trace,
            other => panic!("unexpected: {:?}", other),
        };
        let greeting = "Greeting".to_owned();
        assert_eq!(
            trace,
            vec![
                TraceEvent::Enter {
                    rule: greeting.clone(),
                    start: 0
                },
                TraceEvent::Enter {
                    rule: "Name".to_owned(),
                    start: 6
                },
                TraceEvent::Exit {
                    rule: "Name".to_owned(),
                    start: 6,
                    end: 6,
                    matched: false
                },
                TraceEvent::Exit {
                    rule: greeting,
                    start: 0,
                    end: 0,
                    matched: false
                },
            ]
        );
    }

    #[test]
    fn complete_input_policy() {
        let g = grammar();
        assert!(g.parse_complete("greeting", "hello you").is_ok());
        let err = g.parse_complete("greeting", "hello you!").unwrap_err();
        assert!(matches!(
            err,
            Error::TrailingInput {
                consumed: 9,
                len: 10,
                ..
            }
        ));
    }

    #[test]
    fn bytes_must_be_utf8() {
        let g = grammar();
        assert!(g.parse_bytes("greeting", b"hello you").is_ok());
        let err = g.parse_bytes("greeting", b"hello \xff").unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn non_rule_function_is_fatal() {
        let err = grammar().parse("not-a-rule", "x").unwrap_err();
        assert!(matches!(err, Error::RootCount { count: 0, .. }));
    }

    #[test]
    fn trace_is_returned() {
        let config = Config::default().with_trace(true);
        let parsed = grammar()
            .parse_with("greeting", "hello bob", &config)
            .unwrap();
        assert!(parsed.is_complete());
        let trace = parsed.trace().unwrap();
        assert_eq!(trace.len(), 4);
        assert_eq!(
            trace[0],
            TraceEvent::Enter {
                rule: Rule::Greeting,
                start: 0
            }
        );
        assert_eq!(
            trace[3],
            TraceEvent::Exit {
                rule: Rule::Greeting,
                start: 0,
                end: 9,
                matched: true
            }
        );
    }
}
