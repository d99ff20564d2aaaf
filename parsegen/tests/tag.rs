//! The bounded digit rule from SDP, `tag = 1*9DIGIT`, and the engine
//! behaviors it exercises.

use std::thread;

use parsegen::{
    Config, Error, Grammar, ParseFn, Parser, Repeat, State, StateResult, TraceEvent,
};

#[derive(Copy, Debug, Eq, Clone, PartialEq)]
enum Rule {
    /// tag = 1*9DIGIT
    Tag,
    /// DIGIT = %x30-39
    Digit,
    /// short = "12"
    Short,
    /// pick = short / tag
    Pick,
}

fn tag(state: State<Rule>) -> StateResult<Rule> {
    state.rule(Rule::Tag, |s| s.repeat(Repeat::new(1, 9), digit))
}

fn digit(state: State<Rule>) -> StateResult<Rule> {
    state.rule(Rule::Digit, |s| s.abnf("%x30-39"))
}

fn short(state: State<Rule>) -> StateResult<Rule> {
    state.rule(Rule::Short, |s| s.match_str("12"))
}

fn pick(state: State<Rule>) -> StateResult<Rule> {
    state.rule(Rule::Pick, |s| s.choice(&[short as fn(_) -> _, tag as fn(_) -> _]))
}

struct TagParser;

impl Parser<Rule> for TagParser {
    fn rule_fn(rule: Rule) -> ParseFn<Rule> {
        match rule {
            Rule::Tag => tag,
            Rule::Digit => digit,
            Rule::Short => short,
            Rule::Pick => pick,
        }
    }
}

fn grammar() -> Grammar<Rule> {
    let mut g = Grammar::new();
    g.insert("tag", tag).unwrap();
    g.insert("DIGIT", digit).unwrap();
    g.insert("pick", pick).unwrap();
    g
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn five_digits() {
    init_logger();
    let node = TagParser::parse(Rule::Tag, "12345").unwrap();
    assert_eq!(node.as_str(), "12345");
    assert_eq!(node.end(), 5);
    assert_eq!(node.children().len(), 5);
    for (child, expected) in node.children().iter().zip("12345".chars()) {
        assert_eq!(child.rule(), Rule::Digit);
        assert_eq!(child.as_str(), expected.to_string());
    }
}

#[test]
fn empty_input() {
    let err = TagParser::parse(Rule::Tag, "").unwrap_err();
    assert!(matches!(err, Error::NoMatch { furthest: 0, .. }));

    let state = tag(State::new("")).unwrap_err();
    assert_eq!(state.offset(), 0);
    assert!(state.nodes().is_empty());
}

#[test]
fn stops_at_nine_digits() {
    let parsed = TagParser::parse_with(Rule::Tag, "1234567890", &Config::default()).unwrap();
    assert_eq!(parsed.node().as_str(), "123456789");
    assert_eq!(parsed.consumed(), 9);
    assert!(!parsed.is_complete());
    assert_eq!(parsed.node().children().len(), 9);

    let err = grammar().parse_complete("tag", "1234567890").unwrap_err();
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
fn failure_at_offset_has_no_effect() {
    let config = Config::default();
    for offset in 0..=4 {
        let state = State::at("ab12x", offset, &config).unwrap();
        match tag(state) {
            Ok(state) => {
                assert!(offset == 2 || offset == 3);
                assert_eq!(state.offset(), 4);
                assert_eq!(state.nodes()[0].as_str(), &"ab12x"[offset..4]);
            }
            Err(state) => {
                assert_eq!(state.offset(), offset);
                assert!(state.nodes().is_empty());
            }
        }
    }
}

#[test]
fn first_alternative_wins() {
    let config = Config::default().with_trace(true);
    let parsed = TagParser::parse_with(Rule::Pick, "12345", &config).unwrap();

    assert_eq!(parsed.node().as_str(), "12");
    assert_eq!(parsed.node().children()[0].rule(), Rule::Short);

    // tag also matches here, but is never attempted.
    let trace = parsed.trace().unwrap();
    assert!(trace
        .iter()
        .all(|e| !matches!(e, TraceEvent::Enter { rule: Rule::Tag, .. })));
}

#[test]
fn later_alternative_after_failure() {
    let node = TagParser::parse(Rule::Pick, "345").unwrap();
    assert_eq!(node.as_str(), "345");
    assert_eq!(node.children()[0].rule(), Rule::Tag);
}

#[test]
fn trace_is_balanced() {
    let config = Config::default().with_trace(true);
    let parsed = TagParser::parse_with(Rule::Pick, "3x", &config).unwrap();
    let trace = parsed.trace().unwrap();

    let mut depth = 0i32;
    for event in trace {
        match event {
            TraceEvent::Enter { .. } => depth += 1,
            TraceEvent::Exit { start, end, matched, .. } => {
                depth -= 1;
                if !matched {
                    assert_eq!(start, end);
                }
            }
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);

    // pick, short (fails), tag, digit "3", digit (fails at "x").
    let failed: Vec<Rule> = trace
        .iter()
        .filter_map(|e| match e {
            TraceEvent::Exit {
                rule,
                matched: false,
                ..
            } => Some(*rule),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec![Rule::Short, Rule::Digit]);
}

#[test]
fn reparse_is_identical() {
    let input = "98765";
    let first = TagParser::parse(Rule::Tag, input).unwrap();
    let second = TagParser::parse(Rule::Tag, input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn dispatch_by_name() {
    let g = grammar();
    assert_eq!(g.parse("TAG", "42").unwrap().as_str(), "42");
    assert_eq!(g.parse("digit", "42").unwrap().as_str(), "4");
    assert!(matches!(g.parse("short", "12"), Err(Error::UnknownRule(_))));
}

#[test]
fn parallel_parses_share_grammar() {
    let g = grammar();
    let inputs = ["1", "22", "333", "4444", "55555", "x"];

    thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let g = &g;
                scope.spawn(move || g.parse("tag", input).map(|n| n.end()).ok())
            })
            .collect();
        let consumed: Vec<Option<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            consumed,
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), None]
        );
    });
}

#[test]
fn tree_readable_from_many_threads() {
    let node = TagParser::parse(Rule::Tag, "314159").unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let digits: String = node.iter().skip(1).map(|n| n.as_str()).collect();
                assert_eq!(digits, "314159");
            });
        }
    });
}
