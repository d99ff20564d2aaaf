use std::mem;

use abnf::{Repeat, Terminal};
use log::debug;

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::position::Position;
use crate::span::Span;
use crate::terminal::{Class, NoCase, Pattern};
use crate::ParserRule;

/// Outcome of applying a grammar element. `Ok` carries the advanced state,
/// `Err` carries the state exactly as it was before the attempt.
pub type StateResult<'a, R> = std::result::Result<State<'a, R>, State<'a, R>>;

/// Parser state, threaded by value through parse functions.
///
/// Every method either succeeds, possibly consuming input and adding nodes,
/// or fails with no net effect on the cursor or on the nodes collected so
/// far. A bare `and_then` chain is not covered by this: wrap it in `rule` or
/// `sequence` to undo the elements that matched before the failing one.
#[derive(Debug)]
pub struct State<'a, R: ParserRule> {
    cursor: Position<'a>,
    /// Nodes matched so far by the innermost rule being attempted.
    children: Vec<Node<'a, R>>,
    max_depth: usize,
    /// Boxed so that a `State` stays small; it is moved through several
    /// frames for every rule level.
    context: Box<Context<R>>,
}

/// Bookkeeping that never influences what matches.
#[derive(Debug)]
struct Context<R> {
    diagnostics: Diagnostics<R>,
    /// Set by a fatal error. Once set every primitive fails immediately.
    abort: Option<Error>,
}

/// What is left of a state once the root parse function returns.
pub(crate) struct Finished<'a, R: ParserRule> {
    pub nodes: Vec<Node<'a, R>>,
    pub diagnostics: Diagnostics<R>,
    pub abort: Option<Error>,
}

impl<'a, R: ParserRule> State<'a, R> {
    /// State positioned at the start of `input`, with default configuration.
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, &Config::default())
    }

    pub fn with_config(input: &'a str, config: &Config) -> Self {
        State {
            cursor: Position::start(input),
            children: Vec::new(),
            max_depth: config.max_depth,
            context: Box::new(Context {
                diagnostics: Diagnostics::new(config.trace),
                abort: None,
            }),
        }
    }

    /// State positioned at `offset` within `input`.
    pub fn at(input: &'a str, offset: usize, config: &Config) -> Result<Self> {
        let mut state = Self::with_config(input, config);
        state.cursor = Position::new(input, offset)?;
        Ok(state)
    }

    pub fn offset(&self) -> usize {
        self.cursor.save()
    }

    pub fn position(&self) -> &Position<'a> {
        &self.cursor
    }

    /// Nodes matched so far by the rule currently being attempted.
    pub fn nodes(&self) -> &[Node<'a, R>] {
        &self.children
    }

    pub fn diagnostics(&self) -> &Diagnostics<R> {
        &self.context.diagnostics
    }

    pub fn is_aborted(&self) -> bool {
        self.context.abort.is_some()
    }

    /// Abort the whole parse. The first fatal error wins.
    pub fn abort(mut self, err: Error) -> StateResult<'a, R> {
        debug!("aborting parse at offset {}: {}", self.offset(), err);
        if self.context.abort.is_none() {
            self.context.abort = Some(err);
        }
        Err(self)
    }

    pub(crate) fn finish(self) -> Finished<'a, R> {
        let Context { diagnostics, abort } = *self.context;
        Finished {
            nodes: self.children,
            diagnostics,
            abort,
        }
    }

    fn rollback(&mut self, offset: usize, mark: usize) {
        self.cursor.restore(offset);
        self.children.truncate(mark);
    }

    /// Match a named rule using the provided function, producing a node for
    /// `rule` that spans everything `f` consumed and holds the nodes `f`
    /// produced.
    ///
    /// On failure the cursor goes back to where the rule started and the
    /// nodes `f` produced are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use parsegen::{State, StateResult};
    ///
    /// #[derive(Copy, Debug, Eq, Clone, PartialEq)]
    /// enum Rule {
    ///     A,
    ///     B,
    ///     Ab,
    ///     Ababa,
    /// }
    ///
    /// fn a(state: State<Rule>) -> StateResult<Rule> {
    ///     state.rule(Rule::A, |s| s.match_str("a"))
    /// }
    /// fn b(state: State<Rule>) -> StateResult<Rule> {
    ///     state.rule(Rule::B, |s| s.match_str("b"))
    /// }
    /// fn ab(state: State<Rule>) -> StateResult<Rule> {
    ///     state.rule(Rule::Ab, |s| a(s).and_then(b))
    /// }
    /// fn ababa(state: State<Rule>) -> StateResult<Rule> {
    ///     state.rule(Rule::Ababa, |s| ab(s).and_then(ab).and_then(a))
    /// }
    ///
    /// let state = ababa(State::new("ababa")).unwrap();
    /// let root = &state.nodes()[0];
    /// assert_eq!(root.rule(), Rule::Ababa);
    /// assert_eq!(root.iter().count(), 8);
    /// let kids: Vec<Rule> = root.children().iter().map(|n| n.rule()).collect();
    /// assert_eq!(kids, vec![Rule::Ab, Rule::Ab, Rule::A]);
    /// ```
    pub fn rule<F>(mut self, rule: R, f: F) -> StateResult<'a, R>
    where
        F: FnOnce(Self) -> StateResult<'a, R>,
    {
        if self.is_aborted() {
            return Err(self);
        }

        let start = self.cursor.save();
        if self.context.diagnostics.depth() >= self.max_depth {
            let limit = self.max_depth;
            return self.abort(Error::RecursionLimit {
                limit,
                offset: start,
            });
        }

        let siblings = mem::take(&mut self.children);
        self.context.diagnostics.push(rule, start);

        match f(self) {
            Ok(mut state) if !state.is_aborted() => {
                let end = state.cursor.save();
                let children = mem::replace(&mut state.children, siblings);
                state.context.diagnostics.pop(rule, end, true);
                let span = Span::new(state.cursor.input(), start, end);
                state.children.push(Node::new(rule, span, children));
                Ok(state)
            }
            Ok(mut state) | Err(mut state) => {
                state.cursor.restore(start);
                state.children = siblings;
                state.context.diagnostics.pop(rule, start, false);
                Err(state)
            }
        }
    }

    /// Apply a function to state, returning the result verbatim.
    pub fn apply<F>(self, f: F) -> StateResult<'a, R>
    where
        F: FnOnce(Self) -> StateResult<'a, R>,
    {
        f(self)
    }

    /// Run a chain of elements as one unit. If anything in the chain fails,
    /// the state is restored to where the sequence started, not merely to
    /// where the failing element started.
    pub fn sequence<F>(self, f: F) -> StateResult<'a, R>
    where
        F: FnOnce(Self) -> StateResult<'a, R>,
    {
        let start = self.cursor.save();
        let mark = self.children.len();
        f(self).map_err(|mut state| {
            state.rollback(start, mark);
            state
        })
    }

    /// Ordered choice. Alternatives are tried in order from the same starting
    /// point and the first one to match wins; later alternatives are not
    /// attempted.
    pub fn choice(self, alternatives: &[fn(Self) -> StateResult<'a, R>]) -> StateResult<'a, R> {
        let mut state = self;
        for alternative in alternatives {
            if state.is_aborted() {
                break;
            }
            match state.sequence(alternative) {
                Ok(matched) => return Ok(matched),
                Err(unchanged) => state = unchanged,
            }
        }
        Err(state)
    }

    /// Greedily apply `f` between `bounds.min` and `bounds.max` times.
    ///
    /// Occurrences are attempted one at a time until one fails or the maximum
    /// is reached. Succeeds if at least the minimum matched. A successful
    /// repetition is never revisited to try fewer occurrences, even if that
    /// would let an enclosing rule match.
    ///
    /// An unbounded repetition stops after an occurrence that matched without
    /// consuming anything, once the minimum is met.
    ///
    /// Bounds with `min` above `max` abort the parse.
    pub fn repeat<F>(self, bounds: Repeat, f: F) -> StateResult<'a, R>
    where
        F: Fn(Self) -> StateResult<'a, R>,
    {
        if let Err(source) = bounds.validate() {
            return self.abort(Error::Notation {
                notation: bounds.to_string(),
                source,
            });
        }

        let start = self.cursor.save();
        let mark = self.children.len();
        let mut state = self;
        let mut count = 0;

        while bounds.max.map_or(true, |max| count < max) && !state.is_aborted() {
            let before = state.cursor.save();
            match state.sequence(&f) {
                Ok(next) => {
                    state = next;
                    count += 1;
                    let empty = state.cursor.save() == before;
                    if bounds.max.is_none() && count >= bounds.min && empty {
                        break;
                    }
                }
                Err(unchanged) => {
                    state = unchanged;
                    break;
                }
            }
        }

        if count >= bounds.min && !state.is_aborted() {
            Ok(state)
        } else {
            state.rollback(start, mark);
            Err(state)
        }
    }

    /// Repeatedly applies some func to state until the first failure. Zero
    /// matches is a success.
    pub fn many<F>(self, f: F) -> StateResult<'a, R>
    where
        F: Fn(Self) -> StateResult<'a, R>,
    {
        self.repeat(Repeat::any(), f)
    }

    /// Attempt to apply some func to state, succeeding whether or not it
    /// matched.
    pub fn optional<F>(self, f: F) -> StateResult<'a, R>
    where
        F: Fn(Self) -> StateResult<'a, R>,
    {
        self.repeat(Repeat::optional(), f)
    }

    /// Match a terminal pattern at the cursor.
    pub fn matches<P>(mut self, pattern: &P) -> StateResult<'a, R>
    where
        P: Pattern + ?Sized,
    {
        if self.is_aborted() {
            return Err(self);
        }
        if pattern.match_at(&mut self.cursor) {
            Ok(self)
        } else {
            let offset = self.cursor.save();
            self.context.diagnostics.record_failure(offset);
            Err(self)
        }
    }

    /// Attempt to match the given string on input, respecting case.
    pub fn match_str(self, s: &str) -> StateResult<'a, R> {
        self.matches(s)
    }

    /// Attempt to match the given string on input, ignoring ASCII case.
    pub fn match_str_nocase(self, s: &str) -> StateResult<'a, R> {
        self.matches(&NoCase(s))
    }

    /// Match one character in `lo..=hi`.
    pub fn match_range(self, lo: char, hi: char) -> StateResult<'a, R> {
        self.matches(&(lo..=hi))
    }

    /// Match one character satisfying `f`.
    pub fn match_class<F>(self, f: F) -> StateResult<'a, R>
    where
        F: Fn(char) -> bool,
    {
        self.matches(&Class(f))
    }

    pub fn terminal(self, terminal: &Terminal) -> StateResult<'a, R> {
        self.matches(terminal)
    }

    /// Match a terminal written in ABNF notation, e.g. `%x30-39` or
    /// `%s"IN"`. Malformed notation aborts the parse.
    ///
    /// The notation is parsed on every call; parse it once into a `Terminal`
    /// for rules on a hot path.
    pub fn abnf(self, notation: &str) -> StateResult<'a, R> {
        match notation.parse::<Terminal>() {
            Ok(terminal) => self.matches(&terminal),
            Err(source) => self.abort(Error::Notation {
                notation: notation.to_owned(),
                source,
            }),
        }
    }
}
