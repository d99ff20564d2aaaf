use log::trace;

use crate::ParserRule;

/// A rule currently being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<R> {
    pub rule: R,
    pub start: usize,
}

/// One push or pop of the diagnostic stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<R> {
    Enter {
        rule: R,
        start: usize,
    },
    Exit {
        rule: R,
        start: usize,
        /// Equal to `start` when the rule failed.
        end: usize,
        matched: bool,
    },
}

impl<R> TraceEvent<R> {
    /// Convert the rule of this event, keeping the offsets.
    pub fn map_rule<S, F>(self, f: F) -> TraceEvent<S>
    where
        F: FnOnce(R) -> S,
    {
        match self {
            TraceEvent::Enter { rule, start } => TraceEvent::Enter {
                rule: f(rule),
                start,
            },
            TraceEvent::Exit {
                rule,
                start,
                end,
                matched,
            } => TraceEvent::Exit {
                rule: f(rule),
                start,
                end,
                matched,
            },
        }
    }
}

/// The furthest offset at which a terminal failed to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Furthest<R> {
    pub offset: usize,
    /// Rules active at that point, outermost first. Empty unless tracing.
    pub stack: Vec<R>,
}

/// Stack of rules being attempted. Purely informational, nothing here
/// influences what matches.
#[derive(Debug)]
pub struct Diagnostics<R> {
    stack: Vec<Frame<R>>,
    events: Option<Vec<TraceEvent<R>>>,
    furthest: Option<Furthest<R>>,
}

impl<R: ParserRule> Diagnostics<R> {
    pub fn new(tracing: bool) -> Self {
        Diagnostics {
            stack: Vec::new(),
            events: if tracing { Some(Vec::new()) } else { None },
            furthest: None,
        }
    }

    pub fn is_tracing(&self) -> bool {
        self.events.is_some()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[Frame<R>] {
        &self.stack
    }

    pub fn events(&self) -> Option<&[TraceEvent<R>]> {
        self.events.as_deref()
    }

    pub fn furthest(&self) -> Option<&Furthest<R>> {
        self.furthest.as_ref()
    }

    pub fn push(&mut self, rule: R, start: usize) {
        trace!("{:indent$}enter {:?} at {}", "", rule, start, indent = self.stack.len());
        self.stack.push(Frame { rule, start });
        if let Some(events) = &mut self.events {
            events.push(TraceEvent::Enter { rule, start });
        }
    }

    pub fn pop(&mut self, rule: R, end: usize, matched: bool) {
        let start = match self.stack.pop() {
            Some(frame) => {
                debug_assert_eq!(frame.rule, rule, "unbalanced diagnostic stack");
                frame.start
            }
            None => end,
        };
        trace!(
            "{:indent$}{} {:?} at {}..{}",
            "",
            if matched { "match" } else { "fail" },
            rule,
            start,
            end,
            indent = self.stack.len()
        );
        if let Some(events) = &mut self.events {
            events.push(TraceEvent::Exit {
                rule,
                start,
                end,
                matched,
            });
        }
    }

    /// Note a terminal failing at `offset`. Only the first failure at the
    /// furthest offset is kept.
    pub fn record_failure(&mut self, offset: usize) {
        if let Some(furthest) = &self.furthest {
            if furthest.offset >= offset {
                return;
            }
        }
        let stack = if self.is_tracing() {
            self.stack.iter().map(|frame| frame.rule).collect()
        } else {
            Vec::new()
        };
        self.furthest = Some(Furthest { offset, stack });
    }

    pub fn into_parts(self) -> (Option<Vec<TraceEvent<R>>>, Option<Furthest<R>>) {
        (self.events, self.furthest)
    }
}
