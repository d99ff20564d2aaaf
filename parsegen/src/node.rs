use std::fmt;

use crate::span::Span;
use crate::visitor::Dispatch;
use crate::ParserRule;

/// A node in the parse tree, produced when a named rule matches.
///
/// The spelling is exactly the text consumed by the rule. Children are the
/// rule nodes matched inside it, in input order; terminals contribute to the
/// spelling but not to the children. Nodes are never modified after
/// construction.
///
/// Two nodes are equal when their rules, spellings and children are equal,
/// regardless of where in the input they matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a, R: ParserRule> {
    rule: R,
    span: Span<'a>,
    children: Vec<Node<'a, R>>,
}

impl<'a, R: ParserRule> Node<'a, R> {
    pub(crate) fn new(rule: R, span: Span<'a>, children: Vec<Node<'a, R>>) -> Self {
        Node {
            rule,
            span,
            children,
        }
    }

    pub fn rule(&self) -> R {
        self.rule
    }

    pub fn span(&self) -> Span<'a> {
        self.span
    }

    /// The matched text.
    pub fn as_str(&self) -> &'a str {
        self.span.as_str()
    }

    pub fn start(&self) -> usize {
        self.span.start()
    }

    pub fn end(&self) -> usize {
        self.span.end()
    }

    pub fn children(&self) -> &[Node<'a, R>] {
        &self.children
    }

    /// First direct child produced by `rule`.
    pub fn child(&self, rule: R) -> Option<&Node<'a, R>> {
        self.children.iter().find(|c| c.rule == rule)
    }

    /// Direct children produced by `rule`.
    pub fn children_of(&self, rule: R) -> impl Iterator<Item = &Node<'a, R>> {
        self.children.iter().filter(move |c| c.rule == rule)
    }

    /// Iterate over this node and all of its descendants, depth first, parents
    /// before children.
    pub fn iter(&self) -> DfsParseTreeIterator<'_, 'a, R> {
        DfsParseTreeIterator { stack: vec![self] }
    }

    /// Hand this node to the visitor method for its rule.
    pub fn accept<V>(&self, visitor: &mut V) -> <R as Dispatch<'a, V>>::Output
    where
        V: ?Sized,
        R: Dispatch<'a, V>,
    {
        R::dispatch(self, visitor)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{:?} {:?}", "", self.rule, self.as_str(), indent = depth * 2)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// One line per node, children indented under their parent.
impl<'a, R: ParserRule> fmt::Display for Node<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl<'n, 'a, R: ParserRule> IntoIterator for &'n Node<'a, R> {
    type Item = &'n Node<'a, R>;
    type IntoIter = DfsParseTreeIterator<'n, 'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order traversal of a parse tree.
#[derive(Debug)]
pub struct DfsParseTreeIterator<'n, 'a, R: ParserRule> {
    stack: Vec<&'n Node<'a, R>>,
}

impl<'n, 'a, R: ParserRule> Iterator for DfsParseTreeIterator<'n, 'a, R> {
    type Item = &'n Node<'a, R>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
