//! Concrete syntax tree.
//!
//! A single [`Node`] type represents both tokens and composites. Tokens own
//! their leading trivia; composites derive their range from their children.
//! Concatenating the trivia-inclusive text of every token in tree order
//! reproduces the source exactly.

use serde::Serialize;
use std::fmt::Write as _;
use xmlui_lexer::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: SyntaxKind,
    /// First byte of the node, leading trivia included.
    pub start: usize,
    /// First significant byte.
    pub pos: usize,
    /// One past the last byte.
    pub end: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trivia_before: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn token(
        kind: SyntaxKind,
        start: usize,
        pos: usize,
        end: usize,
        trivia_before: Vec<Node>,
    ) -> Self {
        debug_assert!(start <= pos && pos <= end);
        Self {
            kind,
            start,
            pos,
            end,
            trivia_before,
            children: Vec::new(),
        }
    }

    /// A trivia token; its significant text is all of it.
    pub fn trivia(kind: SyntaxKind, start: usize, end: usize) -> Self {
        Self::token(kind, start, start, end, Vec::new())
    }

    /// Build a composite. Returns `None` for an empty child list: a composite
    /// has no range of its own.
    pub fn composite(kind: SyntaxKind, children: Vec<Node>) -> Option<Self> {
        let first = children.first()?;
        let last = children.last()?;
        Some(Self {
            kind,
            start: first.start,
            pos: first.pos,
            end: last.end,
            trivia_before: Vec::new(),
            children,
        })
    }

    /// Tokens are the leaves of the tree (text nodes included).
    pub fn is_token(&self) -> bool {
        self.children.is_empty()
    }

    /// Source text of this node; with `ignore_trivia` the leading trivia is left out.
    pub fn text<'s>(&self, source: &'s str, ignore_trivia: bool) -> &'s str {
        let from = if ignore_trivia { self.pos } else { self.start };
        &source[from..self.end]
    }

    /// Whether `offset` falls within the significant range `pos..=end`.
    pub fn contains(&self, offset: usize) -> bool {
        self.pos <= offset && offset <= self.end
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn first_child_of(&self, kind: SyntaxKind) -> Option<&Node> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Pre-order walk over this node and every descendant (trivia excluded).
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Every token under this node, in source order.
    pub fn tokens(&self) -> impl Iterator<Item = &Node> {
        self.walk().filter(|n| n.is_token())
    }

    /// Indented one-node-per-line rendering, for tests and the CLI.
    pub fn dump(&self, source: &str) -> String {
        let mut out = String::new();
        self.dump_into(source, 0, &mut out);
        out
    }

    fn dump_into(&self, source: &str, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        if self.is_token() {
            let _ = writeln!(
                out,
                "{indent}{:?} {}..{} {:?}",
                self.kind,
                self.pos,
                self.end,
                self.text(source, true)
            );
        } else {
            let _ = writeln!(out, "{indent}{:?} {}..{}", self.kind, self.pos, self.end);
            for child in &self.children {
                child.dump_into(source, depth + 1, out);
            }
        }
    }
}

/// Slice the source covered by `node`.
pub fn get_text<'s>(source: &'s str, node: &Node, ignore_trivia: bool) -> &'s str {
    node.text(source, ignore_trivia)
}
