//! Typed views over the syntax tree.
//!
//! The tree itself is untyped (one [`Node`] for everything). These wrappers
//! give element and attribute nodes named accessors without copying
//! anything; each view borrows the node and the source it came from.

use crate::syntax::Node;
use xmlui_lexer::{Scanner, SyntaxKind};

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// An `ElementNode`.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    node: &'a Node,
    source: &'a str,
}

impl<'a> ElementView<'a> {
    /// Wrap `node` if it is an element.
    pub fn cast(node: &'a Node, source: &'a str) -> Option<Self> {
        (node.kind == SyntaxKind::ElementNode).then_some(Self { node, source })
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// The opening tag name node.
    pub fn tag_name(&self) -> Option<&'a Node> {
        self.node.first_child_of(SyntaxKind::TagNameNode)
    }

    /// Full tag name as written, `ns:Name` for namespaced tags.
    pub fn name(&self) -> Option<String> {
        self.tag_name().map(|n| flatten_name(n, self.source))
    }

    /// The part before `:`, if the name is namespaced.
    pub fn namespace(&self) -> Option<&'a str> {
        let name = self.tag_name()?;
        name.first_child_of(SyntaxKind::Colon)?;
        name.first_child_of(SyntaxKind::Identifier)
            .map(|n| n.text(self.source, true))
    }

    /// The part after `:`, or the whole name.
    pub fn local_name(&self) -> Option<&'a str> {
        self.tag_name()?
            .children
            .iter()
            .rev()
            .find(|n| n.kind == SyntaxKind::Identifier)
            .map(|n| n.text(self.source, true))
    }

    /// The name in `</name>`, if the element has a named closing tag.
    pub fn closing_tag_name(&self) -> Option<String> {
        self.node
            .children
            .iter()
            .filter(|n| n.kind == SyntaxKind::TagNameNode)
            .nth(1)
            .map(|n| flatten_name(n, self.source))
    }

    pub fn attributes(&self) -> impl Iterator<Item = AttributeView<'a>> + 'a {
        let source = self.source;
        self.node
            .first_child_of(SyntaxKind::AttributeListNode)
            .into_iter()
            .flat_map(|list| list.children.iter())
            .filter_map(move |n| AttributeView::cast(n, source))
    }

    /// First attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<AttributeView<'a>> {
        self.attributes().find(|a| a.name() == name)
    }

    /// Child nodes between the opening and closing tags.
    pub fn content(&self) -> impl Iterator<Item = &'a Node> {
        self.node
            .first_child_of(SyntaxKind::ContentListNode)
            .into_iter()
            .flat_map(|list| list.children.iter())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = ElementView<'a>> + 'a {
        let source = self.source;
        self.content().filter_map(move |n| ElementView::cast(n, source))
    }

    pub fn is_self_closing(&self) -> bool {
        self.node
            .children
            .last()
            .is_some_and(|n| n.kind == SyntaxKind::NodeClose)
    }

    /// Whether the opening tag was ended with `>` (so content may follow).
    pub fn has_open_body(&self) -> bool {
        self.node.first_child_of(SyntaxKind::NodeEnd).is_some()
    }

    /// Whether a `</` was found for this element.
    pub fn is_closed(&self) -> bool {
        self.is_self_closing() || self.node.first_child_of(SyntaxKind::CloseNodeStart).is_some()
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// An `AttributeNode`: `name`, optionally `=` and a value.
#[derive(Debug, Clone, Copy)]
pub struct AttributeView<'a> {
    node: &'a Node,
    source: &'a str,
}

impl<'a> AttributeView<'a> {
    pub fn cast(node: &'a Node, source: &'a str) -> Option<Self> {
        (node.kind == SyntaxKind::AttributeNode).then_some(Self { node, source })
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn name_token(&self) -> &'a Node {
        &self.node.children[0]
    }

    pub fn name(&self) -> &'a str {
        self.name_token().text(self.source, true)
    }

    pub fn value_token(&self) -> Option<&'a Node> {
        self.node.first_child_of(SyntaxKind::StringLiteral)
    }

    /// The value with quotes removed and escapes decoded.
    pub fn value(&self) -> Option<String> {
        let token = self.value_token()?;
        let mut scanner = Scanner::new(token.text(self.source, true), true);
        scanner.scan();
        Some(scanner.token_value().to_string())
    }
}

/// All elements under `root`, in document order.
pub fn elements<'a>(root: &'a Node, source: &'a str) -> impl Iterator<Item = ElementView<'a>> + 'a {
    root.walk().filter_map(move |n| ElementView::cast(n, source))
}

/// Join the significant text of a tag name's tokens, skipping error nodes.
fn flatten_name(name: &Node, source: &str) -> String {
    name.children
        .iter()
        .filter(|n| matches!(n.kind, SyntaxKind::Identifier | SyntaxKind::Colon))
        .map(|n| n.text(source, true))
        .collect()
}
