//! Completion context detection and candidates.
//!
//! The context comes from the token to the left of the cursor: the one the
//! cursor is inside of, or the last one ending before it.

use std::collections::BTreeSet;
use std::ptr;
use tracing::trace;
use xmlui_lexer::SyntaxKind;
use xmlui_parser::{find_token_at_pos, ElementView, Node, ParseResult};

/// What the user is typing at a given offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// Name of an opening tag; `prefix` is the part already typed.
    TagName { prefix: String },
    /// Name of a closing tag of the element called `open_name`.
    ClosingTagName {
        prefix: String,
        open_name: Option<String>,
    },
    /// An attribute name inside the opening tag of `element`.
    AttributeName {
        element: Option<String>,
        prefix: String,
        present: Vec<String>,
    },
    /// A value for `attribute`, either after `=` or inside the quotes.
    AttributeValue {
        element: Option<String>,
        attribute: String,
    },
    /// Between tags. `parent` is the enclosing element, if any.
    Content { parent: Option<String>, unclosed: bool },
    /// Inside something that takes no completion (CDATA, script, comments, errors).
    None,
}

/// Kind of a completion candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Component,
    Attribute,
    ClosingTag,
}

/// A semantic completion candidate, translated into protocol items by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub detail: Option<String>,
    pub kind: CandidateKind,
    pub insert_text: Option<String>,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
            insert_text: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }
}

/// Names the caller knows about. The parser has no component schema.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub components: Vec<String>,
    pub attributes: Vec<String>,
}

/// Classify `offset` in the parsed document.
pub fn completion_context(result: &ParseResult, source: &str, offset: usize) -> CompletionContext {
    let Some(chain) = left_chain(&result.node, offset) else {
        return CompletionContext::Content {
            parent: None,
            unclosed: false,
        };
    };

    let token = chain[chain.len() - 1];
    let parent = chain.len().checked_sub(2).map(|i| chain[i]);
    let inside = offset < token.end;
    let touching = offset <= token.end;
    let element = enclosing_element(&chain, source);
    let element_name = element.and_then(|e| e.name());
    let cursor = offset.clamp(token.pos, token.end);
    let typed = || source[token.pos..cursor].to_string();

    trace!(kind = token.kind.display_name(), offset, inside, "completion context");

    match (token.kind, parent.map(|p| p.kind)) {
        (SyntaxKind::OpenNodeStart, _) if touching => CompletionContext::TagName {
            prefix: String::new(),
        },
        (SyntaxKind::CloseNodeStart, _) if touching => CompletionContext::ClosingTagName {
            prefix: String::new(),
            open_name: element_name,
        },
        (SyntaxKind::Identifier | SyntaxKind::Colon, Some(SyntaxKind::TagNameNode)) => {
            let opening = match (element, parent) {
                (Some(element), Some(name)) => {
                    element.tag_name().is_some_and(|first| ptr::eq(first, name))
                }
                _ => true,
            };
            let prefix = source[parent.map_or(token.pos, |p| p.pos)..cursor].to_string();
            match (opening, touching) {
                (true, true) => CompletionContext::TagName { prefix },
                (false, true) => CompletionContext::ClosingTagName {
                    prefix,
                    open_name: element.and_then(|e| e.name()),
                },
                (true, false) => attribute_name(element, String::new()),
                (false, false) => CompletionContext::None,
            }
        }
        (SyntaxKind::Identifier, Some(SyntaxKind::AttributeNode)) if touching => {
            attribute_name(element, typed())
        }
        (SyntaxKind::Identifier, Some(SyntaxKind::AttributeNode)) => {
            attribute_name(element, String::new())
        }
        (SyntaxKind::Equal, Some(SyntaxKind::AttributeNode)) => CompletionContext::AttributeValue {
            element: element_name,
            attribute: attribute_of(parent, source),
        },
        (SyntaxKind::StringLiteral, Some(SyntaxKind::AttributeNode)) if inside => {
            CompletionContext::AttributeValue {
                element: element_name,
                attribute: attribute_of(parent, source),
            }
        }
        (SyntaxKind::StringLiteral, Some(SyntaxKind::AttributeNode)) => {
            attribute_name(element, String::new())
        }
        (SyntaxKind::NodeEnd, Some(SyntaxKind::ElementNode)) => {
            let is_opening_end = element.is_some_and(|e| {
                e.node()
                    .first_child_of(SyntaxKind::NodeEnd)
                    .is_some_and(|first| ptr::eq(first, token))
            });
            if is_opening_end {
                content_in(element)
            } else {
                content_in(enclosing_element(&chain[..chain.len() - 2], source))
            }
        }
        (SyntaxKind::NodeClose, Some(SyntaxKind::ElementNode)) => {
            content_in(enclosing_element(&chain[..chain.len() - 2], source))
        }
        (SyntaxKind::TextNode, _) => content_in(element),
        (
            SyntaxKind::StringLiteral | SyntaxKind::CData | SyntaxKind::Script,
            Some(SyntaxKind::ContentListNode),
        ) if !inside => content_in(element),
        _ => CompletionContext::None,
    }
}

/// Candidates for `offset`, drawn from `vocabulary` and the document itself.
pub fn completion_items(
    result: &ParseResult,
    source: &str,
    offset: usize,
    vocabulary: &Vocabulary,
) -> Vec<CompletionCandidate> {
    match completion_context(result, source, offset) {
        CompletionContext::TagName { prefix } => {
            let names: BTreeSet<&str> = vocabulary
                .components
                .iter()
                .map(String::as_str)
                .chain(
                    document_tag_names(&result.node, source)
                        .into_iter()
                        .filter(|name| *name != prefix),
                )
                .filter(|name| name.starts_with(&prefix))
                .collect();
            names
                .into_iter()
                .map(|name| {
                    CompletionCandidate::new(name, CandidateKind::Component)
                        .with_detail("component")
                })
                .collect()
        }
        CompletionContext::ClosingTagName {
            open_name: Some(name),
            prefix,
        } if name.starts_with(&prefix) => {
            vec![CompletionCandidate::new(name.clone(), CandidateKind::ClosingTag)
                .with_detail(format!("close <{name}>"))
                .with_insert_text(format!("{name}>"))]
        }
        CompletionContext::AttributeName { present, prefix, .. } => {
            let names: BTreeSet<&str> = vocabulary
                .attributes
                .iter()
                .map(String::as_str)
                .filter(|name| name.starts_with(&prefix))
                .filter(|name| !present.iter().any(|p| p == name))
                .collect();
            names
                .into_iter()
                .map(|name| {
                    CompletionCandidate::new(name, CandidateKind::Attribute)
                        .with_detail("attribute")
                        .with_insert_text(format!("{name}=\"\""))
                })
                .collect()
        }
        CompletionContext::Content {
            parent: Some(name),
            unclosed: true,
        } => vec![CompletionCandidate::new(format!("</{name}>"), CandidateKind::ClosingTag)
            .with_detail(format!("close <{name}>"))],
        _ => Vec::new(),
    }
}

/// Root-to-leaf chain of the token left of `offset`: the token containing
/// the cursor, or the last one ending at or before it.
fn left_chain(root: &Node, offset: usize) -> Option<Vec<&Node>> {
    let found = find_token_at_pos(root, offset)?;
    let inside = found.token_at().pos < offset;
    match found.chain_before_pos {
        Some(before) => Some(before),
        None if inside => Some(found.chain_at_pos),
        None => None,
    }
}

fn enclosing_element<'a>(chain: &[&'a Node], source: &'a str) -> Option<ElementView<'a>> {
    chain.iter().rev().find_map(|n| ElementView::cast(n, source))
}

fn content_in(element: Option<ElementView<'_>>) -> CompletionContext {
    CompletionContext::Content {
        parent: element.and_then(|e| e.name()),
        unclosed: element.is_some_and(|e| !e.is_closed()),
    }
}

fn attribute_name(element: Option<ElementView<'_>>, prefix: String) -> CompletionContext {
    let present = element
        .map(|e| e.attributes().map(|a| a.name().to_string()).collect())
        .unwrap_or_default();
    CompletionContext::AttributeName {
        element: element.and_then(|e| e.name()),
        prefix,
        present,
    }
}

fn attribute_of(attribute: Option<&Node>, source: &str) -> String {
    attribute
        .and_then(|n| n.children.first())
        .map(|n| n.text(source, true).to_string())
        .unwrap_or_default()
}

fn document_tag_names<'a>(root: &'a Node, source: &'a str) -> BTreeSet<&'a str> {
    xmlui_parser::ast::elements(root, source)
        .filter_map(|e| e.tag_name())
        .map(|n| n.text(source, true))
        .filter(|name| !name.is_empty())
        .collect()
}
