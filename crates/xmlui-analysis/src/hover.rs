//! Hover descriptions.

use tracing::trace;
use xmlui_lexer::SyntaxKind;
use xmlui_parser::{find_token_at_pos, AttributeView, ElementView, Node, ParseResult};

/// Text to show for the node under the cursor, and the range it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverResult {
    pub contents: String,
    pub pos: usize,
    pub end: usize,
}

/// Describe what lies at `offset`. Errors overlapping the offset are listed
/// after the description.
pub fn hover(result: &ParseResult, source: &str, offset: usize) -> Option<HoverResult> {
    let found = find_token_at_pos(&result.node, offset)?;
    let token = found.token_at();
    if !token.is_token() || token.kind == SyntaxKind::EndOfFile {
        return None;
    }

    let chain = &found.chain_at_pos;
    let parent = chain.len().checked_sub(2).map(|i| chain[i]);
    trace!(kind = token.kind.display_name(), offset, "hover");

    let (mut contents, node) = match parent.map(|p| p.kind) {
        Some(SyntaxKind::TagNameNode) => {
            let element = chain
                .iter()
                .rev()
                .find_map(|n| ElementView::cast(n, source))?;
            (describe_element(&element), parent?)
        }
        Some(SyntaxKind::AttributeNode) => {
            let attribute = AttributeView::cast(parent?, source)?;
            (describe_attribute(&attribute), parent?)
        }
        _ => (describe_token(token, source)?, token),
    };

    let errors: Vec<String> = result
        .errors
        .iter()
        .filter(|e| e.pos <= offset && offset <= e.end)
        .map(|e| e.to_string())
        .collect();
    if !errors.is_empty() {
        contents.push_str("\n\n");
        contents.push_str(&errors.join("\n"));
    }

    Some(HoverResult {
        contents,
        pos: node.pos,
        end: node.end,
    })
}

fn describe_element(element: &ElementView<'_>) -> String {
    let name = element.name().unwrap_or_default();
    let attributes = element.attributes().count();
    let children = element.child_elements().count();
    let shape = if element.is_self_closing() {
        "self-closing"
    } else if element.is_closed() {
        "closed"
    } else {
        "unclosed"
    };
    format!("element <{name}> ({shape}, {attributes} attribute(s), {children} child element(s))")
}

fn describe_attribute(attribute: &AttributeView<'_>) -> String {
    match attribute.value() {
        Some(value) => format!("attribute {} = {value:?}", attribute.name()),
        None => format!("attribute {} (no value)", attribute.name()),
    }
}

fn describe_token(token: &Node, source: &str) -> Option<String> {
    let text = token.text(source, true);
    let description = match token.kind {
        SyntaxKind::TextNode => format!("text ({} characters)", text.chars().count()),
        SyntaxKind::CData => "CDATA section".to_string(),
        SyntaxKind::Script => format!("script block ({} lines)", text.lines().count()),
        SyntaxKind::StringLiteral => "string literal".to_string(),
        SyntaxKind::Unknown => format!("unexpected {text:?}"),
        kind if kind.is_entity() => format!("entity {text}"),
        kind if kind.is_trivia() => return None,
        kind => kind.display_name().to_string(),
    };
    Some(description)
}
