//! Document parser for XMLUI markup.
//!
//! Recursive descent with one token of lookahead, building the tree through
//! a stack of in-progress frames (`start_node` / `complete_node` /
//! `abandon_node`). Errors are recovered panic-mode style: each rule knows
//! which token kinds may follow it; an unexpected token that is not in that
//! set is wrapped in an `ErrorNode`, one that is gets left for the caller.
//!
//! Content is scanned differently from tags: untagged character runs become
//! `TextNode` tokens, see [`scan_content_token`].

use crate::errors::ErrCode;
use crate::syntax::Node;
use crate::{ParseError, ParseResult};
use std::collections::HashSet;
use tracing::{debug, trace};
use xmlui_lexer::{Scanner, ScannerState, SyntaxKind};

/// What may follow a content list, and so an element, CDATA or script.
const CONTENT_FOLLOW: &[SyntaxKind] = &[
    SyntaxKind::OpenNodeStart,
    SyntaxKind::CloseNodeStart,
    SyntaxKind::CData,
    SyntaxKind::Script,
];

/// What may follow an attribute list.
const ATTR_LIST_FOLLOW: &[SyntaxKind] = &[
    SyntaxKind::NodeEnd,
    SyntaxKind::NodeClose,
    SyntaxKind::OpenNodeStart,
    SyntaxKind::CloseNodeStart,
    SyntaxKind::CData,
    SyntaxKind::Script,
];

/// What may follow an attribute (or an opening tag name): the next attribute
/// or the end of the attribute list.
const ATTR_FOLLOW: &[SyntaxKind] = &[
    SyntaxKind::Identifier,
    SyntaxKind::NodeEnd,
    SyntaxKind::NodeClose,
    SyntaxKind::OpenNodeStart,
    SyntaxKind::CloseNodeStart,
    SyntaxKind::CData,
    SyntaxKind::Script,
];

/// What may follow the name of a closing tag.
const CLOSE_TAG_NAME_FOLLOW: &[SyntaxKind] = &[
    SyntaxKind::NodeEnd,
    SyntaxKind::OpenNodeStart,
    SyntaxKind::CloseNodeStart,
    SyntaxKind::CData,
    SyntaxKind::Script,
];

/// The lookahead slot. `before` is the scanner state preceding the token so
/// the peek can be undone as a whole.
struct Peeked {
    token: Node,
    before: ScannerState,
    in_content: bool,
}

/// A parsed tag name: its flattened text (`ns:Name`) and significant range.
struct TagName {
    text: String,
    pos: usize,
    end: usize,
}

/// XMLUI markup parser.
///
/// Owns one scanner over one source string and produces exactly one
/// [`ParseResult`].
pub struct Parser<'a> {
    source: &'a str,
    scanner: Scanner<'a>,
    peeked: Option<Peeked>,
    stack: Vec<Vec<Node>>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            scanner: Scanner::new(source, false),
            peeked: None,
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Parse source code into a syntax tree.
    pub fn parse(source: &str) -> ParseResult {
        Parser::new(source).parse_source()
    }

    /// Parse the whole document. The root is a `ContentListNode` whose last
    /// child is the end-of-file token (which carries any trailing trivia).
    pub fn parse_source(mut self) -> ParseResult {
        debug!(len = self.source.len(), "parse start");
        self.start_node();

        loop {
            self.parse_content_items();
            if self.peek_kind() == SyntaxKind::EndOfFile {
                break;
            }
            self.parse_dangling_close_tag();
        }
        self.bump(SyntaxKind::EndOfFile);

        let children = self.stack.pop().unwrap_or_default();
        let node = Node::composite(SyntaxKind::ContentListNode, children)
            .expect("root frame always holds the end-of-file token");

        debug!(errors = self.errors.len(), "parse finished");
        ParseResult {
            node,
            errors: self.errors,
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Content items go straight into the current frame.
    fn parse_content_items(&mut self) {
        loop {
            match self.peek_in_content() {
                SyntaxKind::TextNode
                | SyntaxKind::StringLiteral
                | SyntaxKind::CData
                | SyntaxKind::Script => self.bump_any(),
                SyntaxKind::OpenNodeStart => self.parse_element(),
                SyntaxKind::CloseNodeStart | SyntaxKind::EndOfFile => return,
                _ => {
                    self.err_recover(ErrCode::UnexpectedToken, CONTENT_FOLLOW);
                }
            }
        }
    }

    /// Element children, wrapped in a `ContentListNode` when there are any.
    fn parse_content(&mut self) {
        self.start_node();
        self.parse_content_items();
        if self.frame_is_empty() {
            self.abandon_node();
        } else {
            self.complete_node(SyntaxKind::ContentListNode);
        }
    }

    /// A `</name>` at the top level that no element claims.
    fn parse_dangling_close_tag(&mut self) {
        let (pos, _) = self.peek_range();
        self.start_node();
        self.bump(SyntaxKind::CloseNodeStart);
        if self.at(SyntaxKind::Identifier) {
            self.parse_tag_name();
        }
        if self.at(SyntaxKind::NodeEnd) {
            self.bump_any();
        }
        let end = self.frame_end().unwrap_or(pos);
        self.complete_node(SyntaxKind::ErrorNode);
        self.error(ParseError::new(ErrCode::UnexpectedCloseTag, pos, end));
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// `'<' TagName AttributeList ( '/>' | '>' Content '</' TagName? '>' )`
    fn parse_element(&mut self) {
        self.start_node();
        self.bump(SyntaxKind::OpenNodeStart);

        let open_name = if self.at(SyntaxKind::Identifier) {
            Some(self.parse_tag_name())
        } else {
            self.err_recover(ErrCode::ExpTagName, ATTR_FOLLOW);
            None
        };

        self.parse_attr_list();

        match self.peek_kind() {
            SyntaxKind::NodeClose => self.bump_any(),
            SyntaxKind::NodeEnd => {
                self.bump_any();
                self.parse_content();
                self.parse_closing_tag(open_name.as_ref());
            }
            _ => {
                self.err_recover(ErrCode::ExpEndOrClose, CONTENT_FOLLOW);
            }
        }

        self.complete_node(SyntaxKind::ElementNode);
    }

    fn parse_closing_tag(&mut self, open_name: Option<&TagName>) {
        if !self.at(SyntaxKind::CloseNodeStart) {
            // Content only stops at `</` or the end of input.
            let (pos, end) = self.peek_range();
            self.error(ParseError::new(ErrCode::ExpCloseStart, pos, end));
            return;
        }
        self.bump_any();

        match self.peek_kind() {
            SyntaxKind::Identifier => {
                let close_name = self.parse_tag_name();
                if let Some(open_name) = open_name {
                    if open_name.text != close_name.text {
                        self.error(ParseError::with_message(
                            ErrCode::TagNameMismatch,
                            format!(
                                "Opening and closing tag names should match: '{}' vs '{}'",
                                open_name.text, close_name.text
                            ),
                            close_name.pos,
                            close_name.end,
                        ));
                    }
                }
            }
            SyntaxKind::NodeEnd => {}
            _ => {
                self.err_recover(ErrCode::ExpTagName, CLOSE_TAG_NAME_FOLLOW);
            }
        }

        if self.at(SyntaxKind::NodeEnd) {
            self.bump_any();
        } else {
            self.err_recover(ErrCode::ExpEnd, CONTENT_FOLLOW);
        }
    }

    /// `Identifier (':' Identifier)?`
    fn parse_tag_name(&mut self) -> TagName {
        self.start_node();
        let (pos, mut end) = self.peek_range();
        let mut text = self.source[pos..end].to_string();
        self.bump(SyntaxKind::Identifier);

        if self.at(SyntaxKind::Colon) {
            end = self.peek_range().1;
            text.push(':');
            self.bump_any();
            if self.at(SyntaxKind::Identifier) {
                let (name_pos, name_end) = self.peek_range();
                text.push_str(&self.source[name_pos..name_end]);
                end = name_end;
                self.bump_any();
            } else {
                self.err_recover(ErrCode::ExpTagNameAfterNamespace, ATTR_FOLLOW);
            }
        }

        self.complete_node(SyntaxKind::TagNameNode);
        TagName { text, pos, end }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    fn parse_attr_list(&mut self) {
        self.start_node();
        let mut seen = HashSet::new();

        loop {
            match self.peek_kind() {
                SyntaxKind::Identifier => self.parse_attr(&mut seen),
                kind if kind == SyntaxKind::EndOfFile || ATTR_LIST_FOLLOW.contains(&kind) => break,
                _ => {
                    self.err_recover(ErrCode::ExpAttrName, ATTR_LIST_FOLLOW);
                }
            }
        }

        if self.frame_is_empty() {
            self.abandon_node();
        } else {
            self.complete_node(SyntaxKind::AttributeListNode);
        }
    }

    /// `Identifier '=' StringLiteral`. Name checks run only once a value is attached.
    fn parse_attr(&mut self, seen: &mut HashSet<String>) {
        self.start_node();
        let source = self.source;
        let (pos, end) = self.peek_range();
        let name = &source[pos..end];
        self.bump(SyntaxKind::Identifier);

        if self.at(SyntaxKind::Equal) {
            self.bump_any();
            if self.at(SyntaxKind::StringLiteral) {
                self.bump_any();
                if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                    self.error(ParseError::with_message(
                        ErrCode::UppercaseAttr,
                        format!("Attribute name '{name}' cannot start with an uppercase letter"),
                        pos,
                        end,
                    ));
                }
                if !seen.insert(name.to_string()) {
                    self.error(ParseError::with_message(
                        ErrCode::DuplicateAttr,
                        format!("Duplicated attribute: '{name}'"),
                        pos,
                        end,
                    ));
                }
            } else {
                self.err_recover(ErrCode::ExpAttrValue, ATTR_FOLLOW);
            }
        } else {
            self.err_recover(ErrCode::ExpEq, ATTR_FOLLOW);
        }

        self.complete_node(SyntaxKind::AttributeNode);
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    /// Report `code` at the current token. A token in `follow` (or the end of
    /// input) is left alone for the caller; anything else is consumed into an
    /// `ErrorNode`. Returns whether a token was consumed.
    fn err_recover(&mut self, code: ErrCode, follow: &[SyntaxKind]) -> bool {
        let token = self.peek();
        let (kind, pos, end) = (token.kind, token.pos, token.end);

        if kind == SyntaxKind::EndOfFile || follow.contains(&kind) {
            self.error(ParseError::new(code, pos, end));
            return false;
        }

        trace!(code = code.code(), kind = kind.display_name(), pos, "recover");
        self.start_node();
        self.bump_any();
        self.complete_node(SyntaxKind::ErrorNode);
        self.error(ParseError::new(code, pos, end));
        true
    }

    fn error(&mut self, error: ParseError) {
        debug!(code = error.code, pos = error.pos, end = error.end, "{}", error.message);
        self.errors.push(error);
    }

    // =========================================================================
    // Tree construction
    // =========================================================================

    fn start_node(&mut self) {
        self.stack.push(Vec::new());
    }

    /// Wrap the current frame into a `kind` composite and append it to the parent.
    fn complete_node(&mut self, kind: SyntaxKind) {
        let children = self.stack.pop().unwrap_or_default();
        if let Some(node) = Node::composite(kind, children) {
            self.push_child(node);
        }
    }

    /// Drop the current frame, handing its children to the parent.
    fn abandon_node(&mut self) {
        let children = self.stack.pop().unwrap_or_default();
        if let Some(parent) = self.stack.last_mut() {
            parent.extend(children);
        }
    }

    fn push_child(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.push(node);
        }
    }

    fn frame_is_empty(&self) -> bool {
        self.stack.last().map_or(true, Vec::is_empty)
    }

    fn frame_end(&self) -> Option<usize> {
        self.stack.last()?.last().map(|n| n.end)
    }

    // =========================================================================
    // Token navigation
    // =========================================================================

    fn peek(&mut self) -> &Node {
        let scanner = &mut self.scanner;
        &self
            .peeked
            .get_or_insert_with(|| {
                let before = scanner.save();
                Peeked {
                    token: scan_token(scanner),
                    before,
                    in_content: false,
                }
            })
            .token
    }

    fn peek_kind(&mut self) -> SyntaxKind {
        self.peek().kind
    }

    fn peek_range(&mut self) -> (usize, usize) {
        let token = self.peek();
        (token.pos, token.end)
    }

    fn at(&mut self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    /// Peek in content position. A token peeked in tag position is reused
    /// only if it is tag-like; anything else is unpeeked and rescanned.
    fn peek_in_content(&mut self) -> SyntaxKind {
        if let Some(peeked) = self.peeked.take() {
            let kind = peeked.token.kind;
            if peeked.in_content || kind.is_tag_like() || kind == SyntaxKind::EndOfFile {
                self.peeked = Some(peeked);
                return kind;
            }
            self.scanner.restore(peeked.before);
        }

        let before = self.scanner.save();
        let token = scan_content_token(&mut self.scanner);
        let kind = token.kind;
        self.peeked = Some(Peeked {
            token,
            before,
            in_content: true,
        });
        kind
    }

    /// Consume the peeked token (or the next one) into the current frame.
    fn bump_any(&mut self) {
        let token = match self.peeked.take() {
            Some(peeked) => peeked.token,
            None => scan_token(&mut self.scanner),
        };
        trace!(
            kind = token.kind.display_name(),
            pos = token.pos,
            end = token.end,
            "bump"
        );
        let diagnostics = self.scanner.take_diagnostics();
        self.errors.extend(diagnostics.into_iter().map(ParseError::from));
        self.push_child(token);
    }

    /// Consume a token the grammar has already established. A different kind
    /// here is a parser bug, not bad input.
    fn bump(&mut self, kind: SyntaxKind) {
        let found = self.peek_kind();
        assert_eq!(
            found, kind,
            "parser consumed {found:?} where the grammar requires {kind:?}"
        );
        self.bump_any();
    }
}

/// Scan the next significant token, collecting the trivia before it.
fn scan_token(scanner: &mut Scanner<'_>) -> Node {
    let start = scanner.pos();
    let mut trivia = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind.is_trivia() {
            trivia.push(Node::trivia(kind, scanner.token_start(), scanner.token_end()));
            continue;
        }
        return Node::token(kind, start, scanner.token_start(), scanner.token_end(), trivia);
    }
}

/// Scan the next unit of element content.
///
/// Tag-like tokens come back unchanged. A string literal stays a string
/// literal only when a tag-like token follows it. Everything else is rewound
/// and rescanned as a text run reaching up to the next `<`; comments before
/// the run stay trivia, whitespace after the last comment belongs to the text.
fn scan_content_token(scanner: &mut Scanner<'_>) -> Node {
    let full_start = scanner.pos();
    let before = scanner.save();
    let token = scan_token(scanner);

    if token.kind.is_tag_like() || token.kind == SyntaxKind::EndOfFile {
        return token;
    }

    if token.kind == SyntaxKind::StringLiteral {
        let next = scanner.look_ahead(|s| scan_token(s).kind);
        if next.is_tag_like() {
            trace!(pos = token.pos, "string literal in content");
            return token;
        }
    }

    let comments = token
        .trivia_before
        .iter()
        .rposition(|t| t.kind == SyntaxKind::CommentTrivia)
        .map_or(0, |i| i + 1);
    let text_pos = token.trivia_before[..comments]
        .last()
        .map_or(full_start, |t| t.end);

    // An unterminated comment is the only non-tag token starting with `<`;
    // there is no text in front of it.
    if scanner.source()[text_pos..].starts_with('<') {
        return token;
    }

    let trivia: Vec<Node> = token.trivia_before.into_iter().take(comments).collect();
    scanner.restore(before);
    scanner.reset_token_state(text_pos);
    while let Some(ch) = scanner.peek_char(0) {
        if ch == '<' {
            break;
        }
        scanner.scan_char();
    }

    let end = scanner.pos();
    trace!(pos = text_pos, end, "text run");
    Node::token(SyntaxKind::TextNode, full_start, text_pos, end, trivia)
}
