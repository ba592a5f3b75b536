/// Classification of tokens and syntax nodes.
///
/// Terminal kinds come out of the scanner; the `*Node` kinds are only produced
/// by the parser when it wraps children into composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum SyntaxKind {
    // End of input
    EndOfFile,
    Unknown,

    // Trivia
    CommentTrivia,
    WhitespaceTrivia,
    NewLineTrivia,

    // Literals and names
    Identifier,
    StringLiteral,
    CData,
    Script,

    // Punctuation
    Colon,
    Equal,
    /// `<`
    OpenNodeStart,
    /// `</`
    CloseNodeStart,
    /// `>`
    NodeEnd,
    /// `/>`
    NodeClose,

    // Character entities
    AmpersandEntity,
    LessThanEntity,
    GreaterThanEntity,
    DoubleQuoteEntity,
    SingleQuoteEntity,

    // Composite nodes
    ContentListNode,
    ElementNode,
    TagNameNode,
    AttributeNode,
    AttributeListNode,
    ErrorNode,
    TextNode,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::CommentTrivia | SyntaxKind::WhitespaceTrivia | SyntaxKind::NewLineTrivia
        )
    }

    pub fn is_entity(self) -> bool {
        matches!(
            self,
            SyntaxKind::AmpersandEntity
                | SyntaxKind::LessThanEntity
                | SyntaxKind::GreaterThanEntity
                | SyntaxKind::DoubleQuoteEntity
                | SyntaxKind::SingleQuoteEntity
        )
    }

    /// Kinds that open a tag-like construct in content position.
    pub fn is_tag_like(self) -> bool {
        matches!(
            self,
            SyntaxKind::OpenNodeStart
                | SyntaxKind::CloseNodeStart
                | SyntaxKind::CData
                | SyntaxKind::Script
        )
    }

    /// Composite kinds built by the parser; everything else is a token.
    pub fn is_node(self) -> bool {
        matches!(
            self,
            SyntaxKind::ContentListNode
                | SyntaxKind::ElementNode
                | SyntaxKind::TagNameNode
                | SyntaxKind::AttributeNode
                | SyntaxKind::AttributeListNode
                | SyntaxKind::ErrorNode
        )
    }

    /// Human-readable name, used in messages and tree dumps.
    pub fn display_name(self) -> &'static str {
        match self {
            SyntaxKind::EndOfFile => "end of file",
            SyntaxKind::Unknown => "unknown",
            SyntaxKind::CommentTrivia => "comment",
            SyntaxKind::WhitespaceTrivia => "whitespace",
            SyntaxKind::NewLineTrivia => "newline",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::CData => "CDATA section",
            SyntaxKind::Script => "script section",
            SyntaxKind::Colon => "':'",
            SyntaxKind::Equal => "'='",
            SyntaxKind::OpenNodeStart => "'<'",
            SyntaxKind::CloseNodeStart => "'</'",
            SyntaxKind::NodeEnd => "'>'",
            SyntaxKind::NodeClose => "'/>'",
            SyntaxKind::AmpersandEntity => "'&amp;'",
            SyntaxKind::LessThanEntity => "'&lt;'",
            SyntaxKind::GreaterThanEntity => "'&gt;'",
            SyntaxKind::DoubleQuoteEntity => "'&quot;'",
            SyntaxKind::SingleQuoteEntity => "'&apos;'",
            SyntaxKind::ContentListNode => "content list",
            SyntaxKind::ElementNode => "element",
            SyntaxKind::TagNameNode => "tag name",
            SyntaxKind::AttributeNode => "attribute",
            SyntaxKind::AttributeListNode => "attribute list",
            SyntaxKind::ErrorNode => "error",
            SyntaxKind::TextNode => "text",
        }
    }
}

/// A token produced by [`Scanner::tokenize`](crate::Scanner::tokenize).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Token {
    pub kind: SyntaxKind,
    pub start: usize,
    pub end: usize,
    /// Escape-decoded value for string literals, empty otherwise.
    pub value: String,
}

impl Token {
    pub fn new(kind: SyntaxKind, start: usize, end: usize, value: String) -> Self {
        Self {
            kind,
            start,
            end,
            value,
        }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// The five character entities the scanner recognizes, longest spelling first.
pub const ENTITIES: &[(&str, SyntaxKind)] = &[
    ("&quot;", SyntaxKind::DoubleQuoteEntity),
    ("&apos;", SyntaxKind::SingleQuoteEntity),
    ("&amp;", SyntaxKind::AmpersandEntity),
    ("&lt;", SyntaxKind::LessThanEntity),
    ("&gt;", SyntaxKind::GreaterThanEntity),
];
