//! XMLUI Parser
//!
//! Parses XMLUI markup into a concrete syntax tree that keeps every byte of
//! the source (trivia hangs off the token that follows it). Parsing never
//! fails: malformed input produces error nodes in the tree and entries in the
//! error list.
//!
//! ```
//! let result = xmlui_parser::parse("<Button label=\"Hi\"/>");
//! assert!(result.errors.is_empty());
//! ```

pub mod ast;
pub mod errors;
pub mod line_index;
pub mod lookup;
pub mod parser;
pub mod syntax;

pub use ast::{AttributeView, ElementView};
pub use errors::ErrCode;
pub use line_index::{LineCol, LineIndex};
pub use lookup::{find_token_at_pos, TokenAtPos};
pub use parser::Parser;
pub use syntax::{get_text, Node};
pub use xmlui_lexer::SyntaxKind;

use serde::Serialize;
use xmlui_lexer::ScanDiagnostic;

/// A lexical or syntactic error with its source range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ParseError {
    pub code: &'static str,
    pub message: String,
    pub pos: usize,
    pub end: usize,
}

impl ParseError {
    pub fn new(code: ErrCode, pos: usize, end: usize) -> Self {
        Self::with_message(code, code.message().to_string(), pos, end)
    }

    pub fn with_message(code: ErrCode, message: String, pos: usize, end: usize) -> Self {
        Self {
            code: code.code(),
            message,
            pos,
            end,
        }
    }
}

impl From<ScanDiagnostic> for ParseError {
    fn from(diagnostic: ScanDiagnostic) -> Self {
        Self {
            code: diagnostic.message.code,
            message: diagnostic.message.message.to_string(),
            pos: diagnostic.pos,
            end: diagnostic.pos + diagnostic.len,
        }
    }
}

/// The outcome of one parse: the root node and every error found, in the
/// order they were reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub node: Node,
    pub errors: Vec<ParseError>,
}

/// Parse a complete document.
pub fn parse(source: &str) -> ParseResult {
    Parser::parse(source)
}
