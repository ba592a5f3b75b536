//! XMLUI Lexer
//!
//! Tokenizes XMLUI markup. The scanner is error tolerant: it never fails,
//! keeps trivia (whitespace, newlines, comments) available as tokens, decodes
//! string-literal escapes, and recognizes CDATA and `<script>` sections as
//! single tokens.
//!
//! # Example
//!
//! ```
//! use xmlui_lexer::{Scanner, SyntaxKind};
//!
//! let (tokens, diagnostics) = Scanner::tokenize("", false);
//! assert_eq!(tokens.len(), 1); // Just EOF
//! assert_eq!(tokens[0].kind, SyntaxKind::EndOfFile);
//! assert!(diagnostics.is_empty());
//! ```

pub mod chars;
pub mod diagnostics;
pub mod scanner;
pub mod token;

pub use diagnostics::{DiagnosticCategory, DiagnosticMessage};
pub use scanner::{ScanDiagnostic, Scanner, ScannerState};
pub use token::{SyntaxKind, Token};
