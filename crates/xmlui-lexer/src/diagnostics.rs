//! Static catalog of scanner diagnostics.

/// Severity attached to a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// A catalog entry. Entries are `'static`; scanner diagnostics point into this table.
#[derive(Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: &'static str,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

const fn error(code: &'static str, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        code,
        category: DiagnosticCategory::Error,
        message,
    }
}

pub static INVALID_CHARACTER: DiagnosticMessage = error("S001", "Invalid character.");
pub static UNTERMINATED_STRING_LITERAL: DiagnosticMessage =
    error("S002", "Unterminated string literal.");
pub static UNEXPECTED_END_OF_TEXT: DiagnosticMessage = error("S003", "Unexpected end of text.");
pub static HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage =
    error("S004", "Hexadecimal digit expected.");
pub static EXTENDED_UNICODE_ESCAPE_OUT_OF_RANGE: DiagnosticMessage = error(
    "S005",
    "An extended Unicode escape value must be between 0x0 and 0x10FFFF inclusive.",
);
pub static UNTERMINATED_UNICODE_ESCAPE: DiagnosticMessage =
    error("S006", "Unterminated Unicode escape sequence.");
pub static UNTERMINATED_COMMENT: DiagnosticMessage = error("S007", "Unterminated comment.");
pub static UNTERMINATED_CDATA: DiagnosticMessage = error("S008", "Unterminated CDATA section.");
pub static UNTERMINATED_SCRIPT: DiagnosticMessage = error("S009", "Unterminated script section.");

/// Every catalog entry, in code order.
pub static ALL: &[&DiagnosticMessage] = &[
    &INVALID_CHARACTER,
    &UNTERMINATED_STRING_LITERAL,
    &UNEXPECTED_END_OF_TEXT,
    &HEXADECIMAL_DIGIT_EXPECTED,
    &EXTENDED_UNICODE_ESCAPE_OUT_OF_RANGE,
    &UNTERMINATED_UNICODE_ESCAPE,
    &UNTERMINATED_COMMENT,
    &UNTERMINATED_CDATA,
    &UNTERMINATED_SCRIPT,
];

/// Look a catalog entry up by its code.
pub fn by_code(code: &str) -> Option<&'static DiagnosticMessage> {
    ALL.iter().copied().find(|d| d.code == code)
}
