//! Character classification used by the scanner.
//!
//! Every predicate works on a decoded `char`, so astral code points are
//! classified as one unit.

/// Single-line whitespace: anything that separates tokens without ending a line.
pub fn is_whitespace_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{1680}'
            | '\u{2000}'..='\u{200B}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}' // byte order mark
    )
}

/// Line terminators: LF, CR, LINE SEPARATOR and PARAGRAPH SEPARATOR.
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Identifiers start with an ASCII letter, `$` or `_`.
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '$' || ch == '_'
}

/// Identifier continuation: word characters plus `$`, `-` and `.`, so that
/// `kebab-case` and `Dotted.Names` scan as a single identifier.
pub fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '$' | '-' | '.')
}

pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}
