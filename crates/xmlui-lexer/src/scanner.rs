use crate::chars::{
    is_hex_digit, is_identifier_part, is_identifier_start, is_line_break,
    is_whitespace_single_line,
};
use crate::diagnostics::{self, DiagnosticMessage};
use crate::token::{SyntaxKind, Token, ENTITIES};
use tracing::{debug, trace};

/// A lexical diagnostic recorded while scanning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} at {pos}: {}", .message.code, .message.message)]
pub struct ScanDiagnostic {
    pub message: &'static DiagnosticMessage,
    pub pos: usize,
    pub len: usize,
}

/// Snapshot of the scanner cursor, taken by [`Scanner::save`].
///
/// Restoring a snapshot also drops every diagnostic recorded after it was
/// taken, so speculative scans never leak diagnostics.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    diagnostics_len: usize,
}

/// XMLUI markup scanner.
///
/// Produces one token per [`scan`](Scanner::scan) call. Offsets are byte
/// offsets into the source; the cursor always sits on a `char` boundary.
/// Scanning never fails: malformed input degrades to an `Unknown` or partial
/// token plus a [`ScanDiagnostic`].
pub struct Scanner<'a> {
    source: &'a str,
    skip_trivia: bool,
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    diagnostics: Vec<ScanDiagnostic>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner. With `skip_trivia` set, whitespace, newlines and
    /// comments are consumed silently instead of being returned as tokens.
    pub fn new(source: &'a str, skip_trivia: bool) -> Self {
        Self {
            source,
            skip_trivia,
            pos: 0,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Scan the whole source. The last token is always `EndOfFile`.
    pub fn tokenize(source: &str, skip_trivia: bool) -> (Vec<Token>, Vec<ScanDiagnostic>) {
        let mut scanner = Scanner::new(source, skip_trivia);
        let mut tokens = Vec::new();
        loop {
            let kind = scanner.scan();
            tokens.push(Token::new(
                kind,
                scanner.token_start(),
                scanner.token_end(),
                scanner.token_value().to_string(),
            ));
            if kind == SyntaxKind::EndOfFile {
                break;
            }
        }
        (tokens, scanner.take_diagnostics())
    }

    // --- Accessors ---

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current cursor offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token including the trivia skipped before it.
    pub fn full_start(&self) -> usize {
        self.full_start
    }

    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn token_end(&self) -> usize {
        self.pos
    }

    pub fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    /// Escape-decoded value of the last string literal.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ScanDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // --- Cursor control ---

    /// Look at the code point `ahead` positions past the cursor.
    pub fn peek_char(&self, ahead: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(ahead)
    }

    /// Consume one code point.
    pub fn scan_char(&mut self) -> Option<char> {
        let ch = self.peek_char(0)?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Move the cursor to `pos` and forget the current token.
    pub fn reset_token_state(&mut self, pos: usize) {
        let pos = pos.min(self.source.len());
        debug_assert!(self.source.is_char_boundary(pos), "reset inside a code point");
        self.pos = pos;
        self.full_start = pos;
        self.token_start = pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
    }

    /// Rewind to the start of the current token's leading trivia.
    pub fn back(&mut self) {
        self.reset_token_state(self.full_start);
    }

    pub fn save(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.full_start = state.full_start;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.diagnostics.truncate(state.diagnostics_len);
    }

    /// Run `f` and rewind afterwards, whatever it scanned.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save();
        let result = f(self);
        self.restore(state);
        result
    }

    /// Run `f`; rewind only when it returns `None`.
    pub fn try_scan<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let state = self.save();
        let result = f(self);
        if result.is_none() {
            self.restore(state);
        }
        result
    }

    // --- Scanning ---

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        loop {
            self.token_start = self.pos;
            self.token_value.clear();

            let Some(ch) = self.peek_char(0) else {
                return self.finish(SyntaxKind::EndOfFile);
            };

            let kind = match ch {
                c if is_line_break(c) => {
                    self.eat_while(is_line_break);
                    if self.skip_trivia {
                        continue;
                    }
                    SyntaxKind::NewLineTrivia
                }
                c if is_whitespace_single_line(c) => {
                    self.eat_while(is_whitespace_single_line);
                    if self.skip_trivia {
                        continue;
                    }
                    SyntaxKind::WhitespaceTrivia
                }
                '"' | '\'' | '`' => self.scan_string(ch),
                '&' => self.scan_entity(),
                '<' => match self.scan_angle() {
                    SyntaxKind::CommentTrivia if self.skip_trivia => continue,
                    kind => kind,
                },
                '/' if self.peek_char(1) == Some('>') => {
                    self.pos += 2;
                    SyntaxKind::NodeClose
                }
                '>' => {
                    self.pos += 1;
                    SyntaxKind::NodeEnd
                }
                '=' => {
                    self.pos += 1;
                    SyntaxKind::Equal
                }
                ':' => {
                    self.pos += 1;
                    SyntaxKind::Colon
                }
                c if is_identifier_start(c) => {
                    self.pos += 1;
                    self.eat_while(is_identifier_part);
                    SyntaxKind::Identifier
                }
                // Unicode white space outside the classified sets (e.g. NEL).
                c if c.is_whitespace() => {
                    self.pos += c.len_utf8();
                    continue;
                }
                c => {
                    self.pos += c.len_utf8();
                    self.report(&diagnostics::INVALID_CHARACTER, self.token_start, c.len_utf8());
                    SyntaxKind::Unknown
                }
            };
            return self.finish(kind);
        }
    }

    /// `<`, `</`, or one of the `<`-introduced sections.
    fn scan_angle(&mut self) -> SyntaxKind {
        let rest = &self.source[self.pos..];
        if rest.starts_with("<!--") {
            self.scan_section(
                "<!--",
                "-->",
                SyntaxKind::CommentTrivia,
                &diagnostics::UNTERMINATED_COMMENT,
                SyntaxKind::Unknown,
            )
        } else if rest.starts_with("<![CDATA[") {
            self.scan_section(
                "<![CDATA[",
                "]]>",
                SyntaxKind::CData,
                &diagnostics::UNTERMINATED_CDATA,
                SyntaxKind::CData,
            )
        } else if rest.starts_with("<script>") {
            self.scan_section(
                "<script>",
                "</script>",
                SyntaxKind::Script,
                &diagnostics::UNTERMINATED_SCRIPT,
                SyntaxKind::Script,
            )
        } else if rest.starts_with("</") {
            self.pos += 2;
            SyntaxKind::CloseNodeStart
        } else {
            self.pos += 1;
            SyntaxKind::OpenNodeStart
        }
    }

    /// Scan from `open` through the first `close`. An unterminated section
    /// runs to the end of input and yields `unterminated_kind`.
    fn scan_section(
        &mut self,
        open: &str,
        close: &str,
        kind: SyntaxKind,
        unterminated: &'static DiagnosticMessage,
        unterminated_kind: SyntaxKind,
    ) -> SyntaxKind {
        let body = self.pos + open.len();
        match self.source[body..].find(close) {
            Some(offset) => {
                self.pos = body + offset + close.len();
                kind
            }
            None => {
                self.pos = self.source.len();
                self.report(unterminated, self.token_start, self.pos - self.token_start);
                unterminated_kind
            }
        }
    }

    fn scan_entity(&mut self) -> SyntaxKind {
        let rest = &self.source[self.pos..];
        for (spelling, kind) in ENTITIES {
            if rest.starts_with(spelling) {
                self.pos += spelling.len();
                return *kind;
            }
        }
        self.pos += 1;
        SyntaxKind::Unknown
    }

    /// Scan a string literal delimited by `quote`, decoding escapes into
    /// the token value.
    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += quote.len_utf8();
        let mut value = String::new();

        loop {
            let Some(ch) = self.peek_char(0) else {
                self.report(
                    &diagnostics::UNTERMINATED_STRING_LITERAL,
                    self.token_start,
                    self.pos - self.token_start,
                );
                break;
            };
            if ch == quote {
                self.pos += ch.len_utf8();
                break;
            }
            if ch == '\\' {
                self.scan_escape_sequence(&mut value);
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }

        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_escape_sequence(&mut self, out: &mut String) {
        let start = self.pos;
        self.pos += 1; // backslash

        let Some(ch) = self.scan_char() else {
            self.report(&diagnostics::UNEXPECTED_END_OF_TEXT, start, 1);
            return;
        };

        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            'x' => match self.scan_exact_hex(2) {
                Some(value) => {
                    out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
                }
                None => self.report_here(&diagnostics::HEXADECIMAL_DIGIT_EXPECTED),
            },
            'u' if self.peek_char(0) == Some('{') => self.scan_extended_unicode_escape(out),
            'u' => match self.scan_exact_hex(4) {
                Some(unit) => out.push(self.decode_utf16_unit(unit)),
                None => self.report_here(&diagnostics::HEXADECIMAL_DIGIT_EXPECTED),
            },
            // Line continuations produce nothing.
            '\r' => {
                if self.peek_char(0) == Some('\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    /// `\u{H+}` with the cursor on `{`.
    fn scan_extended_unicode_escape(&mut self, out: &mut String) {
        self.pos += 1;
        let digits_start = self.pos;
        let mut value: u32 = 0;
        while let Some(digit) = self.peek_hex_digit() {
            value = value.saturating_mul(16).saturating_add(digit);
            self.pos += 1;
        }

        let mut valid = true;
        if self.pos == digits_start {
            self.report_here(&diagnostics::HEXADECIMAL_DIGIT_EXPECTED);
            valid = false;
        } else if value > 0x10FFFF {
            self.report(
                &diagnostics::EXTENDED_UNICODE_ESCAPE_OUT_OF_RANGE,
                digits_start,
                self.pos - digits_start,
            );
            valid = false;
        }

        if self.peek_char(0) == Some('}') {
            self.pos += 1;
        } else {
            self.report_here(&diagnostics::UNTERMINATED_UNICODE_ESCAPE);
            valid = false;
        }

        if valid {
            out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }

    /// Turn a `\uHHHH` code unit into a `char`, pairing a high surrogate with
    /// an immediately following `\uHHHH` low surrogate.
    fn decode_utf16_unit(&mut self, unit: u32) -> char {
        if (0xD800..0xDC00).contains(&unit) {
            let low = self.try_scan(|s| {
                if s.peek_char(0) != Some('\\') || s.peek_char(1) != Some('u') {
                    return None;
                }
                s.pos += 2;
                s.scan_exact_hex(4).filter(|low| (0xDC00..0xE000).contains(low))
            });
            if let Some(low) = low {
                let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
        }
        char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Consume exactly `count` hex digits. Valid digits before a failure stay consumed.
    fn scan_exact_hex(&mut self, count: usize) -> Option<u32> {
        let mut value = 0;
        for _ in 0..count {
            let digit = self.peek_hex_digit()?;
            value = value * 16 + digit;
            self.pos += 1;
        }
        Some(value)
    }

    fn peek_hex_digit(&self) -> Option<u32> {
        self.peek_char(0)
            .filter(|c| is_hex_digit(*c))
            .and_then(|c| c.to_digit(16))
    }

    // --- Helpers ---

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek_char(0) {
            if !predicate(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn finish(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.token = kind;
        trace!(
            kind = kind.display_name(),
            start = self.token_start,
            end = self.pos,
            "scan"
        );
        kind
    }

    fn report(&mut self, message: &'static DiagnosticMessage, pos: usize, len: usize) {
        debug!(code = message.code, pos, len, "{}", message.message);
        self.diagnostics.push(ScanDiagnostic { message, pos, len });
    }

    fn report_here(&mut self, message: &'static DiagnosticMessage) {
        let len = self.peek_char(0).map_or(0, char::len_utf8);
        self.report(message, self.pos, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: scan everything (trivia included) and return the kinds.
    fn kinds(source: &str) -> Vec<SyntaxKind> {
        Scanner::tokenize(source, false)
            .0
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    /// Helper: scan one token and return its kind, decoded value and diagnostics codes.
    fn scan_one(source: &str) -> (SyntaxKind, String, Vec<&'static str>) {
        let mut scanner = Scanner::new(source, true);
        let kind = scanner.scan();
        let value = scanner.token_value().to_string();
        let codes = scanner.diagnostics().iter().map(|d| d.message.code).collect();
        (kind, value, codes)
    }

    // =========================================================================
    // Structure: empty input, trivia
    // =========================================================================

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![SyntaxKind::EndOfFile]);
    }

    #[test]
    fn test_whitespace_run_is_one_token() {
        assert_eq!(
            kinds(" \t  "),
            vec![SyntaxKind::WhitespaceTrivia, SyntaxKind::EndOfFile]
        );
    }

    #[test]
    fn test_newline_run_is_one_token() {
        assert_eq!(
            kinds("\r\n\n\r"),
            vec![SyntaxKind::NewLineTrivia, SyntaxKind::EndOfFile]
        );
    }

    #[test]
    fn test_skip_trivia_mode() {
        let (tokens, _) = Scanner::tokenize("  <!-- c -->\n  <A/>", true);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::OpenNodeStart,
                SyntaxKind::Identifier,
                SyntaxKind::NodeClose,
                SyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_full_start_covers_skipped_trivia() {
        let mut scanner = Scanner::new("   abc", true);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.full_start(), 0);
        assert_eq!(scanner.token_start(), 3);
        assert_eq!(scanner.token_text(), "abc");
    }

    #[test]
    fn test_nel_is_skipped_silently() {
        let (tokens, diagnostics) = Scanner::tokenize("\u{0085}a", false);
        assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
        assert!(diagnostics.is_empty());
    }

    // =========================================================================
    // Punctuation and identifiers
    // =========================================================================

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("<</>/>=:"),
            vec![
                SyntaxKind::OpenNodeStart,
                SyntaxKind::CloseNodeStart,
                SyntaxKind::NodeEnd,
                SyntaxKind::NodeClose,
                SyntaxKind::Equal,
                SyntaxKind::Colon,
                SyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_identifier_continuation_set() {
        let (tokens, _) = Scanner::tokenize("my-comp.Part$_1", false);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[0].text("my-comp.Part$_1"), "my-comp.Part$_1");
    }

    #[test]
    fn test_namespaced_name_is_three_tokens() {
        assert_eq!(
            kinds("ns:Button"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Colon,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_invalid_character() {
        let (tokens, diagnostics) = Scanner::tokenize("#", false);
        assert_eq!(tokens[0].kind, SyntaxKind::Unknown);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message.code, "S001");
    }

    #[test]
    fn test_invalid_astral_character_width() {
        let source = "😀";
        let mut scanner = Scanner::new(source, false);
        assert_eq!(scanner.scan(), SyntaxKind::Unknown);
        assert_eq!(scanner.token_end(), 4);
        assert_eq!(scanner.diagnostics()[0].len, 4);
    }

    #[test]
    fn test_lone_slash_is_unknown() {
        let (kind, _, codes) = scan_one("/x");
        assert_eq!(kind, SyntaxKind::Unknown);
        assert_eq!(codes, vec!["S001"]);
    }

    // =========================================================================
    // Entities
    // =========================================================================

    #[test]
    fn test_entities() {
        assert_eq!(
            kinds("&amp;&lt;&gt;&quot;&apos;"),
            vec![
                SyntaxKind::AmpersandEntity,
                SyntaxKind::LessThanEntity,
                SyntaxKind::GreaterThanEntity,
                SyntaxKind::DoubleQuoteEntity,
                SyntaxKind::SingleQuoteEntity,
                SyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_unknown_entity_consumes_one_char() {
        let mut scanner = Scanner::new("&nbsp;", false);
        assert_eq!(scanner.scan(), SyntaxKind::Unknown);
        assert_eq!(scanner.token_end(), 1);
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    }

    // =========================================================================
    // String literals
    // =========================================================================

    #[test]
    fn test_string_quotes() {
        assert_eq!(scan_one("\"a\"").1, "a");
        assert_eq!(scan_one("'b'").1, "b");
        assert_eq!(scan_one("`c`").1, "c");
    }

    #[test]
    fn test_string_other_quotes_inside() {
        assert_eq!(scan_one("\"it's `x`\"").1, "it's `x`");
    }

    #[test]
    fn test_string_simple_escapes() {
        let (kind, value, codes) = scan_one(r#""\n\t\r\b\f\v""#);
        assert_eq!(kind, SyntaxKind::StringLiteral);
        assert_eq!(value, "\n\t\r\u{8}\u{c}\u{b}");
        assert!(codes.is_empty());
    }

    #[test]
    fn test_string_unicode_escape() {
        assert_eq!(scan_one(r#""\u0041\t""#).1, "A\t");
    }

    #[test]
    fn test_string_extended_unicode_escape() {
        let (_, value, codes) = scan_one(r#""\u{1F600}""#);
        assert_eq!(value, "😀");
        assert_eq!(value.encode_utf16().count(), 2);
        assert!(codes.is_empty());
    }

    #[test]
    fn test_string_surrogate_pair_escape() {
        assert_eq!(scan_one(r#""\uD83D\uDE00""#).1, "😀");
    }

    #[test]
    fn test_string_lone_surrogate_escape() {
        assert_eq!(scan_one(r#""\uD83Dx""#).1, "\u{FFFD}x");
    }

    #[test]
    fn test_string_hex_escape() {
        assert_eq!(scan_one(r#""\x41\x7a""#).1, "Az");
    }

    #[test]
    fn test_string_bad_hex_escape() {
        let (kind, value, codes) = scan_one(r#""\xZZ""#);
        assert_eq!(kind, SyntaxKind::StringLiteral);
        assert_eq!(value, "ZZ");
        assert_eq!(codes, vec!["S004"]);
    }

    #[test]
    fn test_string_extended_escape_out_of_range() {
        let (_, value, codes) = scan_one(r#""\u{110000}""#);
        assert_eq!(value, "");
        assert_eq!(codes, vec!["S005"]);
    }

    #[test]
    fn test_string_extended_escape_unterminated() {
        let (_, _, codes) = scan_one(r#""\u{41""#);
        assert_eq!(codes, vec!["S006"]);
    }

    #[test]
    fn test_string_extended_escape_without_digits() {
        let (_, _, codes) = scan_one(r#""\u{}""#);
        assert_eq!(codes, vec!["S004"]);
    }

    #[test]
    fn test_string_line_continuation() {
        assert_eq!(scan_one("\"a\\\r\nb\"").1, "ab");
        assert_eq!(scan_one("\"a\\\nb\"").1, "ab");
    }

    #[test]
    fn test_string_unrecognized_escape_passes_through() {
        assert_eq!(scan_one(r#""\q\"\\""#).1, "q\"\\");
    }

    #[test]
    fn test_string_unterminated() {
        let (kind, value, codes) = scan_one("\"hello");
        assert_eq!(kind, SyntaxKind::StringLiteral);
        assert_eq!(value, "hello");
        assert_eq!(codes, vec!["S002"]);
    }

    #[test]
    fn test_string_backslash_at_end() {
        let (_, value, codes) = scan_one("\"ab\\");
        assert_eq!(value, "ab");
        assert_eq!(codes, vec!["S003", "S002"]);
    }

    #[test]
    fn test_string_spans_lines() {
        let (kind, value, codes) = scan_one("'a\nb'");
        assert_eq!(kind, SyntaxKind::StringLiteral);
        assert_eq!(value, "a\nb");
        assert!(codes.is_empty());
    }

    // =========================================================================
    // Comments, CDATA, script
    // =========================================================================

    #[test]
    fn test_comment_is_trivia() {
        assert_eq!(
            kinds("<!-- hi -->"),
            vec![SyntaxKind::CommentTrivia, SyntaxKind::EndOfFile]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let mut scanner = Scanner::new("<!-- never closed", false);
        assert_eq!(scanner.scan(), SyntaxKind::Unknown);
        assert_eq!(scanner.token_end(), 17);
        assert_eq!(scanner.diagnostics()[0].message.code, "S007");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFile);
    }

    #[test]
    fn test_cdata() {
        let mut scanner = Scanner::new("<![CDATA[ <A> ]]>x", false);
        assert_eq!(scanner.scan(), SyntaxKind::CData);
        assert_eq!(scanner.token_text(), "<![CDATA[ <A> ]]>");
    }

    #[test]
    fn test_unterminated_cdata_keeps_kind() {
        let (kind, _, codes) = scan_one("<![CDATA[ open");
        assert_eq!(kind, SyntaxKind::CData);
        assert_eq!(codes, vec!["S008"]);
    }

    #[test]
    fn test_script_stops_at_first_close() {
        let source = "<script>a < b; '</script>'</script>";
        let mut scanner = Scanner::new(source, false);
        assert_eq!(scanner.scan(), SyntaxKind::Script);
        assert_eq!(scanner.token_text(), "<script>a < b; '</script>");
    }

    #[test]
    fn test_unterminated_script_keeps_kind() {
        let (kind, _, codes) = scan_one("<script>let x = 1;");
        assert_eq!(kind, SyntaxKind::Script);
        assert_eq!(codes, vec!["S009"]);
    }

    #[test]
    fn test_script_with_attributes_is_a_tag() {
        assert_eq!(scan_one("<script type='x'>").0, SyntaxKind::OpenNodeStart);
    }

    // =========================================================================
    // Cursor primitives
    // =========================================================================

    #[test]
    fn test_peek_and_scan_char() {
        let mut scanner = Scanner::new("a😀b", false);
        assert_eq!(scanner.peek_char(0), Some('a'));
        assert_eq!(scanner.peek_char(1), Some('😀'));
        assert_eq!(scanner.peek_char(3), None);
        assert_eq!(scanner.scan_char(), Some('a'));
        assert_eq!(scanner.scan_char(), Some('😀'));
        assert_eq!(scanner.pos(), 5);
        assert_eq!(scanner.scan_char(), Some('b'));
        assert_eq!(scanner.scan_char(), None);
    }

    #[test]
    fn test_back_rewinds_to_full_start() {
        let mut scanner = Scanner::new("  abc", false);
        scanner.scan();
        scanner.scan();
        assert_eq!(scanner.token(), SyntaxKind::Identifier);
        scanner.back();
        assert_eq!(scanner.pos(), 2);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    }

    #[test]
    fn test_reset_token_state() {
        let mut scanner = Scanner::new("<A b='c'/>", true);
        while scanner.scan() != SyntaxKind::EndOfFile {}
        scanner.reset_token_state(3);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_text(), "b");
    }

    #[test]
    fn test_look_ahead_rewinds_and_drops_diagnostics() {
        let mut scanner = Scanner::new("'open", false);
        let kind = scanner.look_ahead(|s| s.scan());
        assert_eq!(kind, SyntaxKind::StringLiteral);
        assert_eq!(scanner.pos(), 0);
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_try_scan_keeps_successful_scan() {
        let mut scanner = Scanner::new("abc def", true);
        let found = scanner.try_scan(|s| (s.scan() == SyntaxKind::Identifier).then_some(()));
        assert!(found.is_some());
        assert_eq!(scanner.pos(), 3);
        let missing = scanner.try_scan(|s| (s.scan() == SyntaxKind::Equal).then_some(()));
        assert!(missing.is_none());
        assert_eq!(scanner.pos(), 3);
    }

    // =========================================================================
    // Full snippets
    // =========================================================================

    #[test]
    fn test_element_snippet() {
        assert_eq!(
            kinds("<Button label=\"Hi\"/>"),
            vec![
                SyntaxKind::OpenNodeStart,
                SyntaxKind::Identifier,
                SyntaxKind::WhitespaceTrivia,
                SyntaxKind::Identifier,
                SyntaxKind::Equal,
                SyntaxKind::StringLiteral,
                SyntaxKind::NodeClose,
                SyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_tokens_cover_source() {
        let source = "<A x='1'>\n  <!-- c --> text &amp; <![CDATA[z]]>\n</A>";
        let (tokens, diagnostics) = Scanner::tokenize(source, false);
        assert!(diagnostics.is_empty());
        let rebuilt: String = tokens.iter().map(|t| t.text(source)).collect();
        assert_eq!(rebuilt, source);
    }
}
