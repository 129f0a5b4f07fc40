//! The ADL scanner/lexer.
//!
//! Converts source text into a stream of tokens the parser pulls one at a
//! time. Unlike many lexers it emits trivia (whitespace, newlines,
//! comments) as real tokens: the parser owns trivia skipping because
//! newlines become significant inside directive arguments and comments may
//! be collected into the tree.
//!
//! The scanner has two modes. `scan` produces syntax tokens; `scan_doc`
//! produces the coarser token set used inside `/** … */` doc comments. A
//! scoped sub-range scan (`scan_range`) re-reads a doc comment's interior
//! without disturbing the main cursor.

use crate::char_codes::*;
use adl_ast::syntax_kind::SyntaxKind;
use adl_ast::types::TokenFlags;
use adl_core::text::{TextPos, TextRange};
use adl_diagnostics::{Diagnostic, DiagnosticCollection};

/// An in-progress scoped sub-range scan; see [`Scanner::enter_range`].
pub struct RangeScope {
    state: ScannerState,
}

/// Saved scanner state, used by scoped sub-range scans.
struct ScannerState {
    pos: usize,
    end_pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
}

/// The scanner converts ADL source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: Vec<char>,
    /// Current position in the text.
    pos: usize,
    /// Scanning stops here; `text.len()` except inside `scan_range`.
    end_pos: usize,
    /// Start of the current token.
    token_start: usize,
    /// The current token kind.
    token: SyntaxKind,
    /// The value of the current token (identifier text, unescaped string
    /// value, numeric text).
    token_value: String,
    /// Flags for the current token.
    token_flags: TokenFlags,
    /// Accumulated scanner diagnostics.
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(text: &str) -> Self {
        let text: Vec<char> = text.chars().collect();
        let end_pos = text.len();
        Self {
            text,
            pos: 0,
            end_pos,
            token_start: 0,
            token: SyntaxKind::None,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Get the current token kind.
    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Get the current token's value.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Get the start position of the current token.
    #[inline]
    pub fn token_position(&self) -> TextPos {
        self.token_start as TextPos
    }

    /// Get the current position (end of the current token).
    #[inline]
    pub fn position(&self) -> TextPos {
        self.pos as TextPos
    }

    /// Get the current token flags.
    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    /// The range of the current token.
    #[inline]
    pub fn token_range(&self) -> TextRange {
        TextRange::new(self.token_position(), self.position())
    }

    /// The raw source text of the current token.
    pub fn token_text(&self) -> String {
        self.chars_to_string(self.token_start, self.pos)
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    /// Total length of the source text.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Run `f` with the scanner retargeted at `range`, then restore the
    /// cursor. Used to re-scan a doc comment's interior in doc mode.
    pub fn scan_range<T>(&mut self, range: TextRange, f: impl FnOnce(&mut Self) -> T) -> T {
        let scope = self.enter_range(range);
        let result = f(self);
        self.exit_range(scope);
        result
    }

    /// Retarget the scanner at `range`. The returned scope must be handed
    /// back to [`Scanner::exit_range`] to restore the cursor; callers that
    /// can use a closure should prefer [`Scanner::scan_range`].
    pub fn enter_range(&mut self, range: TextRange) -> RangeScope {
        let state = self.save_state();
        self.pos = range.pos as usize;
        self.end_pos = (range.end as usize).min(self.text.len());
        self.token_start = self.pos;
        self.token = SyntaxKind::None;
        self.token_value.clear();
        self.token_flags = TokenFlags::NONE;
        RangeScope { state }
    }

    /// Leave a scoped sub-range scan, restoring the saved cursor.
    pub fn exit_range(&mut self, scope: RangeScope) {
        self.restore_state(scope.state);
    }

    fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            end_pos: self.end_pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
        }
    }

    fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.end_pos = state.end_pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        if self.pos < self.end_pos {
            Some(self.text[self.pos])
        } else {
            None
        }
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        let index = self.pos + offset;
        if index < self.end_pos {
            Some(self.text[index])
        } else {
            None
        }
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.end_pos
    }

    /// Scan the next syntax token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.token_start = self.pos;

        if self.is_eof() {
            self.token = SyntaxKind::EndOfFile;
            return self.token;
        }

        let ch = self.text[self.pos];
        self.token = match ch {
            '\r' => {
                self.pos += 1;
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
                SyntaxKind::NewLine
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.pos += 1;
                SyntaxKind::NewLine
            }
            c if is_white_space_single_line(c) => {
                self.pos += 1;
                while !self.is_eof() && is_white_space_single_line(self.text[self.pos]) {
                    self.pos += 1;
                }
                SyntaxKind::Whitespace
            }

            '{' => self.one(SyntaxKind::OpenBrace),
            '}' => self.one(SyntaxKind::CloseBrace),
            '(' => self.one(SyntaxKind::OpenParen),
            ')' => self.one(SyntaxKind::CloseParen),
            '[' => self.one(SyntaxKind::OpenBracket),
            ']' => self.one(SyntaxKind::CloseBracket),
            ';' => self.one(SyntaxKind::Semicolon),
            ',' => self.one(SyntaxKind::Comma),
            '?' => self.one(SyntaxKind::Question),
            '#' => self.one(SyntaxKind::Hash),

            '.' => self.scan_dot(),
            ':' => self.scan_colon(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equals(),
            '!' => self.scan_exclamation(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_bar(),
            '@' => self.scan_at(),
            '+' => self.one(SyntaxKind::Plus),
            '-' => self.one(SyntaxKind::Minus),
            '*' => self.one(SyntaxKind::Asterisk),
            '/' => self.scan_slash(),

            '"' => self.scan_string_literal(),
            '0'..='9' => self.scan_number(),

            _ if is_identifier_start(ch) => self.scan_identifier(),

            _ => {
                self.pos += 1;
                self.diagnostics.add(Diagnostic::with_location(
                    String::new(),
                    TextRange::new(self.token_start as TextPos, self.pos as TextPos).to_span(),
                    &adl_diagnostics::messages::INVALID_CHARACTER,
                    &[],
                ));
                SyntaxKind::None
            }
        };

        self.token
    }

    /// Scan the next doc-mode token. The doc token set is coarse: newlines,
    /// whitespace runs, `*`, `@`, identifiers, and text runs.
    pub fn scan_doc(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.token_start = self.pos;

        if self.is_eof() {
            self.token = SyntaxKind::EndOfFile;
            return self.token;
        }

        let ch = self.text[self.pos];
        self.token = match ch {
            '\r' => {
                self.pos += 1;
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
                SyntaxKind::NewLine
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.pos += 1;
                SyntaxKind::NewLine
            }
            c if is_white_space_single_line(c) => {
                self.pos += 1;
                while !self.is_eof() && is_white_space_single_line(self.text[self.pos]) {
                    self.pos += 1;
                }
                SyntaxKind::Whitespace
            }
            '*' => self.one(SyntaxKind::Asterisk),
            '@' => self.one(SyntaxKind::At),
            // Tag and parameter names; never keyword-mapped in doc mode.
            c if is_identifier_start(c) => {
                self.pos += 1;
                while !self.is_eof() && is_identifier_part(self.text[self.pos]) {
                    self.pos += 1;
                }
                self.token_value = self.chars_to_string(self.token_start, self.pos);
                SyntaxKind::Identifier
            }
            _ => {
                while !self.is_eof() {
                    let c = self.text[self.pos];
                    if is_line_break(c) || c == '@' || c == '*' {
                        break;
                    }
                    self.pos += 1;
                }
                self.token_value = self.chars_to_string(self.token_start, self.pos);
                SyntaxKind::DocText
            }
        };

        self.token
    }

    #[inline]
    fn one(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_dot(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('.') && self.char_at(2) == Some('.') {
            self.pos += 3;
            SyntaxKind::Ellipsis
        } else {
            self.pos += 1;
            SyntaxKind::Dot
        }
    }

    fn scan_colon(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some(':') {
            self.pos += 2;
            SyntaxKind::ColonColon
        } else {
            self.pos += 1;
            SyntaxKind::Colon
        }
    }

    fn scan_less_than(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::LessThanEquals
        } else {
            self.pos += 1;
            SyntaxKind::LessThan
        }
    }

    fn scan_greater_than(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::GreaterThanEquals
        } else {
            self.pos += 1;
            SyntaxKind::GreaterThan
        }
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::EqualsEquals
        } else if self.char_at(1) == Some('>') {
            self.pos += 2;
            SyntaxKind::EqualsGreaterThan
        } else {
            self.pos += 1;
            SyntaxKind::Equals
        }
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('=') {
            self.pos += 2;
            SyntaxKind::ExclamationEquals
        } else {
            self.pos += 1;
            SyntaxKind::Exclamation
        }
    }

    fn scan_ampersand(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('&') {
            self.pos += 2;
            SyntaxKind::AmpersandAmpersand
        } else {
            self.pos += 1;
            SyntaxKind::Ampersand
        }
    }

    fn scan_bar(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('|') {
            self.pos += 2;
            SyntaxKind::BarBar
        } else {
            self.pos += 1;
            SyntaxKind::Bar
        }
    }

    fn scan_at(&mut self) -> SyntaxKind {
        if self.char_at(1) == Some('@') {
            self.pos += 2;
            SyntaxKind::AtAt
        } else {
            self.pos += 1;
            SyntaxKind::At
        }
    }

    fn scan_slash(&mut self) -> SyntaxKind {
        match self.char_at(1) {
            Some('/') => {
                self.pos += 2;
                while !self.is_eof() && !is_line_break(self.text[self.pos]) {
                    self.pos += 1;
                }
                SyntaxKind::SingleLineComment
            }
            Some('*') => self.scan_multi_line_comment(),
            _ => {
                self.pos += 1;
                SyntaxKind::ForwardSlash
            }
        }
    }

    fn scan_multi_line_comment(&mut self) -> SyntaxKind {
        // A doc comment opens with `/**` and is more than just `/**/`.
        if self.char_at(2) == Some('*') && self.char_at(3) != Some('/') {
            self.token_flags |= TokenFlags::DOC_COMMENT;
        }
        self.pos += 2;
        loop {
            if self.is_eof() {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.diagnostics.add(Diagnostic::with_location(
                    String::new(),
                    TextRange::new(self.token_start as TextPos, self.pos as TextPos).to_span(),
                    &adl_diagnostics::messages::UNTERMINATED_COMMENT,
                    &[],
                ));
                break;
            }
            if self.text[self.pos] == '*' && self.char_at(1) == Some('/') {
                self.pos += 2;
                break;
            }
            self.pos += 1;
        }
        SyntaxKind::MultiLineComment
    }

    fn scan_string_literal(&mut self) -> SyntaxKind {
        self.pos += 1; // skip opening quote
        let mut result = String::new();
        loop {
            if self.is_eof() {
                self.report_unterminated_string();
                break;
            }
            let ch = self.text[self.pos];
            if ch == '"' {
                self.pos += 1;
                break;
            }
            if is_line_break(ch) {
                self.report_unterminated_string();
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                match self.current_char() {
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some('\'') => result.push('\''),
                    Some(other) => {
                        // Unknown escape: keep the character as written.
                        result.push(other);
                    }
                    None => {
                        self.report_unterminated_string();
                        break;
                    }
                }
                self.pos += 1;
                continue;
            }
            result.push(ch);
            self.pos += 1;
        }
        self.token_value = result;
        SyntaxKind::StringLiteral
    }

    fn report_unterminated_string(&mut self) {
        self.token_flags |= TokenFlags::UNTERMINATED;
        self.diagnostics.add(Diagnostic::with_location(
            String::new(),
            TextRange::new(self.token_start as TextPos, self.pos as TextPos).to_span(),
            &adl_diagnostics::messages::UNTERMINATED_STRING_LITERAL,
            &[],
        ));
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;

        if self.text[self.pos] == '0' {
            match self.char_at(1) {
                Some('x') | Some('X') => return self.scan_radix_number(start, 16),
                Some('b') | Some('B') => return self.scan_radix_number(start, 2),
                _ => {}
            }
        }

        self.scan_digits();
        if self.current_char() == Some('.') && self.char_at(1).map_or(false, is_digit) {
            self.pos += 1;
            self.scan_digits();
        }
        if let Some('e') | Some('E') = self.current_char() {
            self.pos += 1;
            if let Some('+') | Some('-') = self.current_char() {
                self.pos += 1;
            }
            self.scan_digits();
        }

        self.token_value = self.chars_to_string(start, self.pos);
        SyntaxKind::NumericLiteral
    }

    fn scan_radix_number(&mut self, start: usize, radix: u32) -> SyntaxKind {
        self.pos += 2; // skip 0x / 0b
        while !self.is_eof() {
            let ch = self.text[self.pos];
            let is_radix_digit = match radix {
                16 => is_hex_digit(ch),
                _ => is_binary_digit(ch),
            };
            if ch == '_' || is_radix_digit {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.token_value = self.chars_to_string(start, self.pos);
        SyntaxKind::NumericLiteral
    }

    fn scan_digits(&mut self) {
        while !self.is_eof() {
            let ch = self.text[self.pos];
            if ch == '_' || is_digit(ch) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        while !self.is_eof() && is_identifier_part(self.text[self.pos]) {
            self.pos += 1;
        }
        let text = self.chars_to_string(start, self.pos);

        if let Some(keyword) = SyntaxKind::from_keyword(&text) {
            self.token_value = text;
            return keyword;
        }

        self.token_value = text;
        SyntaxKind::Identifier
    }

    fn chars_to_string(&self, start: usize, end: usize) -> String {
        self.text[start..end].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(source: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(source);
        let mut kinds = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFile {
                break;
            }
            kinds.push(kind);
        }
        kinds
    }

    fn scan_significant(source: &str) -> Vec<SyntaxKind> {
        scan_all(source)
            .into_iter()
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_scan_punctuation() {
        assert_eq!(
            scan_significant("{ } ( ) [ ] ; , : :: ..."),
            vec![
                SyntaxKind::OpenBrace,
                SyntaxKind::CloseBrace,
                SyntaxKind::OpenParen,
                SyntaxKind::CloseParen,
                SyntaxKind::OpenBracket,
                SyntaxKind::CloseBracket,
                SyntaxKind::Semicolon,
                SyntaxKind::Comma,
                SyntaxKind::Colon,
                SyntaxKind::ColonColon,
                SyntaxKind::Ellipsis,
            ]
        );
    }

    #[test]
    fn test_scan_operators() {
        assert_eq!(
            scan_significant("= == != => < <= > >= & && | || ! + - * /"),
            vec![
                SyntaxKind::Equals,
                SyntaxKind::EqualsEquals,
                SyntaxKind::ExclamationEquals,
                SyntaxKind::EqualsGreaterThan,
                SyntaxKind::LessThan,
                SyntaxKind::LessThanEquals,
                SyntaxKind::GreaterThan,
                SyntaxKind::GreaterThanEquals,
                SyntaxKind::Ampersand,
                SyntaxKind::AmpersandAmpersand,
                SyntaxKind::Bar,
                SyntaxKind::BarBar,
                SyntaxKind::Exclamation,
                SyntaxKind::Plus,
                SyntaxKind::Minus,
                SyntaxKind::Asterisk,
                SyntaxKind::ForwardSlash,
            ]
        );
    }

    #[test]
    fn test_scan_at_and_hash() {
        assert_eq!(
            scan_significant("@ @@ #"),
            vec![SyntaxKind::At, SyntaxKind::AtAt, SyntaxKind::Hash]
        );
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        let mut scanner = Scanner::new("model Pet");
        assert_eq!(scanner.scan(), SyntaxKind::ModelKeyword);
        assert_eq!(scanner.token_value(), "model");
        assert_eq!(scanner.scan(), SyntaxKind::Whitespace);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "Pet");
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFile);
    }

    #[test]
    fn test_scan_reserved_keyword() {
        let mut scanner = Scanner::new("struct");
        assert_eq!(scanner.scan(), SyntaxKind::StructKeyword);
        assert!(scanner.token().is_reserved_keyword());
    }

    #[test]
    fn test_scan_trivia_tokens() {
        assert_eq!(
            scan_all("a b\nc"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Whitespace,
                SyntaxKind::Identifier,
                SyntaxKind::NewLine,
                SyntaxKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_scan_crlf_is_one_newline() {
        assert_eq!(
            scan_all("a\r\nb"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::NewLine,
                SyntaxKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_scan_string_literal() {
        let mut scanner = Scanner::new(r#""hello \"world\"\n""#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "hello \"world\"\n");
        assert!(!scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    }

    #[test]
    fn test_scan_unterminated_string() {
        let mut scanner = Scanner::new("\"abc");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
        assert_eq!(scanner.token_value(), "abc");
    }

    #[test]
    fn test_scan_number_formats() {
        let mut scanner = Scanner::new("42 3.14 1e10 0xff 0b1010 1_000");
        for expected in ["42", "3.14", "1e10", "0xff", "0b1010", "1_000"] {
            loop {
                let kind = scanner.scan();
                if !kind.is_trivia() {
                    assert_eq!(kind, SyntaxKind::NumericLiteral);
                    assert_eq!(scanner.token_value(), expected);
                    break;
                }
            }
        }
    }

    #[test]
    fn test_scan_comments() {
        assert_eq!(
            scan_all("// line\n/* block */"),
            vec![
                SyntaxKind::SingleLineComment,
                SyntaxKind::NewLine,
                SyntaxKind::MultiLineComment,
            ]
        );
    }

    #[test]
    fn test_doc_comment_flag() {
        let mut scanner = Scanner::new("/** doc */ /* plain */ /**/");
        assert_eq!(scanner.scan(), SyntaxKind::MultiLineComment);
        assert!(scanner.token_flags().contains(TokenFlags::DOC_COMMENT));
        scanner.scan(); // whitespace
        assert_eq!(scanner.scan(), SyntaxKind::MultiLineComment);
        assert!(!scanner.token_flags().contains(TokenFlags::DOC_COMMENT));
        scanner.scan(); // whitespace
        assert_eq!(scanner.scan(), SyntaxKind::MultiLineComment);
        assert!(!scanner.token_flags().contains(TokenFlags::DOC_COMMENT));
    }

    #[test]
    fn test_unterminated_comment() {
        let mut scanner = Scanner::new("/** doc");
        assert_eq!(scanner.scan(), SyntaxKind::MultiLineComment);
        assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
        assert!(scanner.token_flags().contains(TokenFlags::DOC_COMMENT));
    }

    #[test]
    fn test_scan_doc_mode() {
        let mut scanner = Scanner::new("hello @param foo - desc");
        let mut kinds = Vec::new();
        loop {
            let kind = scanner.scan_doc();
            if kind == SyntaxKind::EndOfFile {
                break;
            }
            kinds.push((kind, scanner.token_value().to_string()));
        }
        assert_eq!(kinds[0].0, SyntaxKind::Identifier);
        assert_eq!(kinds[0].1, "hello");
        let at = kinds.iter().position(|(k, _)| *k == SyntaxKind::At).unwrap();
        assert_eq!(kinds[at + 1].0, SyntaxKind::Identifier);
        assert_eq!(kinds[at + 1].1, "param");
    }

    #[test]
    fn test_scan_doc_mode_never_keywords() {
        let mut scanner = Scanner::new("model");
        assert_eq!(scanner.scan_doc(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "model");
    }

    #[test]
    fn test_scan_range_restores_cursor() {
        let mut scanner = Scanner::new("abc def");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        let inner = scanner.scan_range(TextRange::new(4, 7), |s| {
            let kind = s.scan_doc();
            (kind, s.token_value().to_string())
        });
        assert_eq!(inner, (SyntaxKind::Identifier, "def".to_string()));
        // Cursor is back on `abc`.
        assert_eq!(scanner.token(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "abc");
        assert_eq!(scanner.scan(), SyntaxKind::Whitespace);
    }

    #[test]
    fn test_invalid_character() {
        let mut scanner = Scanner::new("`");
        assert_eq!(scanner.scan(), SyntaxKind::None);
        assert!(!scanner.take_diagnostics().is_empty());
    }

    #[test]
    fn test_unicode_identifier() {
        let mut scanner = Scanner::new("café");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "café");
    }
}
