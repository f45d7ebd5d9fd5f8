//! Hand-written scanner over the preprocessed event stream.
//!
//! The lexer is demand-driven: each [`Lexer::next_token`] call returns one
//! token and advances the scan state. Matchers run in a fixed priority
//! order: whitespace, `--` comments, nested `(* *)` comments, reserved
//! words (with a word-boundary check), lowercase and uppercase
//! identifiers, float and int literals, char and string literals,
//! multi-character operators, single-character operators, and finally a
//! one-byte `Error` token for anything unmatched.
//!
//! No token straddles a line. Multi-line comments are the only construct
//! that crosses lines, and they produce no token. The stream ends with
//! exactly one `Eof`, which repeats if polled again.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::intern::Interner;
use crate::position::{FileId, SourcePosition, Span};
use crate::source::{ScanEvent, ScanEvents, SourceManager};
use crate::token::{Token, TokenKind};

pub struct Lexer<'s> {
    events: ScanEvents<'s>,
    file: FileId,
    lineno: u32,
    line: &'s str,
    col: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(sm: &'s SourceManager) -> Self {
        Lexer {
            events: sm.events(),
            file: FileId(0),
            lineno: 1,
            line: "",
            col: 0,
        }
    }

    /// Drains the whole stream, `Eof` included.
    pub fn tokenize(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token(interner, diags);
            let kind = token.kind;
            tokens.push(token);
            if kind == TokenKind::Eof {
                return tokens;
            }
        }
    }

    pub fn next_token(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Token {
        if diags.should_abort() {
            return self.eof_token(interner);
        }
        loop {
            self.eat_blank();
            if self.col >= self.line.len() {
                if !self.advance_line() {
                    return self.eof_token(interner);
                }
                continue;
            }
            let rest = &self.line[self.col..];
            if rest.starts_with("--") {
                self.col = self.line.len();
                continue;
            }
            if rest.starts_with("(*") {
                match self.eat_comment(interner, diags) {
                    Some(error_token) => return error_token,
                    None => continue,
                }
            }
            return self.match_token(interner, diags);
        }
    }

    // ---- stream plumbing ----

    fn advance_line(&mut self) -> bool {
        loop {
            match self.events.next() {
                Some(ScanEvent::NewFile(id)) => self.file = id,
                Some(ScanEvent::Line { text, lineno }) => {
                    self.lineno = lineno;
                    self.line = text;
                    self.col = 0;
                    return true;
                }
                None => return false,
            }
        }
    }

    fn eat_blank(&mut self) {
        let bytes = self.line.as_bytes();
        while self.col < bytes.len() && (bytes[self.col] == b' ' || bytes[self.col] == b'\t') {
            self.col += 1;
        }
    }

    fn pos(&self) -> SourcePosition {
        SourcePosition::new(self.file, self.lineno, self.col as u32 + 1)
    }

    fn eof_token(&self, interner: &mut Interner) -> Token {
        let pos = self.pos();
        Token::new(TokenKind::Eof, interner.intern(""), Span::at(pos))
    }

    /// Nested `(* ... *)`. Returns an `Error` token only when the stream
    /// ends before the comment closes.
    fn eat_comment(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Option<Token> {
        let open = self.pos();
        self.col += 2;
        let mut depth = 1usize;
        loop {
            if self.col >= self.line.len() {
                if !self.advance_line() {
                    diags.error(
                        DiagnosticKind::Lexical,
                        Span::at(open),
                        "unterminated multi-line comment",
                    );
                    return Some(Token::new(
                        TokenKind::Error,
                        interner.intern("(*"),
                        Span::new(open, self.pos()),
                    ));
                }
                continue;
            }
            let rest = &self.line[self.col..];
            if rest.starts_with("(*") {
                depth += 1;
                self.col += 2;
            } else if rest.starts_with("*)") {
                depth -= 1;
                self.col += 2;
                if depth == 0 {
                    return None;
                }
            } else {
                self.col += 1;
            }
        }
    }

    // ---- matchers ----

    fn match_token(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Token {
        let bytes = self.line.as_bytes();
        let first = bytes[self.col];

        if first.is_ascii_lowercase() {
            if let Some(token) = self.match_reserved_word(interner) {
                return token;
            }
            return self.match_identifier(TokenKind::IdLower, interner);
        }
        if first.is_ascii_uppercase() {
            return self.match_identifier(TokenKind::IdUpper, interner);
        }
        if first.is_ascii_digit() {
            return self.match_number(interner, diags);
        }
        if first == b'\'' {
            return self.match_char_literal(interner, diags);
        }
        if first == b'"' {
            return self.match_string_literal(interner, diags);
        }
        let rest = &self.line[self.col..];
        for (text, kind) in TokenKind::MULTI_CHAR_OPS {
            if rest.starts_with(text) {
                return self.take(text.len(), *kind, interner);
            }
        }
        for (ch, kind) in TokenKind::SINGLE_CHAR_OPS {
            if first == *ch as u8 {
                return self.take(1, *kind, interner);
            }
        }
        self.match_unmatched(interner, diags)
    }

    fn match_reserved_word(&mut self, interner: &mut Interner) -> Option<Token> {
        let rest = &self.line[self.col..];
        for (word, kind) in TokenKind::KEYWORDS {
            if rest.starts_with(word) && !is_word_byte(rest.as_bytes().get(word.len()).copied()) {
                return Some(self.take(word.len(), *kind, interner));
            }
        }
        None
    }

    fn match_identifier(&mut self, kind: TokenKind, interner: &mut Interner) -> Token {
        let bytes = self.line.as_bytes();
        let mut end = self.col + 1;
        while end < bytes.len() && is_word_byte(Some(bytes[end])) {
            end += 1;
        }
        self.take(end - self.col, kind, interner)
    }

    /// Float and int share a prefix; the decimal point decides. `12.` and
    /// `1.5e` without digits are lexical errors, not two tokens.
    fn match_number(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Token {
        let bytes = self.line.as_bytes();
        let start = self.col;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end >= bytes.len() || bytes[end] != b'.' {
            return self.take(end - start, TokenKind::IntLit, interner);
        }
        end += 1;
        if end >= bytes.len() || !bytes[end].is_ascii_digit() {
            return self.lex_error(
                end - start,
                "expected digit after decimal point",
                interner,
                diags,
            );
        }
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'e' {
            end += 1;
            if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                end += 1;
            }
            if end >= bytes.len() || !bytes[end].is_ascii_digit() {
                return self.lex_error(
                    end - start,
                    "expected digit after exponent sign",
                    interner,
                    diags,
                );
            }
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        self.take(end - start, TokenKind::FloatLit, interner)
    }

    fn match_char_literal(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Token {
        let bytes = self.line.as_bytes();
        let start = self.col;
        match escaped_char_len(&bytes[start + 1..]) {
            Ok(len) => {
                let close = start + 1 + len;
                if bytes.get(close) == Some(&b'\'') {
                    self.take(close + 1 - start, TokenKind::CharLit, interner)
                } else {
                    let consumed = self.char_recovery_len(start);
                    self.lex_error(consumed, "invalid character literal", interner, diags)
                }
            }
            Err(msg) => {
                let consumed = self.char_recovery_len(start);
                self.lex_error(consumed, msg, interner, diags)
            }
        }
    }

    /// On a bad char literal, consume through the nearest closing quote
    /// so recovery does not re-lex the literal's body.
    fn char_recovery_len(&self, start: usize) -> usize {
        let bytes = self.line.as_bytes();
        for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
            if b == b'\'' {
                return i + 1 - start;
            }
        }
        1
    }

    fn match_string_literal(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Token {
        let bytes = self.line.as_bytes();
        let start = self.col;
        let mut i = start + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => return self.take(i + 1 - start, TokenKind::StringLit, interner),
                b'\\' if i + 1 == bytes.len() => break,
                b'\\' => match escaped_char_len(&bytes[i..]) {
                    Ok(len) => i += len,
                    Err(msg) => {
                        let consumed = string_recovery_len(bytes, start, i);
                        return self.lex_error_at(consumed, i, msg, interner, diags);
                    }
                },
                _ => i += 1,
            }
        }
        // A backslash cannot escape the line break; strings end on their
        // own line.
        self.lex_error(
            bytes.len() - start,
            "string literal may not span multiple lines",
            interner,
            diags,
        )
    }

    fn match_unmatched(&mut self, interner: &mut Interner, diags: &mut Diagnostics) -> Token {
        let ch = self.line[self.col..].chars().next().unwrap_or('\u{fffd}');
        self.lex_error(
            ch.len_utf8(),
            format!("invalid character '{}'", ch.escape_default()),
            interner,
            diags,
        )
    }

    // ---- token construction ----

    fn take(&mut self, len: usize, kind: TokenKind, interner: &mut Interner) -> Token {
        let start = self.pos();
        let lexeme = interner.intern(&self.line[self.col..self.col + len]);
        self.col += len;
        Token::new(kind, lexeme, Span::new(start, self.pos()))
    }

    fn lex_error(
        &mut self,
        len: usize,
        message: impl Into<String>,
        interner: &mut Interner,
        diags: &mut Diagnostics,
    ) -> Token {
        let at = self.col;
        self.lex_error_at(len, at, message, interner, diags)
    }

    /// Emits an `Error` token covering `len` bytes from the current
    /// column, with the diagnostic anchored at byte `at` of the line.
    fn lex_error_at(
        &mut self,
        len: usize,
        at: usize,
        message: impl Into<String>,
        interner: &mut Interner,
        diags: &mut Diagnostics,
    ) -> Token {
        let anchor = SourcePosition::new(self.file, self.lineno, at as u32 + 1);
        diags.error(DiagnosticKind::Lexical, Span::at(anchor), message);
        self.take(len, TokenKind::Error, interner)
    }
}

fn is_word_byte(b: Option<u8>) -> bool {
    matches!(b, Some(b) if b.is_ascii_alphanumeric() || b == b'_')
}

/// Length in bytes of one (possibly escaped) char at the head of `bytes`,
/// or the reason it is invalid. Shared by char and string literals.
fn escaped_char_len(bytes: &[u8]) -> Result<usize, &'static str> {
    match bytes.first() {
        None => Err("invalid character literal"),
        Some(b'\\') => match bytes.get(1) {
            Some(b'n') | Some(b't') | Some(b'r') | Some(b'0') | Some(b'\\') | Some(b'\'')
            | Some(b'"') => Ok(2),
            Some(b'x') => {
                let ok = matches!(bytes.get(2), Some(b) if is_lower_hex(*b))
                    && matches!(bytes.get(3), Some(b) if is_lower_hex(*b));
                if ok {
                    Ok(4)
                } else {
                    Err("invalid hex escape sequence")
                }
            }
            _ => Err("invalid escape sequence"),
        },
        Some(b'\'') | Some(b'"') => Err("invalid character literal"),
        Some(_) => Ok(1),
    }
}

fn is_lower_hex(b: u8) -> bool {
    b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
}

fn string_recovery_len(bytes: &[u8], start: usize, from: usize) -> usize {
    for (i, &b) in bytes.iter().enumerate().skip(from + 1) {
        if b == b'"' {
            return i + 1 - start;
        }
    }
    bytes.len() - start
}
