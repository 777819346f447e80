//! The dscript scanner.
//!
//! Converts source text into a flat list of tokens. Comments are kept as
//! tokens so the parser can collect them and read `// [ ... ]` attributes.

use crate::char_codes::*;
use crate::token::Token;
use dscript_ast::syntax_kind::SyntaxKind;
use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};

/// Everything from this marker to the end of the source is ignored.
pub const IGNORE_MARKER: &str = "//ts:ignore";

/// Normalize raw source before scanning: drop everything after
/// [`IGNORE_MARKER`] and remove carriage returns.
pub fn prepare_source(text: &str) -> String {
    let text = match memchr::memmem::find(text.as_bytes(), IGNORE_MARKER.as_bytes()) {
        Some(idx) => &text[..idx],
        None => text,
    };
    if memchr::memchr(b'\r', text.as_bytes()).is_some() {
        text.replace('\r', "")
    } else {
        text.to_string()
    }
}

/// Scan a whole source text.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    Scanner::new(text).scan_all()
}

/// The scanner converts source text into tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: Vec<char>,
    /// Current position in the text.
    pos: usize,
    /// Line of the current position (1-based).
    line: u32,
    /// Column of the current position (1-based).
    column: u32,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan every token. The last token is always `EndOfFileToken`.
    pub fn scan_all(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan()?;
            let done = token.kind == SyntaxKind::EndOfFileToken;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos).copied()
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset).copied()
    }

    #[inline]
    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Consume one character, keeping line and column up to date.
    fn advance(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.pos += 1;
        if is_line_break(ch) {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_white_space(&mut self) {
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) || is_white_space_single_line(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume `len` characters and produce a punctuation token.
    fn punctuation(&mut self, len: usize, kind: SyntaxKind, start: Position) -> Token {
        for _ in 0..len {
            self.advance();
        }
        Token::new(kind, kind.as_str(), start)
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> Result<Token, ParseError> {
        self.skip_white_space();
        let start = self.position();

        let Some(ch) = self.current_char() else {
            return Ok(Token::new(SyntaxKind::EndOfFileToken, "", start));
        };

        if is_identifier_start(ch) {
            return Ok(self.scan_identifier(start));
        }
        if is_digit(ch) {
            return self.scan_number(start);
        }

        let next = self.char_at(1);
        let token = match ch {
            '"' => self.scan_string('"', start)?,
            '\'' => {
                let mut token = self.scan_string('\'', start)?;
                if token.text.chars().count() == 1 {
                    token.kind = SyntaxKind::RuneLiteral;
                }
                token
            }
            '`' => self.scan_template(start)?,
            '(' => self.punctuation(1, SyntaxKind::OpenParenToken, start),
            ')' => self.punctuation(1, SyntaxKind::CloseParenToken, start),
            '{' => self.punctuation(1, SyntaxKind::OpenBraceToken, start),
            '}' => self.punctuation(1, SyntaxKind::CloseBraceToken, start),
            '[' => self.punctuation(1, SyntaxKind::OpenBracketToken, start),
            ']' => self.punctuation(1, SyntaxKind::CloseBracketToken, start),
            ';' => self.punctuation(1, SyntaxKind::SemicolonToken, start),
            ',' => self.punctuation(1, SyntaxKind::CommaToken, start),
            '~' => self.punctuation(1, SyntaxKind::TildeToken, start),
            '.' => {
                if next == Some('.') && self.char_at(2) == Some('.') {
                    self.punctuation(3, SyntaxKind::DotDotDotToken, start)
                } else {
                    self.punctuation(1, SyntaxKind::DotToken, start)
                }
            }
            ':' => match next {
                Some('=') => self.punctuation(2, SyntaxKind::ColonEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::ColonToken, start),
            },
            '?' => match next {
                Some('?') => self.punctuation(2, SyntaxKind::QuestionQuestionToken, start),
                Some('.') if !self.char_at(2).is_some_and(is_digit) => {
                    self.punctuation(2, SyntaxKind::QuestionDotToken, start)
                }
                _ => self.punctuation(1, SyntaxKind::QuestionToken, start),
            },
            '<' => match next {
                Some('=') => self.punctuation(2, SyntaxKind::LessThanEqualsToken, start),
                Some('<') => self.punctuation(2, SyntaxKind::LessThanLessThanToken, start),
                _ => self.punctuation(1, SyntaxKind::LessThanToken, start),
            },
            // `>>` is recombined by the parser so generic closers stay separate.
            '>' => match next {
                Some('=') => self.punctuation(2, SyntaxKind::GreaterThanEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::GreaterThanToken, start),
            },
            '=' => match (next, self.char_at(2)) {
                (Some('='), Some('=')) => self.punctuation(3, SyntaxKind::EqualsEqualsEqualsToken, start),
                (Some('='), _) => self.punctuation(2, SyntaxKind::EqualsEqualsToken, start),
                (Some('>'), _) => self.punctuation(2, SyntaxKind::EqualsGreaterThanToken, start),
                _ => self.punctuation(1, SyntaxKind::EqualsToken, start),
            },
            '!' => match (next, self.char_at(2)) {
                (Some('='), Some('=')) => {
                    self.punctuation(3, SyntaxKind::ExclamationEqualsEqualsToken, start)
                }
                (Some('='), _) => self.punctuation(2, SyntaxKind::ExclamationEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::ExclamationToken, start),
            },
            '+' => match next {
                Some('+') => self.punctuation(2, SyntaxKind::PlusPlusToken, start),
                Some('=') => self.punctuation(2, SyntaxKind::PlusEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::PlusToken, start),
            },
            '-' => match next {
                Some('-') => self.punctuation(2, SyntaxKind::MinusMinusToken, start),
                Some('=') => self.punctuation(2, SyntaxKind::MinusEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::MinusToken, start),
            },
            '*' => match next {
                Some('*') => self.punctuation(2, SyntaxKind::AsteriskAsteriskToken, start),
                Some('=') => self.punctuation(2, SyntaxKind::AsteriskEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::AsteriskToken, start),
            },
            '/' => match next {
                Some('/') => self.scan_line_comment(start),
                Some('*') => self.scan_block_comment(start),
                Some('=') => self.punctuation(2, SyntaxKind::SlashEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::SlashToken, start),
            },
            '%' => match next {
                Some('=') => self.punctuation(2, SyntaxKind::PercentEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::PercentToken, start),
            },
            '&' => match next {
                Some('&') => self.punctuation(2, SyntaxKind::AmpersandAmpersandToken, start),
                _ => self.punctuation(1, SyntaxKind::AmpersandToken, start),
            },
            '|' => match next {
                Some('|') => self.punctuation(2, SyntaxKind::BarBarToken, start),
                Some('=') => self.punctuation(2, SyntaxKind::BarEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::BarToken, start),
            },
            '^' => match next {
                Some('=') => self.punctuation(2, SyntaxKind::CaretEqualsToken, start),
                _ => self.punctuation(1, SyntaxKind::CaretToken, start),
            },
            other => {
                return Err(ParseError::from_message(
                    &messages::UNEXPECTED_CHARACTER,
                    start,
                    &[&other.to_string()],
                ))
            }
        };
        Ok(token)
    }

    // ========================================================================
    // Identifiers and numbers
    // ========================================================================

    fn scan_identifier(&mut self, start: Position) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        let kind = SyntaxKind::from_keyword(&text).unwrap_or(SyntaxKind::Identifier);
        Token::new(kind, text, start)
    }

    fn scan_number(&mut self, start: Position) -> Result<Token, ParseError> {
        if self.current_char() == Some('0') && matches!(self.char_at(1), Some('x' | 'X')) {
            return self.scan_hex_number(start);
        }

        let mut text = String::new();
        self.scan_digits(&mut text);

        if self.current_char() != Some('.') {
            return Ok(Token::new(SyntaxKind::IntLiteral, text, start));
        }
        // `1...` is an int followed by a spread, not a malformed float.
        if self.char_at(1) == Some('.') {
            return Ok(Token::new(SyntaxKind::IntLiteral, text, start));
        }

        text.push('.');
        self.advance();
        if !self.current_char().is_some_and(is_digit) {
            return Err(ParseError::from_message(&messages::INVALID_NUMBER, start, &[]));
        }
        self.scan_digits(&mut text);
        Ok(Token::new(SyntaxKind::FloatLiteral, text, start))
    }

    /// Decimal digits; `_` separators are dropped.
    fn scan_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.current_char() {
            if ch == '_' {
                self.advance();
            } else if is_digit(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_hex_number(&mut self, start: Position) -> Result<Token, ParseError> {
        let mut text = String::from("0x");
        self.advance();
        self.advance();
        while let Some(ch) = self.current_char() {
            if !is_hex_digit(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        let trailing_letter = self.current_char().is_some_and(|c| c.is_ascii_alphabetic());
        if text.len() == 2 || trailing_letter {
            return Err(ParseError::from_message(&messages::INVALID_HEX_NUMBER, start, &[]));
        }
        Ok(Token::new(SyntaxKind::HexLiteral, text, start))
    }

    // ========================================================================
    // Strings
    // ========================================================================

    fn scan_string(&mut self, quote: char, start: Position) -> Result<Token, ParseError> {
        self.advance();
        let mut text = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                return Err(ParseError::from_message(&messages::UNTERMINATED_STRING, start, &[]));
            };
            if is_line_break(ch) {
                return Err(ParseError::from_message(&messages::UNTERMINATED_STRING, start, &[]));
            }
            self.advance();
            if ch == quote {
                break;
            }
            if ch == '\\' {
                self.scan_escape(&mut text, start)?;
            } else {
                text.push(ch);
            }
        }
        Ok(Token::new(SyntaxKind::StringLiteral, text, start))
    }

    /// Called after a backslash.
    fn scan_escape(&mut self, text: &mut String, start: Position) -> Result<(), ParseError> {
        let Some(ch) = self.advance() else {
            return Err(ParseError::from_message(&messages::UNTERMINATED_STRING, start, &[]));
        };
        match ch {
            't' => text.push('\t'),
            'n' => text.push('\n'),
            'r' => text.push('\r'),
            '\'' | '"' | '\\' => text.push(ch),
            'x' => {
                let digits: String = [self.advance(), self.advance()].iter().flatten().collect();
                let value = u8::from_str_radix(&digits, 16).map_err(|_| {
                    ParseError::from_message(&messages::INVALID_HEX_ESCAPE, start, &[])
                })?;
                text.push(char::from(value));
            }
            c if is_digit(c) => {
                let rest: String = [self.advance(), self.advance()].iter().flatten().collect();
                let digits = format!("{}{}", c, rest);
                let valid = digits.len() == 3 && digits.chars().all(is_octal_digit);
                let value = u8::from_str_radix(&digits, 8).ok().filter(|_| valid).ok_or_else(|| {
                    ParseError::from_message(&messages::INVALID_OCTAL_ESCAPE, start, &[])
                })?;
                text.push(char::from(value));
            }
            other => {
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }

    /// Backtick strings are raw and may span lines.
    fn scan_template(&mut self, start: Position) -> Result<Token, ParseError> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('`') => break,
                Some(ch) => text.push(ch),
                None => {
                    return Err(ParseError::from_message(
                        &messages::UNTERMINATED_MULTILINE_STRING,
                        start,
                        &[],
                    ))
                }
            }
        }
        Ok(Token::new(SyntaxKind::StringLiteral, text, start))
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn scan_line_comment(&mut self, start: Position) -> Token {
        self.advance();
        self.advance();
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }

        let trimmed = text.trim();
        if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
            let inner = trimmed[1..trimmed.len() - 1].trim();
            return Token::new(SyntaxKind::AttributeToken, inner, start);
        }
        Token::new(SyntaxKind::SingleLineComment, text, start)
    }

    /// An unterminated block comment runs to the end of the text.
    fn scan_block_comment(&mut self, start: Position) -> Token {
        self.advance();
        self.advance();
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '*' && self.char_at(1) == Some('/') {
                self.advance();
                self.advance();
                break;
            }
            text.push(ch);
            self.advance();
        }
        Token::new(SyntaxKind::MultiLineComment, text, start)
    }
}
