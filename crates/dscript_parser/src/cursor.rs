//! Token cursor.
//!
//! A positionable view over the scanner output. Comment and attribute tokens
//! stay in the buffer (the file keeps its comments) but are skipped by every
//! lookup except [`TokenCursor::next_attribute`].

use dscript_ast::module::Comment;
use dscript_ast::syntax_kind::SyntaxKind;
use dscript_core::text::Position;
use dscript_diagnostics::ParseError;
use dscript_scanner::Token;

pub struct TokenCursor {
    tokens: Vec<Token>,
    /// Raw indices of the non-comment tokens; the last one is end of file.
    significant: Vec<usize>,
    /// Raw index of the first unconsumed token.
    index: usize,
    /// Position in `significant` of the first unconsumed significant token.
    next_significant: usize,
}

impl TokenCursor {
    /// Wrap a token buffer. A trailing end-of-file token is added when the
    /// buffer does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(SyntaxKind::EndOfFileToken) {
            let position = tokens.last().map(|t| t.position).unwrap_or_else(Position::start);
            tokens.push(Token::new(SyntaxKind::EndOfFileToken, "", position));
        }
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_comment())
            .map(|(i, _)| i)
            .collect();
        Self {
            tokens,
            significant,
            index: 0,
            next_significant: 0,
        }
    }

    /// Raw index of the `n`th significant token from the current position.
    #[inline]
    fn raw_index(&self, n: usize) -> usize {
        let last = self.significant.len() - 1;
        self.significant[(self.next_significant + n).min(last)]
    }

    // ========================================================================
    // Lookahead
    // ========================================================================

    #[inline]
    pub fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// The `n`th significant token ahead; the end-of-file token past the end.
    #[inline]
    pub fn peek_nth(&self, n: usize) -> &Token {
        &self.tokens[self.raw_index(n)]
    }

    #[inline]
    pub fn peek_kind(&self) -> SyntaxKind {
        self.peek().kind
    }

    #[inline]
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    /// A speculative scan starting at the current token.
    pub fn lookahead(&self) -> Lookahead<'_> {
        Lookahead { cursor: self, offset: 0 }
    }

    // ========================================================================
    // Consumption
    // ========================================================================

    /// Consume the current token. At the end of input the end-of-file token
    /// is returned again without moving.
    pub fn next(&mut self) -> Token {
        let i = self.raw_index(0);
        let token = self.tokens[i].clone();
        if token.kind != SyntaxKind::EndOfFileToken {
            self.index = i + 1;
            self.next_significant += 1;
        }
        token
    }

    /// Consume the next attribute token, when only plain comments stand
    /// before it.
    pub fn next_attribute(&mut self) -> Option<Token> {
        let offset = self.tokens[self.index..]
            .iter()
            .position(|t| !matches!(t.kind, SyntaxKind::SingleLineComment | SyntaxKind::MultiLineComment))?;
        let i = self.index + offset;
        if self.tokens[i].kind != SyntaxKind::AttributeToken {
            return None;
        }
        self.index = i + 1;
        Some(self.tokens[i].clone())
    }

    /// Consume a token of the given kind or fail with a positioned error.
    pub fn accept(&mut self, kind: SyntaxKind) -> Result<Token, ParseError> {
        let token = self.peek();
        if token.kind != kind {
            return Err(ParseError::unexpected(token.position, kind.as_str(), token.describe()));
        }
        Ok(self.next())
    }

    /// Consume the current token if it has the given kind.
    pub fn optional(&mut self, kind: SyntaxKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.next())
        } else {
            None
        }
    }

    /// Consume up to `max_count` consecutive tokens of the given kind.
    pub fn ignore_optional(&mut self, kind: SyntaxKind, max_count: usize) {
        for _ in 0..max_count {
            if self.optional(kind).is_none() {
                break;
            }
        }
    }

    /// Commit a successful [`Lookahead`] by skipping `len` significant tokens.
    pub fn advance(&mut self, len: usize) {
        for _ in 0..len {
            self.next();
        }
    }

    /// Every comment in the buffer, attributes excluded.
    pub fn comments(&self) -> Vec<Comment> {
        self.tokens
            .iter()
            .filter(|t| matches!(t.kind, SyntaxKind::SingleLineComment | SyntaxKind::MultiLineComment))
            .map(|t| Comment {
                position: t.position,
                multi_line: t.kind == SyntaxKind::MultiLineComment,
                text: t.text.clone(),
            })
            .collect()
    }
}

/// A read-only scan over the tokens ahead of a cursor. The cursor does not
/// move; the caller commits with [`TokenCursor::advance`] using
/// [`Lookahead::consumed`].
pub struct Lookahead<'a> {
    cursor: &'a TokenCursor,
    offset: usize,
}

impl<'a> Lookahead<'a> {
    pub fn peek(&self) -> &'a Token {
        self.cursor.peek_nth(self.offset)
    }

    /// Step over the current token if it has the given kind.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek().kind == kind {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    pub fn consumed(&self) -> usize {
        self.offset
    }
}
