//! Tokens produced by the scanner.

use dscript_ast::syntax_kind::SyntaxKind;
use dscript_core::text::Position;

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// The text of the token. For strings this is the unescaped value, for
    /// comments the text after the delimiters and for attributes the text
    /// inside the brackets.
    pub text: String,
    /// Where the token starts.
    pub position: Position,
}

impl Token {
    pub fn new(kind: SyntaxKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Whether the token is a plain identifier with exactly this text.
    #[inline]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == SyntaxKind::Identifier && self.text == word
    }

    /// Text suitable for error messages.
    pub fn describe(&self) -> &str {
        match self.kind {
            SyntaxKind::EndOfFileToken => "EOF",
            _ if self.text.is_empty() => self.kind.as_str(),
            _ => &self.text,
        }
    }
}
