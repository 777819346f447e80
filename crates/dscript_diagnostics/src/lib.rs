//! dscript_diagnostics: Error values and message catalogue.
//!
//! Every failure in the front end (lexing, parsing, import resolution,
//! configuration) is reported as a single positioned [`ParseError`]. There is
//! no recovery: the first error aborts the parse that produced it.

use dscript_core::text::Position;
use std::fmt;

/// Broad classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed token in the source text.
    Lexical,
    /// Unexpected token or malformed construct.
    Syntax,
    /// Construct deliberately rejected: namespaces, partial imports, `typeof`.
    UnsupportedFeature,
    /// An import could not be found or failed to parse.
    ImportResolution,
    /// A non-empty switch case block that does not end in a control transfer.
    Fallthrough,
    /// Two `case` labels with the same literal constant.
    DuplicateCase,
    /// Reading a file failed.
    Io,
    /// The project configuration is malformed.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::UnsupportedFeature => write!(f, "unsupported feature"),
            ErrorKind::ImportResolution => write!(f, "import error"),
            ErrorKind::Fallthrough => write!(f, "fallthrough error"),
            ErrorKind::DuplicateCase => write!(f, "duplicate case"),
            ErrorKind::Io => write!(f, "io error"),
            ErrorKind::Config => write!(f, "config error"),
        }
    }
}

/// A message template with its error kind.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The kind of error this message reports.
    pub kind: ErrorKind,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A positioned error. Its textual form is `"<message>\n -> <line>:<column>"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}\n -> {position}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }

    /// Build an error from a catalogue entry, filling its placeholders.
    pub fn from_message(message: &DiagnosticMessage, position: Position, args: &[&str]) -> Self {
        Self::new(message.kind, position, format_message(message.message, args))
    }

    /// The error produced when `accept` meets the wrong token.
    pub fn unexpected(position: Position, expected: &str, found: &str) -> Self {
        Self::from_message(&messages::EXPECTING_0_GOT_1, position, &[expected, found])
    }

    pub fn syntax(position: Position, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, position, message)
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

// ============================================================================
// Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($kind:ident, $msg:expr) => {
            DiagnosticMessage { kind: ErrorKind::$kind, message: $msg }
        };
    }

    // ========================================================================
    // Scanner
    // ========================================================================
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(Lexical, "unterminated string");
    pub const UNTERMINATED_MULTILINE_STRING: DiagnosticMessage = diag!(Lexical, "unterminated multiline string");
    pub const INVALID_NUMBER: DiagnosticMessage = diag!(Lexical, "Invalid number");
    pub const INVALID_HEX_NUMBER: DiagnosticMessage = diag!(Lexical, "Invalid hex number");
    pub const INVALID_HEX_ESCAPE: DiagnosticMessage = diag!(Lexical, "Invalid hex value");
    pub const INVALID_OCTAL_ESCAPE: DiagnosticMessage = diag!(Lexical, "Invalid octal value");
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(Lexical, "Unexpected character '{0}'");

    // ========================================================================
    // Parser
    // ========================================================================
    pub const EXPECTING_0_GOT_1: DiagnosticMessage = diag!(Syntax, "Expecting '{0}' got '{1}'");
    pub const UNEXPECTED_0: DiagnosticMessage = diag!(Syntax, "Unexpected '{0}'");
    pub const EXPECTING_STATEMENT: DiagnosticMessage = diag!(Syntax, "Expecting statement, got '{0}'");
    pub const EXPECTING_EXPRESSION: DiagnosticMessage = diag!(Syntax, "Expecting expression, got '{0}'");
    pub const EXPECTING_IDENTIFIER: DiagnosticMessage = diag!(Syntax, "Expecting identifier, got '{0}'");
    pub const EXPECTING_TYPE: DiagnosticMessage = diag!(Syntax, "Expecting type, got '{0}'");
    pub const UNCLOSED_BLOCK: DiagnosticMessage = diag!(Syntax, "Unclosed block");
    pub const UNCLOSED_CASE: DiagnosticMessage = diag!(Syntax, "Unclosed case");
    pub const UNCLOSED_CLASS: DiagnosticMessage = diag!(Syntax, "Unclosed class");
    pub const INVALID_ATTRIBUTE: DiagnosticMessage = diag!(Syntax, "invalid attribute");
    pub const IMPORT_AFTER_STATEMENTS: DiagnosticMessage = diag!(Syntax, "non-declaration statement outside function body");
    pub const PARAMETER_AFTER_VARIADIC: DiagnosticMessage = diag!(Syntax, "No more parameters allowed after a variadic one");
    pub const SPREAD_MUST_BE_LAST: DiagnosticMessage = diag!(Syntax, "Spread argument must be the last");
    pub const INVALID_LABEL_TARGET: DiagnosticMessage = diag!(Syntax, "Label can only be used with for, while and switch");
    pub const INVALID_ENUM_VALUE: DiagnosticMessage = diag!(Syntax, "Invalid enum value '{0}'");
    pub const INVALID_DELETE: DiagnosticMessage = diag!(Syntax, "Invalid delete expression");
    pub const INVALID_NEW_STATEMENT: DiagnosticMessage = diag!(Syntax, "Expected a call after new expression");
    pub const INVALID_STATEMENT_EXPRESSION: DiagnosticMessage = diag!(Syntax, "Invalid statement expression");
    pub const EXPECTED_GLOBAL: DiagnosticMessage = diag!(Syntax, "Expected global");
    pub const INVALID_GLOBAL_DECLARATION: DiagnosticMessage = diag!(Syntax, "Invalid declaration in global block: '{0}'");
    pub const INVALID_EXPORT: DiagnosticMessage = diag!(Syntax, "Invalid export: '{0}'");
    pub const INVALID_CLASS_MEMBER: DiagnosticMessage = diag!(Syntax, "Invalid class member: '{0}'");
    pub const INVALID_HEX_LITERAL: DiagnosticMessage = diag!(Syntax, "Error parsing hex literal '{0}'");
    pub const NESTING_TOO_DEEP: DiagnosticMessage = diag!(Syntax, "Maximum nesting depth exceeded");
    pub const IMPORTS_WITHOUT_FILESYSTEM: DiagnosticMessage = diag!(ImportResolution, "Can't parse imports because there is no filesystem");

    // ========================================================================
    // Unsupported features
    // ========================================================================
    pub const NAMESPACES_NOT_SUPPORTED: DiagnosticMessage = diag!(UnsupportedFeature, "Namespaces are not supported. Use modules instead.");
    pub const PARTIAL_IMPORTS_NOT_SUPPORTED: DiagnosticMessage = diag!(UnsupportedFeature, "Partial imports are not supported. Use import *");
    pub const TYPEOF_NOT_SUPPORTED: DiagnosticMessage = diag!(UnsupportedFeature, "The typeof operator is not valid. Use reflect.typeOf");

    // ========================================================================
    // Switch validation
    // ========================================================================
    pub const DUPLICATE_CASE: DiagnosticMessage = diag!(DuplicateCase, "Duplicate case: {0}");
    pub const FALLTHROUGH: DiagnosticMessage = diag!(Fallthrough, "Fallthrough is only allowed in empty case");

    // ========================================================================
    // Modules and configuration
    // ========================================================================
    pub const FILE_NOT_FOUND: DiagnosticMessage = diag!(Io, "File not found: {0}");
    pub const CANNOT_READ_FILE: DiagnosticMessage = diag!(Io, "Cannot read '{0}': {1}");
    pub const IMPORT_NOT_FOUND: DiagnosticMessage = diag!(ImportResolution, "Import error '{0}': file not found");
    pub const IMPORT_ERROR: DiagnosticMessage = diag!(ImportResolution, "Import error '{0}': {1}");
    pub const INVALID_CONFIG: DiagnosticMessage = diag!(Config, "Invalid config file '{0}': {1}");
    pub const INVALID_CONFIG_PATHS: DiagnosticMessage = diag!(Config, "Invalid config file '{0}': paths must contain a single \"*\" entry with a list of directories");
}
