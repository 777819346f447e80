//! Scanner integration tests.
//!
//! Verifies that the scanner correctly tokenizes the dscript token set.

use dscript_ast::syntax_kind::SyntaxKind;
use dscript_diagnostics::ErrorKind;
use dscript_scanner::{tokenize, Scanner};

/// Helper: scan all tokens from source and return as (kind, text) pairs,
/// without the trailing end-of-file token.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut tokens = Scanner::new(source).scan_all().unwrap();
    assert_eq!(tokens.pop().map(|t| t.kind), Some(SyntaxKind::EndOfFileToken));
    tokens.into_iter().map(|t| (t.kind, t.text)).collect()
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

fn scan_error(source: &str) -> ErrorKind {
    tokenize(source).unwrap_err().kind
}

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_only() {
    assert!(scan_all("   \n\t  ").is_empty());
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numeric_literals() {
    assert_eq!(scan_all("42"), vec![(SyntaxKind::IntLiteral, "42".to_string())]);
    assert_eq!(scan_all("3.14"), vec![(SyntaxKind::FloatLiteral, "3.14".to_string())]);
    assert_eq!(scan_all("0xFF"), vec![(SyntaxKind::HexLiteral, "0xFF".to_string())]);
    assert_eq!(scan_all("1_000_000"), vec![(SyntaxKind::IntLiteral, "1000000".to_string())]);
}

#[test]
fn test_invalid_numbers() {
    assert_eq!(scan_error("1.x"), ErrorKind::Lexical);
    assert_eq!(scan_error("0xFG"), ErrorKind::Lexical);
    assert_eq!(scan_error("0x"), ErrorKind::Lexical);
}

#[test]
fn test_string_literals() {
    assert_eq!(scan_all(r#""hello""#), vec![(SyntaxKind::StringLiteral, "hello".to_string())]);
    assert_eq!(scan_all("'world'"), vec![(SyntaxKind::StringLiteral, "world".to_string())]);
}

#[test]
fn test_single_char_quote_is_rune() {
    assert_eq!(scan_all("'a'"), vec![(SyntaxKind::RuneLiteral, "a".to_string())]);
    // double quotes never produce runes
    assert_eq!(scan_all("\"a\""), vec![(SyntaxKind::StringLiteral, "a".to_string())]);
}

#[test]
fn test_string_escapes() {
    let tokens = scan_all(r#""a\tb\n\"c\\ \x41\101 \q""#);
    assert_eq!(tokens[0].1, "a\tb\n\"c\\ AA \\q");
}

#[test]
fn test_unterminated_string() {
    assert_eq!(scan_error("\"abc"), ErrorKind::Lexical);
    assert_eq!(scan_error("'abc\n'"), ErrorKind::Lexical);
    assert_eq!(scan_error("`abc"), ErrorKind::Lexical);
}

#[test]
fn test_template_string_is_raw_and_multiline() {
    let tokens = scan_all("`line 1\nline ${2}`");
    assert_eq!(tokens, vec![(SyntaxKind::StringLiteral, "line 1\nline ${2}".to_string())]);
}

// ============================================================================
// Identifiers and keywords
// ============================================================================

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        scan_kinds("function foo type declare namespace typeof delete"),
        vec![
            SyntaxKind::FunctionKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::TypeOfKeyword,
            SyntaxKind::DeleteKeyword,
        ]
    );
}

#[test]
fn test_identifier_characters() {
    assert_eq!(scan_all("$el _x1 café"), vec![
        (SyntaxKind::Identifier, "$el".to_string()),
        (SyntaxKind::Identifier, "_x1".to_string()),
        (SyntaxKind::Identifier, "café".to_string()),
    ]);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_operators() {
    assert_eq!(
        scan_kinds("=> ?? ?. ** === !== := ... << >= += |= ^= %="),
        vec![
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::AsteriskAsteriskToken,
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::ColonEqualsToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::LessThanLessThanToken,
            SyntaxKind::GreaterThanEqualsToken,
            SyntaxKind::PlusEqualsToken,
            SyntaxKind::BarEqualsToken,
            SyntaxKind::CaretEqualsToken,
            SyntaxKind::PercentEqualsToken,
        ]
    );
}

#[test]
fn test_greater_than_is_never_fused() {
    assert_eq!(
        scan_kinds("a >> b"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_question_dot_before_digit() {
    assert_eq!(
        scan_kinds("a?.5:1"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::DotToken,
            SyntaxKind::IntLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::IntLiteral,
        ]
    );
}

#[test]
fn test_unexpected_character() {
    assert_eq!(scan_error("let a = #"), ErrorKind::Lexical);
}

// ============================================================================
// Comments and attributes
// ============================================================================

#[test]
fn test_comments() {
    assert_eq!(
        scan_all("// hello\n/* multi\nline */x"),
        vec![
            (SyntaxKind::SingleLineComment, " hello".to_string()),
            (SyntaxKind::MultiLineComment, " multi\nline ".to_string()),
            (SyntaxKind::Identifier, "x".to_string()),
        ]
    );
}

#[test]
fn test_attribute_comment() {
    assert_eq!(
        scan_all("// [attribute2 foo]\n//[ bar ]  "),
        vec![
            (SyntaxKind::AttributeToken, "attribute2 foo".to_string()),
            (SyntaxKind::AttributeToken, "bar".to_string()),
        ]
    );
}

#[test]
fn test_bracket_inside_comment_is_not_attribute() {
    assert_eq!(scan_kinds("// see [1] for details"), vec![SyntaxKind::SingleLineComment]);
}

#[test]
fn test_end_of_file_position() {
    let tokens = tokenize("a\nbc").unwrap();
    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, SyntaxKind::EndOfFileToken);
    assert_eq!((eof.position.line, eof.position.column), (2, 3));
}
