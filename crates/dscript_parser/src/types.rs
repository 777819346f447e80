//! Type erasure.
//!
//! Type annotations, generic parameter lists, interfaces and type aliases
//! are consumed and dropped; nothing here builds a node. The grammar is a
//! practical subset of TypeScript types: unions and intersections,
//! `keyof`/`readonly` prefixes, array suffixes, tuples, object types with
//! index and mapped members, function types and qualified generic names.

use dscript_ast::syntax_kind::SyntaxKind;
use dscript_diagnostics::{messages, ParseError};

use crate::cursor::Lookahead;
use crate::parser::Parser;

impl Parser {
    // ========================================================================
    // Annotations
    // ========================================================================

    /// `: Type`, when present.
    pub(crate) fn skip_type_annotation(&mut self) -> Result<(), ParseError> {
        if self.optional_token(SyntaxKind::ColonToken).is_some() {
            self.skip_type()?;
        }
        Ok(())
    }

    /// `expr as Type`, repeated.
    pub(crate) fn skip_as_expression(&mut self) -> Result<(), ParseError> {
        while self.is_identifier_text("as") {
            self.cursor.next();
            self.skip_type()?;
        }
        Ok(())
    }

    /// A prefix type assertion `<Type>expr`; the expression is kept as is.
    pub(crate) fn skip_type_assertion(&mut self) -> Result<(), ParseError> {
        if self.cursor.at(SyntaxKind::LessThanToken) {
            self.skip_type_arguments()?;
        }
        Ok(())
    }

    pub(crate) fn skip_type(&mut self) -> Result<(), ParseError> {
        self.nested(|p| {
            if matches!(p.cursor.peek_kind(), SyntaxKind::BarToken | SyntaxKind::AmpersandToken) {
                p.cursor.next();
            }
            loop {
                p.skip_postfix_type()?;
                match p.cursor.peek_kind() {
                    SyntaxKind::BarToken | SyntaxKind::AmpersandToken => {
                        p.cursor.next();
                    }
                    _ => return Ok(()),
                }
            }
        })
    }

    fn skip_postfix_type(&mut self) -> Result<(), ParseError> {
        let token = self.cursor.peek();
        if (token.is_word("keyof") || token.is_word("readonly"))
            && !matches!(
                self.cursor.peek_nth(1).kind,
                SyntaxKind::BarToken | SyntaxKind::AmpersandToken | SyntaxKind::CommaToken | SyntaxKind::GreaterThanToken
            )
        {
            self.cursor.next();
        }

        self.skip_primary_type()?;

        // `T[]`, repeated
        while self.cursor.at(SyntaxKind::OpenBracketToken)
            && self.cursor.peek_nth(1).kind == SyntaxKind::CloseBracketToken
        {
            self.cursor.advance(2);
        }
        Ok(())
    }

    fn skip_primary_type(&mut self) -> Result<(), ParseError> {
        let kind = self.cursor.peek_kind();
        match kind {
            SyntaxKind::OpenParenToken if self.is_function_type_start() => self.skip_function_type(),
            SyntaxKind::OpenParenToken => {
                self.cursor.next();
                self.skip_type()?;
                self.expect_token(SyntaxKind::CloseParenToken)?;
                Ok(())
            }
            SyntaxKind::OpenBraceToken => self.skip_object_type(),
            SyntaxKind::OpenBracketToken => self.skip_tuple_type(),
            SyntaxKind::LessThanToken => {
                self.skip_generic_parameters()?;
                self.skip_function_type()
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::IntLiteral
            | SyntaxKind::FloatLiteral
            | SyntaxKind::HexLiteral
            | SyntaxKind::RuneLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::UndefinedKeyword => {
                self.cursor.next();
                Ok(())
            }
            SyntaxKind::MinusToken
                if matches!(
                    self.cursor.peek_nth(1).kind,
                    SyntaxKind::IntLiteral | SyntaxKind::FloatLiteral
                ) =>
            {
                self.cursor.advance(2);
                Ok(())
            }
            SyntaxKind::TypeOfKeyword => {
                // a type query, unlike the expression operator
                self.cursor.next();
                self.skip_qualified_name()
            }
            SyntaxKind::NewKeyword if self.cursor.peek_nth(1).kind == SyntaxKind::OpenParenToken => {
                self.cursor.next();
                self.skip_function_type()
            }
            kind if kind.is_identifier_or_keyword() => {
                self.skip_qualified_name()?;
                if self.cursor.at(SyntaxKind::LessThanToken) {
                    self.skip_type_arguments()?;
                }
                Ok(())
            }
            _ => Err(self.error_at_current(&messages::EXPECTING_TYPE)),
        }
    }

    /// `a.b.c`
    fn skip_qualified_name(&mut self) -> Result<(), ParseError> {
        self.expect_name()?;
        while self.optional_token(SyntaxKind::DotToken).is_some() {
            self.expect_name()?;
        }
        Ok(())
    }

    /// At `(`: whether a function type follows rather than a parenthesized
    /// type such as `(A | B)[]`.
    fn is_function_type_start(&self) -> bool {
        let c = &self.cursor;
        match c.peek_nth(1).kind {
            SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken => true,
            kind if kind.is_identifier_or_keyword() => match c.peek_nth(2).kind {
                SyntaxKind::ColonToken | SyntaxKind::QuestionToken | SyntaxKind::CommaToken => true,
                SyntaxKind::CloseParenToken => c.peek_nth(3).kind == SyntaxKind::EqualsGreaterThanToken,
                _ => false,
            },
            _ => false,
        }
    }

    /// `(params) => Type`
    fn skip_function_type(&mut self) -> Result<(), ParseError> {
        self.skip_parameter_list()?;
        self.expect_token(SyntaxKind::EqualsGreaterThanToken)?;
        self.skip_type()
    }

    /// A parameter list inside a type: names with optional `...`, `?` and
    /// annotations.
    fn skip_parameter_list(&mut self) -> Result<(), ParseError> {
        self.expect_token(SyntaxKind::OpenParenToken)?;
        while !self.cursor.at(SyntaxKind::CloseParenToken) {
            self.optional_token(SyntaxKind::DotDotDotToken);
            self.expect_name()?;
            self.optional_token(SyntaxKind::QuestionToken);
            self.skip_type_annotation()?;
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(())
    }

    /// `[A, B?, ...C[]]`
    fn skip_tuple_type(&mut self) -> Result<(), ParseError> {
        self.expect_token(SyntaxKind::OpenBracketToken)?;
        while !self.cursor.at(SyntaxKind::CloseBracketToken) {
            self.optional_token(SyntaxKind::DotDotDotToken);
            self.skip_type()?;
            self.optional_token(SyntaxKind::QuestionToken);
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken)?;
        Ok(())
    }

    // ========================================================================
    // Object types
    // ========================================================================

    /// `{ member; member, ... }`, as in interface bodies and inline types.
    pub(crate) fn skip_object_type(&mut self) -> Result<(), ParseError> {
        let open = self.expect_token(SyntaxKind::OpenBraceToken)?;
        loop {
            match self.cursor.peek_kind() {
                SyntaxKind::CloseBraceToken => {
                    self.cursor.next();
                    return Ok(());
                }
                SyntaxKind::EndOfFileToken => {
                    return Err(self.error(&messages::UNCLOSED_BLOCK, open.position, &[]));
                }
                SyntaxKind::CommaToken | SyntaxKind::SemicolonToken => {
                    self.cursor.next();
                }
                _ => self.skip_type_member()?,
            }
        }
    }

    fn skip_type_member(&mut self) -> Result<(), ParseError> {
        if self.is_identifier_text("readonly") {
            let next = self.cursor.peek_nth(1).kind;
            if next.is_identifier_or_keyword() || next == SyntaxKind::OpenBracketToken {
                self.cursor.next();
            }
        }

        match self.cursor.peek_kind() {
            // `[key: string]: T` or `[K in keyof T]: U`
            SyntaxKind::OpenBracketToken => {
                self.cursor.next();
                self.expect_name()?;
                if self.is_identifier_text("in") {
                    self.cursor.next();
                    self.skip_type()?;
                } else {
                    self.skip_type_annotation()?;
                }
                self.expect_token(SyntaxKind::CloseBracketToken)?;
                self.optional_token(SyntaxKind::QuestionToken);
                self.skip_type_annotation()
            }
            // call signature
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => self.skip_signature_rest(),
            SyntaxKind::NewKeyword
                if matches!(
                    self.cursor.peek_nth(1).kind,
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                ) =>
            {
                self.cursor.next();
                self.skip_signature_rest()
            }
            kind if kind.is_identifier_or_keyword()
                || matches!(kind, SyntaxKind::StringLiteral | SyntaxKind::IntLiteral) =>
            {
                self.cursor.next();
                self.optional_token(SyntaxKind::QuestionToken);
                if matches!(
                    self.cursor.peek_kind(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                ) {
                    self.skip_signature_rest()
                } else {
                    self.skip_type_annotation()
                }
            }
            _ => Err(self.error_at_current(&messages::EXPECTING_IDENTIFIER)),
        }
    }

    /// `<T>(params): Type` after a method or call signature head.
    fn skip_signature_rest(&mut self) -> Result<(), ParseError> {
        self.skip_generic_parameters()?;
        self.skip_parameter_list()?;
        self.skip_type_annotation()
    }

    // ========================================================================
    // Generics
    // ========================================================================

    /// `<T extends X = Y, U>` on a declaration.
    pub(crate) fn skip_generic_parameters(&mut self) -> Result<(), ParseError> {
        if self.optional_token(SyntaxKind::LessThanToken).is_none() {
            return Ok(());
        }
        loop {
            self.expect_name()?;
            if self.is_identifier_text("extends") {
                self.cursor.next();
                self.skip_type()?;
            }
            if self.optional_token(SyntaxKind::EqualsToken).is_some() {
                self.skip_type()?;
            }
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::GreaterThanToken)?;
        Ok(())
    }

    /// `<A, B>` after a type name.
    fn skip_type_arguments(&mut self) -> Result<(), ParseError> {
        self.expect_token(SyntaxKind::LessThanToken)?;
        loop {
            self.skip_type()?;
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::GreaterThanToken)?;
        Ok(())
    }

    /// Drop generic arguments after a name in expression position, as in
    /// `foo<T>()`. Only a run of plain type references between `<` and `>`
    /// counts; anything else leaves the cursor alone so `foo < T` stays a
    /// comparison.
    pub(crate) fn skip_generic_arguments(&mut self) {
        if !self.cursor.at(SyntaxKind::LessThanToken) {
            return;
        }
        let mut scan = self.cursor.lookahead();
        if scan_type_arguments(&mut scan, 0) {
            let len = scan.consumed();
            self.cursor.advance(len);
        }
    }

    // ========================================================================
    // Erased declarations
    // ========================================================================

    /// `interface Name<T> extends A, B { ... }`
    pub(crate) fn skip_interface(&mut self) -> Result<(), ParseError> {
        self.expect_token(SyntaxKind::InterfaceKeyword)?;
        self.expect_name()?;
        self.skip_generic_parameters()?;
        if self.is_identifier_text("extends") || self.is_identifier_text("implements") {
            self.skip_heritage_clause()?;
        }
        self.skip_object_type()?;
        self.parse_optional_semicolon();
        Ok(())
    }

    /// `extends A, B.C<T>` or `implements ...`
    pub(crate) fn skip_heritage_clause(&mut self) -> Result<(), ParseError> {
        self.cursor.next();
        loop {
            self.skip_type()?;
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                return Ok(());
            }
        }
    }

    /// `type Name<T> = Type;`
    pub(crate) fn skip_type_alias(&mut self) -> Result<(), ParseError> {
        self.expect_word("type")?;
        self.expect_identifier()?;
        self.skip_generic_parameters()?;
        self.expect_token(SyntaxKind::EqualsToken)?;
        self.skip_type()?;
        self.parse_optional_semicolon();
        Ok(())
    }

    /// `function name<T>(params): Type;` with no body.
    pub(crate) fn skip_function_signature(&mut self) -> Result<(), ParseError> {
        self.expect_token(SyntaxKind::FunctionKeyword)?;
        self.expect_identifier()?;
        self.skip_signature_rest()?;
        self.parse_optional_semicolon();
        Ok(())
    }
}

/// Deepest `<...>` nesting a generic argument scan looks into. Deeper
/// input is read as comparisons, which keeps each scan short.
const MAX_TYPE_ARGUMENT_DEPTH: usize = 8;

/// `< TypeRef (, TypeRef)* >`
fn scan_type_arguments(scan: &mut Lookahead<'_>, depth: usize) -> bool {
    if depth >= MAX_TYPE_ARGUMENT_DEPTH {
        return false;
    }
    if !scan.eat(SyntaxKind::LessThanToken) || !scan_type_reference(scan, depth) {
        return false;
    }
    while scan.eat(SyntaxKind::CommaToken) {
        if !scan_type_reference(scan, depth) {
            return false;
        }
    }
    scan.eat(SyntaxKind::GreaterThanToken)
}

/// `Name (. Name)* [<...>] ([])*`
fn scan_type_reference(scan: &mut Lookahead<'_>, depth: usize) -> bool {
    if !scan.eat(SyntaxKind::Identifier) {
        return false;
    }
    while scan.eat(SyntaxKind::DotToken) {
        if !scan.eat(SyntaxKind::Identifier) {
            return false;
        }
    }
    if scan.peek().kind == SyntaxKind::LessThanToken && !scan_type_arguments(scan, depth + 1) {
        return false;
    }
    while scan.eat(SyntaxKind::OpenBracketToken) {
        if !scan.eat(SyntaxKind::CloseBracketToken) {
            return false;
        }
    }
    true
}
