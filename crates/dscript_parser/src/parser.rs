//! The dscript parser.
//!
//! A recursive descent parser over a [`TokenCursor`]. Statements live in
//! `statement.rs`, expressions in `expression.rs` and type erasure in
//! `types.rs`; this file holds the parser state, token helpers, the
//! file-level loop and top-level declarations.
//!
//! There is no error recovery: the first error aborts the parse.

use dscript_ast::module::{File, ImportStmt};
use dscript_ast::node::*;
use dscript_ast::syntax_kind::SyntaxKind;
use dscript_core::text::Position;
use dscript_diagnostics::{messages, DiagnosticMessage, ParseError};
use dscript_scanner::{prepare_source, tokenize, Token};

use crate::cursor::TokenCursor;
use crate::desugar::{attach_attributes, mark_tail_call, AttributeRun};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Settings fixed for the lifetime of one parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Rewrite terminal self-recursive calls into [`Stmt::TailCall`].
    pub optimizations: bool,
}

pub struct Parser {
    pub(crate) cursor: TokenCursor,
    pub(crate) options: ParserOptions,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
}

impl Parser {
    /// Scan `source` and build a parser over its tokens.
    pub fn new(source: &str, options: ParserOptions) -> Result<Self, ParseError> {
        let tokens = tokenize(&prepare_source(source))?;
        Ok(Self::from_tokens(tokens, options))
    }

    pub fn from_tokens(tokens: Vec<Token>, options: ParserOptions) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            options,
            recursion_depth: 0,
        }
    }

    /// Parse a whole file. `path` is recorded on the result as is.
    pub fn parse_file(mut self, path: &str) -> Result<File, ParseError> {
        let mut file = File {
            path: path.to_string(),
            ..File::default()
        };
        let mut run = AttributeRun::default();
        let mut started = false;

        loop {
            if let Some(attribute) = self.cursor.next_attribute() {
                run.push(attribute, &mut file.attributes);
                continue;
            }

            let token = self.cursor.peek().clone();
            match token.kind {
                SyntaxKind::EndOfFileToken => {
                    run.flush(&mut file.attributes);
                    break;
                }
                SyntaxKind::ImportKeyword => {
                    if !file.statements.is_empty() {
                        return Err(self.error(&messages::IMPORT_AFTER_STATEMENTS, token.position, &[]));
                    }
                    run.settle(token.position, started, &mut file.attributes)?;
                    let import = self.parse_import()?;
                    file.imports.push(import);
                }
                SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword => {
                    let attributes = run.take_for_declaration(token.position, &mut file.attributes);
                    let mut stmt = self.parse_declaration(false)?;
                    attach_attributes(&mut stmt, attributes);
                    file.statements.push(stmt);
                }
                SyntaxKind::ExportKeyword => {
                    let declaration = matches!(
                        self.cursor.peek_nth(1).kind,
                        SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword
                    );
                    let attributes = if declaration {
                        run.take_for_declaration(token.position, &mut file.attributes)
                    } else {
                        run.settle(token.position, started, &mut file.attributes)?;
                        Vec::new()
                    };
                    if let Some(mut stmt) = self.parse_export()? {
                        attach_attributes(&mut stmt, attributes);
                        file.statements.push(stmt);
                    }
                }
                SyntaxKind::InterfaceKeyword => {
                    run.settle(token.position, started, &mut file.attributes)?;
                    self.skip_interface()?;
                }
                SyntaxKind::Identifier if self.is_type_alias_start() => {
                    run.settle(token.position, started, &mut file.attributes)?;
                    self.skip_type_alias()?;
                }
                SyntaxKind::Identifier if self.is_contextual_declaration("declare") => {
                    run.settle(token.position, started, &mut file.attributes)?;
                    let declarations = self.parse_declare_global()?;
                    file.global_declarations.extend(declarations);
                }
                SyntaxKind::Identifier if self.is_contextual_declaration("namespace") => {
                    return Err(self.error(&messages::NAMESPACES_NOT_SUPPORTED, token.position, &[]));
                }
                _ => {
                    run.settle(token.position, started, &mut file.attributes)?;
                    let stmt = self.parse_statement()?;
                    file.statements.push(stmt);
                }
            }
            started = true;
        }

        file.comments = self.cursor.comments();
        Ok(file)
    }

    /// Parse a single expression spanning the whole input.
    pub fn parse_standalone_expression(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_value_expression()?;
        self.parse_optional_semicolon();
        if !self.cursor.at(SyntaxKind::EndOfFileToken) {
            return Err(self.error_at_current(&messages::UNEXPECTED_0));
        }
        Ok(expr)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    pub(crate) fn expect_token(&mut self, kind: SyntaxKind) -> Result<Token, ParseError> {
        self.cursor.accept(kind)
    }

    #[inline]
    pub(crate) fn optional_token(&mut self, kind: SyntaxKind) -> Option<Token> {
        self.cursor.optional(kind)
    }

    #[inline]
    pub(crate) fn parse_optional_semicolon(&mut self) {
        self.cursor.ignore_optional(SyntaxKind::SemicolonToken, 1);
    }

    /// A plain identifier; keywords are rejected.
    pub(crate) fn expect_identifier(&mut self) -> Result<Token, ParseError> {
        if !self.cursor.at(SyntaxKind::Identifier) {
            return Err(self.error_at_current(&messages::EXPECTING_IDENTIFIER));
        }
        Ok(self.cursor.next())
    }

    /// An identifier or a keyword used as a name (members, type names).
    pub(crate) fn expect_name(&mut self) -> Result<Token, ParseError> {
        if !self.cursor.peek_kind().is_identifier_or_keyword() {
            return Err(self.error_at_current(&messages::EXPECTING_IDENTIFIER));
        }
        Ok(self.cursor.next())
    }

    /// A contextual keyword such as `as`, `from` or `prototype`.
    pub(crate) fn expect_word(&mut self, word: &str) -> Result<Token, ParseError> {
        let token = self.cursor.peek();
        if !token.is_word(word) {
            return Err(ParseError::unexpected(token.position, word, token.describe()));
        }
        Ok(self.cursor.next())
    }

    /// Check if identifier text matches.
    #[inline]
    pub(crate) fn is_identifier_text(&self, text: &str) -> bool {
        self.cursor.peek().is_word(text)
    }

    /// `word Name`: a contextual keyword introducing a declaration, as
    /// opposed to an identifier that happens to be spelled the same.
    fn is_contextual_declaration(&self, word: &str) -> bool {
        self.is_identifier_text(word) && self.cursor.peek_nth(1).kind == SyntaxKind::Identifier
    }

    pub(crate) fn is_type_alias_start(&self) -> bool {
        self.is_contextual_declaration("type")
    }

    pub(crate) fn error(&self, message: &DiagnosticMessage, position: Position, args: &[&str]) -> ParseError {
        ParseError::from_message(message, position, args)
    }

    /// An error at the current token, with its text as the only argument.
    pub(crate) fn error_at_current(&self, message: &DiagnosticMessage) -> ParseError {
        let token = self.cursor.peek();
        ParseError::from_message(message, token.position, &[token.describe()])
    }

    /// Run `f` one level deeper, failing once the nesting limit is reached.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            let position = self.cursor.peek().position;
            return Err(self.error(&messages::NESTING_TOO_DEEP, position, &[]));
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    // ========================================================================
    // Imports and exports
    // ========================================================================

    /// `import "path"` or `import * as alias from "path"`.
    fn parse_import(&mut self) -> Result<ImportStmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::ImportKeyword)?;

        match self.cursor.peek_kind() {
            SyntaxKind::StringLiteral => {
                let path = self.cursor.next();
                self.parse_optional_semicolon();
                return Ok(ImportStmt {
                    position: keyword.position,
                    path: path.text,
                    alias: String::new(),
                    resolved_path: String::new(),
                });
            }
            SyntaxKind::OpenBraceToken => {
                return Err(self.error(&messages::PARTIAL_IMPORTS_NOT_SUPPORTED, keyword.position, &[]));
            }
            _ => {}
        }

        self.expect_token(SyntaxKind::AsteriskToken)?;
        self.expect_word("as")?;
        let alias = self.expect_identifier()?;
        self.expect_word("from")?;
        let path = self.expect_token(SyntaxKind::StringLiteral)?;
        self.parse_optional_semicolon();

        Ok(ImportStmt {
            position: keyword.position,
            path: path.text,
            alias: alias.text,
            resolved_path: String::new(),
        })
    }

    /// `export <declaration>`. Interfaces and type aliases are erased and
    /// yield `None`.
    fn parse_export(&mut self) -> Result<Option<Stmt>, ParseError> {
        self.expect_token(SyntaxKind::ExportKeyword)?;

        let token = self.cursor.peek().clone();
        let stmt = match token.kind {
            SyntaxKind::EnumKeyword => Stmt::EnumDecl(self.parse_enum_declaration(true)?),
            SyntaxKind::FunctionKeyword | SyntaxKind::ClassKeyword => self.parse_declaration(true)?,
            SyntaxKind::LetKeyword | SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                let mut decl = self.parse_variable_statement()?;
                decl.exported = true;
                self.parse_optional_semicolon();
                Stmt::VarDecl(decl)
            }
            SyntaxKind::InterfaceKeyword => {
                self.skip_interface()?;
                return Ok(None);
            }
            SyntaxKind::Identifier if self.is_type_alias_start() => {
                self.skip_type_alias()?;
                return Ok(None);
            }
            SyntaxKind::Identifier if self.is_contextual_declaration("namespace") => {
                return Err(self.error(&messages::NAMESPACES_NOT_SUPPORTED, token.position, &[]));
            }
            _ => return Err(self.error_at_current(&messages::INVALID_EXPORT)),
        };
        Ok(Some(stmt))
    }

    /// `declare global { ... }`. Enums and constants are kept; interfaces,
    /// type aliases, function signatures and variable declarations are
    /// erased.
    fn parse_declare_global(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_word("declare")?;
        let token = self.cursor.peek();
        if token.is_word("namespace") {
            return Err(self.error(&messages::NAMESPACES_NOT_SUPPORTED, token.position, &[]));
        }
        if !token.is_word("global") {
            return Err(self.error(&messages::EXPECTED_GLOBAL, token.position, &[]));
        }
        self.cursor.next();
        self.expect_token(SyntaxKind::OpenBraceToken)?;

        let mut declarations = Vec::new();
        loop {
            match self.cursor.peek_kind() {
                SyntaxKind::CloseBraceToken => {
                    self.cursor.next();
                    break;
                }
                SyntaxKind::EnumKeyword => {
                    declarations.push(Stmt::EnumDecl(self.parse_enum_declaration(false)?));
                }
                SyntaxKind::ConstKeyword => {
                    let decl = self.parse_variable_statement()?;
                    self.parse_optional_semicolon();
                    declarations.push(Stmt::VarDecl(decl));
                }
                SyntaxKind::LetKeyword | SyntaxKind::VarKeyword => {
                    self.cursor.next();
                    self.expect_identifier()?;
                    self.skip_type_annotation()?;
                    self.parse_optional_semicolon();
                }
                SyntaxKind::InterfaceKeyword => self.skip_interface()?,
                SyntaxKind::FunctionKeyword => self.skip_function_signature()?,
                SyntaxKind::Identifier if self.is_type_alias_start() => self.skip_type_alias()?,
                _ => return Err(self.error_at_current(&messages::INVALID_GLOBAL_DECLARATION)),
            }
        }
        Ok(declarations)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// A function or class declaration.
    fn parse_declaration(&mut self, exported: bool) -> Result<Stmt, ParseError> {
        if self.cursor.at(SyntaxKind::ClassKeyword) {
            Ok(Stmt::ClassDecl(self.parse_class_declaration(exported)?))
        } else {
            Ok(Stmt::FuncDecl(self.parse_function_declaration(exported)?))
        }
    }

    pub(crate) fn parse_function_declaration(&mut self, exported: bool) -> Result<FuncDeclStmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::FunctionKeyword)?;
        let name = self.expect_identifier()?;
        self.parse_function_rest(keyword.position, name.text, exported)
    }

    /// Everything after a function or method name: generic parameters,
    /// arguments, return type and body.
    fn parse_function_rest(
        &mut self,
        position: Position,
        name: String,
        exported: bool,
    ) -> Result<FuncDeclStmt, ParseError> {
        self.skip_generic_parameters()?;
        let arguments = self.parse_arguments()?;
        self.skip_type_annotation()?;
        let body = self.parse_block()?;
        self.parse_optional_semicolon();

        let mut func = FuncDeclStmt {
            position,
            name,
            arguments,
            exported,
            attributes: Vec::new(),
            body,
            receiver_type: None,
        };
        if self.options.optimizations {
            mark_tail_call(&mut func);
        }
        Ok(func)
    }

    /// `Type.prototype.name = function (...) { ... }`
    pub(crate) fn is_prototype_method(&self) -> bool {
        let c = &self.cursor;
        c.peek().kind == SyntaxKind::Identifier
            && c.peek_nth(1).kind == SyntaxKind::DotToken
            && c.peek_nth(2).is_word("prototype")
            && c.peek_nth(3).kind == SyntaxKind::DotToken
            && c.peek_nth(5).kind == SyntaxKind::EqualsToken
            && c.peek_nth(6).kind == SyntaxKind::FunctionKeyword
    }

    pub(crate) fn parse_prototype_method(&mut self) -> Result<FuncDeclStmt, ParseError> {
        let receiver = self.expect_identifier()?;
        self.expect_token(SyntaxKind::DotToken)?;
        let prototype = self.expect_word("prototype")?;
        self.expect_token(SyntaxKind::DotToken)?;
        let name = self.expect_name()?;
        self.expect_token(SyntaxKind::EqualsToken)?;
        self.expect_token(SyntaxKind::FunctionKeyword)?;

        self.skip_generic_parameters()?;
        let arguments = self.parse_arguments()?;
        self.skip_type_annotation()?;
        let body = self.parse_block()?;

        Ok(FuncDeclStmt {
            position: prototype.position,
            name: name.text,
            arguments,
            exported: false,
            attributes: Vec::new(),
            body,
            receiver_type: Some(receiver.text),
        })
    }

    fn parse_class_declaration(&mut self, exported: bool) -> Result<ClassDeclStmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::ClassKeyword)?;
        let name = self.expect_identifier()?;
        self.skip_generic_parameters()?;
        if self.is_identifier_text("implements") {
            self.skip_heritage_clause()?;
        }
        self.expect_token(SyntaxKind::OpenBraceToken)?;

        let mut class = ClassDeclStmt {
            position: keyword.position,
            name: name.text,
            exported,
            attributes: Vec::new(),
            fields: Vec::new(),
            functions: Vec::new(),
            getters: Vec::new(),
            setters: Vec::new(),
        };

        loop {
            let token = self.cursor.peek();
            match token.kind {
                SyntaxKind::CloseBraceToken => {
                    self.cursor.next();
                    return Ok(class);
                }
                SyntaxKind::EndOfFileToken => {
                    return Err(self.error(&messages::UNCLOSED_CLASS, token.position, &[]));
                }
                SyntaxKind::SemicolonToken => {
                    self.cursor.next();
                }
                kind if kind.is_identifier_or_keyword() => self.parse_class_member(&mut class)?,
                _ => return Err(self.error_at_current(&messages::INVALID_CLASS_MEMBER)),
            }
        }
    }

    fn parse_class_member(&mut self, class: &mut ClassDeclStmt) -> Result<(), ParseError> {
        let private = self.is_identifier_text("private") && self.cursor.peek_nth(1).kind.is_identifier_or_keyword();
        if private {
            self.cursor.next();
        }

        let token = self.cursor.peek();
        let accessor = token.is_word("get") || token.is_word("set");
        if accessor && self.cursor.peek_nth(1).kind.is_identifier_or_keyword() {
            let getter = self.cursor.next().is_word("get");
            let method = self.parse_method(!private)?;
            if getter {
                class.getters.push(method);
            } else {
                class.setters.push(method);
            }
            return Ok(());
        }

        if matches!(
            self.cursor.peek_nth(1).kind,
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let method = self.parse_method(!private)?;
            class.functions.push(method);
            return Ok(());
        }

        let mut field = self.parse_variable_declaration(false)?;
        field.exported = !private;
        self.parse_optional_semicolon();
        class.fields.push(field);
        Ok(())
    }

    fn parse_method(&mut self, exported: bool) -> Result<FuncDeclStmt, ParseError> {
        let name = self.expect_name()?;
        self.parse_function_rest(name.position, name.text, exported)
    }

    /// `enum Name { A, B = 2, C = "c" }`
    pub(crate) fn parse_enum_declaration(&mut self, exported: bool) -> Result<EnumDeclStmt, ParseError> {
        self.expect_token(SyntaxKind::EnumKeyword)?;
        let name = self.expect_identifier()?;
        self.expect_token(SyntaxKind::OpenBraceToken)?;

        let mut values = Vec::new();
        let mut counter: i64 = 0;
        while !self.cursor.at(SyntaxKind::CloseBraceToken) {
            let member = self.expect_name()?;
            let (kind, value) = if self.optional_token(SyntaxKind::EqualsToken).is_some() {
                self.parse_enum_initializer(values.is_empty(), &mut counter)?
            } else {
                (EnumValueKind::Int, counter.to_string())
            };
            counter = counter.wrapping_add(1);
            values.push(EnumValue {
                position: member.position,
                name: member.text,
                kind,
                value,
            });
            self.cursor.ignore_optional(SyntaxKind::CommaToken, 1);
        }
        self.cursor.next();
        self.parse_optional_semicolon();

        Ok(EnumDeclStmt {
            position: name.position,
            name: name.text,
            exported,
            values,
        })
    }

    /// `= INT`, `= -INT` or `= STRING`. An explicit integer on the first
    /// member restarts the counter from it.
    fn parse_enum_initializer(
        &mut self,
        first: bool,
        counter: &mut i64,
    ) -> Result<(EnumValueKind, String), ParseError> {
        let negative = self.optional_token(SyntaxKind::MinusToken).is_some();
        let token = self.cursor.peek().clone();
        match token.kind {
            SyntaxKind::IntLiteral => {
                self.cursor.next();
                let text = if negative { format!("-{}", token.text) } else { token.text };
                if first {
                    *counter = text
                        .parse()
                        .map_err(|_| self.error(&messages::INVALID_ENUM_VALUE, token.position, &[&text]))?;
                }
                Ok((EnumValueKind::Int, text))
            }
            SyntaxKind::StringLiteral if !negative => {
                self.cursor.next();
                Ok((EnumValueKind::String, token.text))
            }
            _ => Err(self.error_at_current(&messages::INVALID_ENUM_VALUE)),
        }
    }
}
