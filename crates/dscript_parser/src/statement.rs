//! Statement parsing.
//!
//! Every statement is followed by at most one optional `;`, consumed by
//! [`Parser::parse_statement`] itself.

use dscript_ast::node::*;
use dscript_ast::syntax_kind::SyntaxKind;
use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};

use crate::desugar::compound_assignment;
use crate::parser::Parser;
use crate::precedence::get_compound_assignment_operator;

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let stmt = self.parse_statement_kind()?;
        self.parse_optional_semicolon();
        Ok(stmt)
    }

    fn parse_statement_kind(&mut self) -> Result<Stmt, ParseError> {
        match self.cursor.peek_kind() {
            SyntaxKind::LetKeyword | SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                Ok(Stmt::VarDecl(self.parse_variable_statement()?))
            }
            SyntaxKind::EnumKeyword => Ok(Stmt::EnumDecl(self.parse_enum_declaration(false)?)),
            SyntaxKind::FunctionKeyword => Ok(Stmt::FuncDecl(self.parse_function_declaration(false)?)),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::ThrowKeyword => {
                let keyword = self.cursor.next();
                let value = self.parse_value_expression()?;
                Ok(Stmt::Throw(ThrowStmt {
                    position: keyword.position,
                    value,
                }))
            }
            SyntaxKind::BreakKeyword => Ok(Stmt::Break(self.parse_branch_statement())),
            SyntaxKind::ContinueKeyword => Ok(Stmt::Continue(self.parse_branch_statement())),
            SyntaxKind::DeleteKeyword => self.parse_delete_statement(),
            SyntaxKind::NewKeyword => self.parse_new_statement(),
            SyntaxKind::OpenBraceToken => Ok(Stmt::Block(self.parse_block()?)),
            SyntaxKind::Identifier if self.is_prototype_method() => {
                Ok(Stmt::FuncDecl(self.parse_prototype_method()?))
            }
            SyntaxKind::Identifier if self.cursor.peek_nth(1).kind == SyntaxKind::ColonToken => {
                self.parse_label_statement()
            }
            SyntaxKind::Identifier | SyntaxKind::OpenParenToken => self.parse_simple_statement(),
            SyntaxKind::TypeOfKeyword => {
                let position = self.cursor.peek().position;
                Err(self.error(&messages::TYPEOF_NOT_SUPPORTED, position, &[]))
            }
            _ => Err(self.error_at_current(&messages::EXPECTING_STATEMENT)),
        }
    }

    /// `{ statements }`
    pub(crate) fn parse_block(&mut self) -> Result<BlockStmt, ParseError> {
        self.nested(|p| {
            let lbrace = p.expect_token(SyntaxKind::OpenBraceToken)?;
            let mut statements = Vec::new();
            loop {
                match p.cursor.peek_kind() {
                    SyntaxKind::CloseBraceToken => {
                        let rbrace = p.cursor.next();
                        return Ok(BlockStmt {
                            lbrace: lbrace.position,
                            statements,
                            rbrace: rbrace.position,
                        });
                    }
                    SyntaxKind::EndOfFileToken => {
                        return Err(p.error(&messages::UNCLOSED_BLOCK, lbrace.position, &[]));
                    }
                    _ => {
                        if let Some(stmt) = p.parse_block_item()? {
                            statements.push(stmt);
                        }
                    }
                }
            }
        })
    }

    /// A statement inside a block or case, or `None` for an erased type
    /// declaration.
    fn parse_block_item(&mut self) -> Result<Option<Stmt>, ParseError> {
        if self.is_type_alias_start() {
            self.skip_type_alias()?;
            return Ok(None);
        }
        if self.cursor.at(SyntaxKind::InterfaceKeyword) {
            self.skip_interface()?;
            return Ok(None);
        }
        self.parse_statement().map(Some)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// `let|var|const name[: T] [= value]`, without the trailing `;`.
    pub(crate) fn parse_variable_statement(&mut self) -> Result<VarDeclStmt, ParseError> {
        let keyword = self.cursor.next();
        self.parse_variable_declaration(keyword.kind == SyntaxKind::ConstKeyword)
    }

    /// `name[?][: T] [= value]`. A missing initializer yields `undefined`.
    pub(crate) fn parse_variable_declaration(&mut self, is_const: bool) -> Result<VarDeclStmt, ParseError> {
        let name = self.expect_identifier()?;
        self.optional_token(SyntaxKind::QuestionToken);
        self.skip_type_annotation()?;

        let value = if self.optional_token(SyntaxKind::EqualsToken).is_some() {
            self.parse_value_expression()?
        } else {
            Expr::Constant(ConstantExpr::undefined(name.position))
        };

        Ok(VarDeclStmt {
            position: name.position,
            name: name.text,
            value,
            exported: false,
            is_const,
        })
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// `(expr)`
    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression()?;
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(condition)
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::IfKeyword)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        let mut blocks = vec![IfBlock { condition, body }];
        let mut else_block = None;

        while self.optional_token(SyntaxKind::ElseKeyword).is_some() {
            if self.optional_token(SyntaxKind::IfKeyword).is_some() {
                let condition = self.parse_condition()?;
                let body = self.parse_block()?;
                blocks.push(IfBlock { condition, body });
            } else {
                else_block = Some(self.parse_block()?);
                break;
            }
        }

        Ok(Stmt::If(IfStmt {
            position: keyword.position,
            blocks,
            else_block,
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::WhileKeyword)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Stmt::While(WhileStmt {
            position: keyword.position,
            condition,
            body,
        }))
    }

    /// `for (init; cond; step)`, `for (let x of e)` or `for (let k in e)`.
    fn parse_for_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::ForKeyword)?;
        self.expect_token(SyntaxKind::OpenParenToken)?;

        let declares = matches!(
            self.cursor.peek_kind(),
            SyntaxKind::LetKeyword | SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword
        );
        let iterates = {
            let third = self.cursor.peek_nth(2);
            third.is_word("of") || third.is_word("in")
        };

        let kind = if declares && iterates {
            self.parse_for_in_of_header()?
        } else {
            self.parse_classic_for_header(declares)?
        };
        self.expect_token(SyntaxKind::CloseParenToken)?;
        let body = self.parse_block()?;

        Ok(Stmt::For(ForStmt {
            position: keyword.position,
            kind,
            body,
        }))
    }

    fn parse_for_in_of_header(&mut self) -> Result<ForKind, ParseError> {
        self.cursor.next();
        let name = self.expect_identifier()?;
        let binding = IdentExpr {
            position: name.position,
            name: name.text,
        };
        let word = self.cursor.next();
        let expr = self.parse_expression()?;
        if word.is_word("of") {
            Ok(ForKind::Of { binding, expr })
        } else {
            Ok(ForKind::In { binding, expr })
        }
    }

    fn parse_classic_for_header(&mut self, declares: bool) -> Result<ForKind, ParseError> {
        let mut declarations = Vec::new();
        if declares {
            let first = self.parse_variable_statement()?;
            let is_const = first.is_const;
            declarations.push(Stmt::VarDecl(first));
            while self.optional_token(SyntaxKind::CommaToken).is_some() {
                declarations.push(Stmt::VarDecl(self.parse_variable_declaration(is_const)?));
            }
        } else if !self.cursor.at(SyntaxKind::SemicolonToken) {
            declarations.push(self.parse_simple_statement()?);
        }
        self.expect_token(SyntaxKind::SemicolonToken)?;

        let condition = if self.cursor.at(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(SyntaxKind::SemicolonToken)?;

        let step = if self.cursor.at(SyntaxKind::CloseParenToken) {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()?))
        };

        Ok(ForKind::Classic {
            declarations,
            condition,
            step,
        })
    }

    fn parse_switch_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::SwitchKeyword)?;
        let expr = self.parse_condition()?;
        self.expect_token(SyntaxKind::OpenBraceToken)?;

        // case and default blocks in source order
        let mut blocks: Vec<CaseBlock> = Vec::new();
        loop {
            let token = self.cursor.peek().clone();
            match token.kind {
                SyntaxKind::CaseKeyword => {
                    self.cursor.next();
                    let expr = self.parse_expression()?;
                    self.expect_token(SyntaxKind::ColonToken)?;
                    check_duplicate_case(&blocks, token.position, &expr)?;
                    let statements = self.parse_case_statements(token.position)?;
                    blocks.push(CaseBlock {
                        position: token.position,
                        expr: Some(expr),
                        statements,
                    });
                }
                SyntaxKind::DefaultKeyword => {
                    self.cursor.next();
                    if blocks.iter().any(|b| b.expr.is_none()) {
                        return Err(self.error(&messages::DUPLICATE_CASE, token.position, &["default"]));
                    }
                    self.expect_token(SyntaxKind::ColonToken)?;
                    let statements = self.parse_case_statements(token.position)?;
                    blocks.push(CaseBlock {
                        position: token.position,
                        expr: None,
                        statements,
                    });
                }
                _ => {
                    self.expect_token(SyntaxKind::CloseBraceToken)?;
                    break;
                }
            }
        }

        check_fallthrough(&blocks)?;

        let (defaults, blocks): (Vec<_>, Vec<_>) = blocks.into_iter().partition(|b| b.expr.is_none());
        Ok(Stmt::Switch(SwitchStmt {
            position: keyword.position,
            expr,
            blocks,
            default: defaults.into_iter().next(),
        }))
    }

    /// Statements up to the next `case`, `default` or `}`.
    fn parse_case_statements(&mut self, position: Position) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        loop {
            match self.cursor.peek_kind() {
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword | SyntaxKind::CloseBraceToken => {
                    return Ok(statements);
                }
                SyntaxKind::EndOfFileToken => {
                    return Err(self.error(&messages::UNCLOSED_CASE, position, &[]));
                }
                _ => {
                    if let Some(stmt) = self.parse_block_item()? {
                        statements.push(stmt);
                    }
                }
            }
        }
    }

    fn parse_try_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::TryKeyword)?;
        let body = self.parse_block()?;

        let catch = match self.optional_token(SyntaxKind::CatchKeyword) {
            Some(catch) => {
                let binding = if self.optional_token(SyntaxKind::OpenParenToken).is_some() {
                    let name = self.expect_identifier()?;
                    self.skip_type_annotation()?;
                    self.expect_token(SyntaxKind::CloseParenToken)?;
                    Some(IdentExpr {
                        position: name.position,
                        name: name.text,
                    })
                } else {
                    None
                };
                Some(CatchClause {
                    position: catch.position,
                    binding,
                    body: self.parse_block()?,
                })
            }
            None => None,
        };

        let finally = match self.optional_token(SyntaxKind::FinallyKeyword) {
            Some(_) => Some(self.parse_block()?),
            None => None,
        };

        Ok(Stmt::Try(TryStmt {
            position: keyword.position,
            body,
            catch,
            finally,
        }))
    }

    /// `return`, `return;` and a `return` followed by a line break carry no
    /// value.
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::ReturnKeyword)?;
        let next = self.cursor.peek();
        let empty = matches!(
            next.kind,
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || next.position.line != keyword.position.line;

        let value = if empty { None } else { Some(self.parse_value_expression()?) };
        Ok(Stmt::Return(ReturnStmt {
            position: keyword.position,
            value,
        }))
    }

    /// `break` or `continue`, with a label on the same line.
    fn parse_branch_statement(&mut self) -> BranchStmt {
        let keyword = self.cursor.next();
        let next = self.cursor.peek();
        let label = if next.kind == SyntaxKind::Identifier && next.position.line == keyword.position.line {
            Some(self.cursor.next().text)
        } else {
            None
        };
        BranchStmt {
            position: keyword.position,
            label,
        }
    }

    /// `name: for|while|switch ...`
    fn parse_label_statement(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier()?;
        self.expect_token(SyntaxKind::ColonToken)?;
        let body = match self.cursor.peek_kind() {
            SyntaxKind::ForKeyword => self.parse_for_statement()?,
            SyntaxKind::WhileKeyword => self.parse_while_statement()?,
            SyntaxKind::SwitchKeyword => self.parse_switch_statement()?,
            _ => {
                let position = self.cursor.peek().position;
                return Err(self.error(&messages::INVALID_LABEL_TARGET, position, &[]));
            }
        };
        Ok(Stmt::Label(LabelStmt {
            position: name.position,
            name: name.text,
            body: Box::new(body),
        }))
    }

    /// `delete object.property`
    fn parse_delete_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.expect_token(SyntaxKind::DeleteKeyword)?;
        let object = self.expect_identifier()?;
        if self.optional_token(SyntaxKind::DotToken).is_none() {
            return Err(self.error(&messages::INVALID_DELETE, keyword.position, &[]));
        }
        let property = self.expect_name()?;
        Ok(Stmt::Delete(DeleteStmt {
            position: keyword.position,
            object: object.text,
            property: property.text,
        }))
    }

    /// `new Foo().bar()`: a `new` expression is only a statement when the
    /// chain ends in a call.
    fn parse_new_statement(&mut self) -> Result<Stmt, ParseError> {
        let position = self.cursor.peek().position;
        match self.parse_expression()? {
            Expr::Call(call) => Ok(Stmt::Call(call)),
            _ => Err(self.error(&messages::INVALID_NEW_STATEMENT, position, &[])),
        }
    }

    // ========================================================================
    // Expression statements
    // ========================================================================

    /// A call, an assignment, a compound assignment or `++`/`--`.
    pub(crate) fn parse_simple_statement(&mut self) -> Result<Stmt, ParseError> {
        let left = self.parse_postfix_expression()?;
        self.skip_as_expression()?;

        let kind = self.cursor.peek_kind();
        match kind {
            SyntaxKind::EqualsToken => {
                self.cursor.next();
                let value = self.parse_value_expression()?;
                Ok(Stmt::Assign(AssignStmt { left, value }))
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                let op = if kind == SyntaxKind::PlusPlusToken {
                    IncDecOperator::Increment
                } else {
                    IncDecOperator::Decrement
                };
                self.cursor.next();
                Ok(Stmt::IncDec(IncDecStmt { op, target: left }))
            }
            _ => {
                if let Some(op) = get_compound_assignment_operator(kind) {
                    self.cursor.next();
                    let value = self.parse_value_expression()?;
                    return Ok(Stmt::Assign(compound_assignment(left, op, value)));
                }
                match left {
                    Expr::Call(call) => Ok(Stmt::Call(call)),
                    _ if matches!(
                        kind,
                        SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
                    ) =>
                    {
                        let position = left.position();
                        Err(self.error(&messages::INVALID_STATEMENT_EXPRESSION, position, &[]))
                    }
                    _ => Err(self.error_at_current(&messages::UNEXPECTED_0)),
                }
            }
        }
    }
}

/// Reject a `case` whose label repeats an earlier one. Only literal
/// constants of the same kind and text are compared.
fn check_duplicate_case(blocks: &[CaseBlock], position: Position, expr: &Expr) -> Result<(), ParseError> {
    let Expr::Constant(constant) = expr else {
        return Ok(());
    };
    let duplicate = blocks.iter().any(|b| {
        matches!(&b.expr, Some(Expr::Constant(prev)) if prev.kind == constant.kind && prev.value == constant.value)
    });
    if duplicate {
        return Err(ParseError::from_message(&messages::DUPLICATE_CASE, position, &[&constant.value]));
    }
    Ok(())
}

/// Every non-empty block but the last must end in a control transfer.
fn check_fallthrough(blocks: &[CaseBlock]) -> Result<(), ParseError> {
    let Some((_, init)) = blocks.split_last() else {
        return Ok(());
    };
    for block in init {
        if let Some(last) = block.statements.last() {
            if !last.is_control_transfer() {
                return Err(ParseError::from_message(&messages::FALLTHROUGH, block.position, &[]));
            }
        }
    }
    Ok(())
}
