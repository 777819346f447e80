//! Expression parsing.
//!
//! Levels, loosest first: function values and arrow functions, the ternary
//! operator, binary operators by precedence climbing, prefix unary
//! operators, postfix chains and primaries.

use dscript_ast::node::*;
use dscript_ast::syntax_kind::SyntaxKind;
use dscript_diagnostics::{messages, ParseError};

use crate::desugar::implicit_return;
use crate::parser::Parser;
use crate::precedence::{get_binary_operator, OperatorPrecedence, SHIFT_RIGHT};

impl Parser {
    /// Any expression, including arrow functions. Used wherever a value is
    /// expected: initializers, arguments, return values.
    pub(crate) fn parse_value_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(|p| {
            if p.is_arrow_function_start() {
                p.parse_arrow_function()
            } else {
                p.parse_expression()
            }
        })
    }

    /// A ternary or binary expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_binary_expression(OperatorPrecedence::Logical)?;
        if self.optional_token(SyntaxKind::QuestionToken).is_none() {
            return Ok(condition);
        }
        let then_expr = self.parse_value_expression()?;
        self.expect_token(SyntaxKind::ColonToken)?;
        let else_expr = self.parse_value_expression()?;
        Ok(Expr::Ternary(TernaryExpr {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }))
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn parse_binary_expression(&mut self, min: OperatorPrecedence) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expression()?;

        while let Some(((op, precedence), width)) = self.peek_binary_operator() {
            if precedence < min {
                break;
            }
            self.cursor.advance(width);
            let right = self.parse_binary_expression(precedence.next())?;
            left = Expr::Binary(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    /// The binary operator at the cursor and how many tokens it spans.
    fn peek_binary_operator(&self) -> Option<((BinaryOperator, OperatorPrecedence), usize)> {
        let token = self.cursor.peek();
        if token.kind == SyntaxKind::GreaterThanToken {
            let next = self.cursor.peek_nth(1);
            if next.kind == SyntaxKind::GreaterThanToken && token.position.is_adjacent_to(next.position) {
                return Some((SHIFT_RIGHT, 2));
            }
        }
        get_binary_operator(token.kind).map(|entry| (entry, 1))
    }

    fn parse_unary_expression(&mut self) -> Result<Expr, ParseError> {
        let op = match self.cursor.peek_kind() {
            SyntaxKind::PlusToken => UnaryOperator::Plus,
            SyntaxKind::MinusToken => UnaryOperator::Minus,
            SyntaxKind::TildeToken => UnaryOperator::BitNot,
            SyntaxKind::ExclamationToken => UnaryOperator::Not,
            SyntaxKind::TypeOfKeyword => {
                let position = self.cursor.peek().position;
                return Err(self.error(&messages::TYPEOF_NOT_SUPPORTED, position, &[]));
            }
            _ => {
                let expr = self.parse_postfix_expression()?;
                self.skip_as_expression()?;
                return Ok(expr);
            }
        };

        let token = self.cursor.next();
        let operand = self.nested(|p| p.parse_unary_expression())?;
        Ok(Expr::Unary(UnaryExpr {
            position: token.position,
            op,
            operand: Box::new(operand),
        }))
    }

    // ========================================================================
    // Postfix chains
    // ========================================================================

    /// A primary followed by any run of `.x`, `[i]`, `(args)` and their
    /// `?.` forms.
    pub(crate) fn parse_postfix_expression(&mut self) -> Result<Expr, ParseError> {
        self.skip_type_assertion()?;
        let primary = self.parse_primary_expression()?;
        self.parse_call_chain(primary)
    }

    fn parse_call_chain(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        let mut chained = false;
        loop {
            expr = match self.cursor.peek_kind() {
                SyntaxKind::DotToken => {
                    self.cursor.next();
                    self.parse_selector(expr, false)?
                }
                SyntaxKind::QuestionDotToken => {
                    self.cursor.next();
                    match self.cursor.peek_kind() {
                        SyntaxKind::OpenParenToken => self.parse_call(expr, true)?,
                        SyntaxKind::OpenBracketToken => self.parse_index(expr, true)?,
                        _ => self.parse_selector(expr, true)?,
                    }
                }
                SyntaxKind::OpenBracketToken => self.parse_index(expr, false)?,
                SyntaxKind::OpenParenToken => self.parse_call(expr, false)?,
                _ => break,
            };
            chained = true;
        }

        if chained {
            expr.mark_first_in_chain();
        }
        Ok(expr)
    }

    fn parse_selector(&mut self, x: Expr, optional: bool) -> Result<Expr, ParseError> {
        let name = self.expect_name()?;
        self.skip_generic_arguments();
        Ok(Expr::Selector(SelectorExpr {
            x: Box::new(x),
            member: IdentExpr {
                position: name.position,
                name: name.text,
            },
            optional,
            first_in_chain: false,
        }))
    }

    fn parse_index(&mut self, x: Expr, optional: bool) -> Result<Expr, ParseError> {
        let lbrack = self.expect_token(SyntaxKind::OpenBracketToken)?;
        let index = self.parse_expression()?;
        self.expect_token(SyntaxKind::CloseBracketToken)?;
        Ok(Expr::Index(IndexExpr {
            x: Box::new(x),
            lbrack: lbrack.position,
            index: Box::new(index),
            optional,
            first_in_chain: false,
        }))
    }

    fn parse_call(&mut self, callee: Expr, optional: bool) -> Result<Expr, ParseError> {
        let lparen = self.expect_token(SyntaxKind::OpenParenToken)?;
        let (args, spread) = self.parse_call_arguments()?;
        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            lparen: lparen.position,
            args,
            spread,
            optional,
            first_in_chain: false,
        }))
    }

    /// Arguments up to and including the closing `)`. Only the last
    /// argument may be spread.
    fn parse_call_arguments(&mut self) -> Result<(Vec<Expr>, bool), ParseError> {
        let mut args = Vec::new();
        let mut spread = false;

        while !self.cursor.at(SyntaxKind::CloseParenToken) {
            if let Some(dots) = self.optional_token(SyntaxKind::DotDotDotToken) {
                spread = true;
                args.push(self.parse_value_expression()?);
                self.cursor.ignore_optional(SyntaxKind::CommaToken, 1);
                if !self.cursor.at(SyntaxKind::CloseParenToken) {
                    return Err(self.error(&messages::SPREAD_MUST_BE_LAST, dots.position, &[]));
                }
                break;
            }
            args.push(self.parse_value_expression()?);
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }

        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok((args, spread))
    }

    // ========================================================================
    // Primaries
    // ========================================================================

    fn parse_primary_expression(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.peek().clone();
        if let Some(kind) = constant_kind(token.kind) {
            self.cursor.next();
            return Ok(Expr::Constant(ConstantExpr::new(token.position, kind, token.text)));
        }

        match token.kind {
            SyntaxKind::HexLiteral => {
                self.cursor.next();
                let digits = token.text.get(2..).unwrap_or_default();
                let value = i64::from_str_radix(digits, 16)
                    .map_err(|_| self.error(&messages::INVALID_HEX_LITERAL, token.position, &[&token.text]))?;
                Ok(Expr::Constant(ConstantExpr::new(token.position, ConstantKind::Int, value.to_string())))
            }
            SyntaxKind::Identifier | SyntaxKind::DefaultKeyword => {
                self.cursor.next();
                self.skip_generic_arguments();
                Ok(Expr::Identifier(IdentExpr {
                    position: token.position,
                    name: token.text,
                }))
            }
            SyntaxKind::OpenParenToken => {
                self.cursor.next();
                let expr = self.parse_value_expression()?;
                self.expect_token(SyntaxKind::CloseParenToken)?;
                Ok(expr)
            }
            SyntaxKind::NewKeyword => self.parse_new_instance(),
            SyntaxKind::FunctionKeyword => self.parse_function_literal(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_map_literal(),
            _ => Err(self.error_at_current(&messages::EXPECTING_EXPRESSION)),
        }
    }

    /// `new Name(args)` or `new pkg.Name(args)`.
    fn parse_new_instance(&mut self) -> Result<Expr, ParseError> {
        let keyword = self.expect_token(SyntaxKind::NewKeyword)?;
        let name = self.expect_name()?;
        let mut type_name = Expr::Identifier(IdentExpr {
            position: name.position,
            name: name.text,
        });
        if self.optional_token(SyntaxKind::DotToken).is_some() {
            type_name = self.parse_selector(type_name, false)?;
        }
        self.skip_generic_arguments();

        self.expect_token(SyntaxKind::OpenParenToken)?;
        let (args, spread) = self.parse_call_arguments()?;
        Ok(Expr::NewInstance(NewInstanceExpr {
            position: keyword.position,
            type_name: Box::new(type_name),
            args,
            spread,
        }))
    }

    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect_token(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.cursor.at(SyntaxKind::CloseBracketToken) {
            elements.push(self.parse_value_expression()?);
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken)?;
        Ok(Expr::ArrayLiteral(ArrayLiteralExpr {
            position: open.position,
            elements,
        }))
    }

    /// `{ key: value, ... }` where a key is a string, an integer or a name.
    fn parse_map_literal(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect_token(SyntaxKind::OpenBraceToken)?;
        let mut entries = Vec::new();
        while !self.cursor.at(SyntaxKind::CloseBraceToken) {
            let kind = self.cursor.peek_kind();
            if !(kind.is_identifier_or_keyword() || matches!(kind, SyntaxKind::StringLiteral | SyntaxKind::IntLiteral)) {
                return Err(self.error_at_current(&messages::EXPECTING_IDENTIFIER));
            }
            let key = self.cursor.next();
            self.expect_token(SyntaxKind::ColonToken)?;
            let value = self.parse_value_expression()?;
            entries.push(KeyValue {
                position: key.position,
                key: key.text,
                value,
            });
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(Expr::MapLiteral(MapLiteralExpr {
            position: open.position,
            entries,
        }))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// `function (args): T { ... }` in expression position.
    fn parse_function_literal(&mut self) -> Result<Expr, ParseError> {
        let keyword = self.expect_token(SyntaxKind::FunctionKeyword)?;
        self.skip_generic_parameters()?;
        let arguments = self.parse_arguments()?;
        self.skip_type_annotation()?;
        let body = self.parse_block()?;
        Ok(Expr::FuncLiteral(FuncLiteralExpr {
            position: keyword.position,
            arguments,
            body,
        }))
    }

    /// Whether an arrow function starts here. Decided on at most four
    /// tokens: `x =>`, `() =>`, `(...`, `(x,`, `(x:`, `(x?`, `(x) =>`.
    fn is_arrow_function_start(&self) -> bool {
        let c = &self.cursor;
        match c.peek_kind() {
            SyntaxKind::Identifier => c.peek_nth(1).kind == SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::OpenParenToken => match c.peek_nth(1).kind {
                SyntaxKind::CloseParenToken => matches!(
                    c.peek_nth(2).kind,
                    SyntaxKind::EqualsGreaterThanToken | SyntaxKind::ColonToken
                ),
                SyntaxKind::DotDotDotToken => true,
                SyntaxKind::Identifier => match c.peek_nth(2).kind {
                    SyntaxKind::CommaToken | SyntaxKind::ColonToken => true,
                    SyntaxKind::QuestionToken => matches!(
                        c.peek_nth(3).kind,
                        SyntaxKind::ColonToken | SyntaxKind::CommaToken | SyntaxKind::CloseParenToken
                    ),
                    SyntaxKind::CloseParenToken => c.peek_nth(3).kind == SyntaxKind::EqualsGreaterThanToken,
                    _ => false,
                },
                _ => false,
            },
            _ => false,
        }
    }

    fn parse_arrow_function(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.peek().clone();
        let arguments = if start.kind == SyntaxKind::Identifier {
            self.cursor.next();
            Arguments {
                opening: start.position,
                fields: vec![Field {
                    position: start.position,
                    name: start.text,
                    optional: false,
                }],
                variadic: false,
            }
        } else {
            let arguments = self.parse_arguments()?;
            self.skip_type_annotation()?;
            arguments
        };

        self.expect_token(SyntaxKind::EqualsGreaterThanToken)?;

        let body = if self.cursor.at(SyntaxKind::OpenBraceToken) {
            self.parse_block()?
        } else {
            implicit_return(self.parse_value_expression()?)
        };

        Ok(Expr::FuncLiteral(FuncLiteralExpr {
            position: start.position,
            arguments,
            body,
        }))
    }

    /// A parameter list: `(a, b?: T, ...rest: T[])`.
    pub(crate) fn parse_arguments(&mut self) -> Result<Arguments, ParseError> {
        let open = self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut fields = Vec::new();
        let mut variadic = false;

        loop {
            if self.optional_token(SyntaxKind::DotDotDotToken).is_some() {
                variadic = true;
            }
            if !self.cursor.at(SyntaxKind::Identifier) {
                break;
            }
            let name = self.cursor.next();
            let optional = self.optional_token(SyntaxKind::QuestionToken).is_some();
            self.skip_type_annotation()?;
            fields.push(Field {
                position: name.position,
                name: name.text,
                optional,
            });

            if variadic {
                if self.cursor.at(SyntaxKind::CommaToken) {
                    let next = self.cursor.peek_nth(1).position;
                    return Err(self.error(&messages::PARAMETER_AFTER_VARIADIC, next, &[]));
                }
                break;
            }
            if self.optional_token(SyntaxKind::CommaToken).is_none() {
                break;
            }
        }

        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(Arguments {
            opening: open.position,
            fields,
            variadic,
        })
    }
}

fn constant_kind(kind: SyntaxKind) -> Option<ConstantKind> {
    let kind = match kind {
        SyntaxKind::IntLiteral => ConstantKind::Int,
        SyntaxKind::FloatLiteral => ConstantKind::Float,
        SyntaxKind::StringLiteral => ConstantKind::String,
        SyntaxKind::RuneLiteral => ConstantKind::Rune,
        SyntaxKind::TrueKeyword => ConstantKind::True,
        SyntaxKind::FalseKeyword => ConstantKind::False,
        SyntaxKind::NullKeyword => ConstantKind::Null,
        SyntaxKind::UndefinedKeyword => ConstantKind::Undefined,
        _ => return None,
    };
    Some(kind)
}
