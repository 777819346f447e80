//! Rewrites applied while statements are built: attribute association,
//! tail-call marking, compound assignments and arrow function bodies.

use dscript_ast::node::*;
use dscript_core::text::Position;
use dscript_diagnostics::{messages, ParseError};
use dscript_scanner::Token;
use tracing::debug;

// ============================================================================
// Attributes
// ============================================================================

/// The attribute comments seen since the last construct, one run of
/// consecutive lines at a time.
#[derive(Debug, Default)]
pub(crate) struct AttributeRun {
    attributes: Vec<Token>,
}

impl AttributeRun {
    /// Add an attribute. A gap of a line or more closes the current run,
    /// which then belongs to the file.
    pub(crate) fn push(&mut self, attribute: Token, file_attributes: &mut Vec<String>) {
        if let Some(last) = self.attributes.last() {
            if !last.position.is_line_above(attribute.position) {
                self.flush(file_attributes);
            }
        }
        self.attributes.push(attribute);
    }

    fn is_directly_above(&self, position: Position) -> bool {
        self.attributes
            .last()
            .is_some_and(|last| last.position.is_line_above(position))
    }

    /// The run for a function or class declaration starting at `position`.
    /// A run separated from it by a blank line goes to the file instead.
    pub(crate) fn take_for_declaration(&mut self, position: Position, file_attributes: &mut Vec<String>) -> Vec<String> {
        if self.is_directly_above(position) {
            self.drain()
        } else {
            self.flush(file_attributes);
            Vec::new()
        }
    }

    /// Resolve the run before a construct that takes no attributes. Right
    /// above it the run is only valid as a file header, before anything
    /// else in the file.
    pub(crate) fn settle(
        &mut self,
        position: Position,
        started: bool,
        file_attributes: &mut Vec<String>,
    ) -> Result<(), ParseError> {
        if started && self.is_directly_above(position) {
            if let Some(first) = self.attributes.first() {
                return Err(ParseError::from_message(&messages::INVALID_ATTRIBUTE, first.position, &[]));
            }
        }
        self.flush(file_attributes);
        Ok(())
    }

    pub(crate) fn flush(&mut self, file_attributes: &mut Vec<String>) {
        file_attributes.extend(self.drain());
    }

    fn drain(&mut self) -> Vec<String> {
        self.attributes.drain(..).map(|t| t.text).collect()
    }
}

pub(crate) fn attach_attributes(stmt: &mut Stmt, attributes: Vec<String>) {
    match stmt {
        Stmt::FuncDecl(f) => f.attributes = attributes,
        Stmt::ClassDecl(c) => c.attributes = attributes,
        _ => {}
    }
}

// ============================================================================
// Tail calls
// ============================================================================

/// Rewrite a terminal `return f(...)` or `f(...)` inside `f` into a tail
/// call. The callee is matched by name only, so a local binding that
/// shadows the function name is rewritten as well.
pub(crate) fn mark_tail_call(func: &mut FuncDeclStmt) {
    let Some(last) = func.body.statements.last_mut() else {
        return;
    };
    let call = match &*last {
        Stmt::Return(ReturnStmt {
            value: Some(Expr::Call(call)),
            ..
        }) => call,
        Stmt::Call(call) => call,
        _ => return,
    };
    if !matches!(call.callee.as_ref(), Expr::Identifier(ident) if ident.name == func.name) {
        return;
    }

    debug!(function = %func.name, "rewriting terminal self call as tail call");
    let tail = Stmt::TailCall(call.clone());
    *last = tail;
}

// ============================================================================
// Expression sugar
// ============================================================================

/// `x op= value` as `x = x op value`.
pub(crate) fn compound_assignment(left: Expr, op: BinaryOperator, value: Expr) -> AssignStmt {
    AssignStmt {
        left: left.clone(),
        value: Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(value),
        }),
    }
}

/// The body of `x => expr`: a block returning `expr`.
pub(crate) fn implicit_return(value: Expr) -> BlockStmt {
    let position = value.position();
    BlockStmt {
        lbrace: position,
        statements: vec![Stmt::Return(ReturnStmt {
            position,
            value: Some(value),
        })],
        rbrace: position,
    }
}
