//! dscript_parser: Recursive descent parser for dscript.
//!
//! Turns scanner tokens into the AST of `dscript_ast`, erasing type syntax
//! on the way. Parsing stops at the first error.

mod cursor;
mod desugar;
mod expression;
mod parser;
mod precedence;
mod statement;
mod types;

pub use cursor::{Lookahead, TokenCursor};
pub use parser::{Parser, ParserOptions};

use dscript_ast::module::File;
use dscript_ast::node::Expr;
use dscript_diagnostics::ParseError;

/// Parse the source of one file. Imports are recorded but not resolved.
pub fn parse_file(source: &str, path: &str, options: ParserOptions) -> Result<File, ParseError> {
    Parser::new(source, options)?.parse_file(path)
}

/// Parse a source text holding exactly one expression.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    Parser::new(source, ParserOptions::default())?.parse_standalone_expression()
}
