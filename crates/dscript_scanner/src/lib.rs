//! dscript_scanner: Lexer for dscript source code.
//!
//! Converts source text into positioned tokens, including comment and
//! attribute tokens, which the parser filters through its cursor.

mod char_codes;
mod scanner;
mod token;

pub use scanner::{prepare_source, tokenize, Scanner, IGNORE_MARKER};
pub use token::Token;
