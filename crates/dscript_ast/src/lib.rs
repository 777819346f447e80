//! dscript_ast: Abstract Syntax Tree definitions for the dscript front end.
//!
//! This module defines the token kinds, the statement and expression sum
//! types, and the file/module roots produced by the parser.

pub mod module;
pub mod node;
pub mod syntax_kind;

// Re-export key types
pub use module::*;
pub use node::*;
pub use syntax_kind::SyntaxKind;
