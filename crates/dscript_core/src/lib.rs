//! dscript_core: Core types shared by every stage of the dscript front end.
//!
//! Provides source positions used by tokens, AST nodes and diagnostics.

pub mod text;

// Re-export commonly used types
pub use text::Position;
