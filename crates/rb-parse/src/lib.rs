//! Grammars for the structured narration sentences of a game feed.
//!
//! Each action family has its own template; parsing a description yields a
//! typed tree whose `Display` reproduces the sentence.

/// Typed sentence trees.
pub mod ast;
/// Ariadne rendering of parse failures.
pub mod diagnostics;
/// Logos tokenizer.
pub mod lexer;
/// Family grammars.
pub mod parser;

/// Render a parse failure for a terminal.
pub use diagnostics::render_parse_error;
/// Any parsed sentence.
pub use ast::Sentence;
/// Sentence family selector, parse error and result alias.
pub use parser::{Family, ParseError, ParseResult, parse};
