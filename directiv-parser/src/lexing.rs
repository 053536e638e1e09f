//! Lexer
//!
//!     Lexing runs in two steps:
//!         1. Core tokenization using logos. See [tokens](tokens). Newlines, horizontal
//!            whitespace runs and other text are the only token kinds.
//!         2. Line grouping. See [line_grouping](line_grouping). Tokens are split at line
//!            breaks into [`SourceLine`]s carrying their indentation width and content.
//!
//!     At this point lexing is complete. Indentation levels are resolved by the parser, which
//!     compares each line's width against the stack of open levels.

pub mod line_grouping;
pub mod tokens;

pub use line_grouping::{group_lines, SourceLine};
pub use tokens::{tokenize, Token};

/// Tokenize and group source text into lines.
pub fn lex(source: &str) -> Vec<SourceLine> {
    let tokens = tokenize(source);
    group_lines(source, &tokens)
}
