//! Line grouping
//!
//!     Groups the flat token stream into [`SourceLine`]s. The leading Whitespace token of a line
//!     becomes its indentation width, the rest of the line (up to, not including, the line break)
//!     becomes its content. Lines holding nothing but whitespace are kept as blank lines: they do
//!     not open or close indentation levels, but raw text bodies (filters, `tag.` blocks) need
//!     them to reproduce the captured text faithfully.
//!
//!     A tab counts as a single column. Mixing tabs and spaces is legal as long as the resulting
//!     widths nest consistently.

use super::tokens::Token;
use serde::Serialize;

/// One physical line of template source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    /// 1-based line number.
    pub number: usize,
    /// Indentation width in columns.
    pub indent: usize,
    /// Line content without indentation or line break; empty for blank lines.
    pub content: String,
    /// Everything after the line break, before trimming the indentation. Raw text blocks use
    /// this to keep indentation deeper than the block's own.
    pub raw: String,
}

impl SourceLine {
    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }
}

/// Group tokens into source lines.
pub fn group_lines(source: &str, tokens: &[(Token, logos::Span)]) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut number = 1;
    let mut line_start = 0;

    let flush = |number: usize, start: usize, end: usize, lines: &mut Vec<SourceLine>| {
        let raw = &source[start..end];
        let content = raw.trim_start_matches([' ', '\t']);
        let indent = raw.len() - content.len();
        let content = content.trim_end();
        lines.push(SourceLine {
            number,
            indent,
            content: content.to_string(),
            raw: raw.trim_end().to_string(),
        });
    };

    for (token, span) in tokens {
        if *token == Token::Newline {
            flush(number, line_start, span.start, &mut lines);
            number += 1;
            line_start = span.end;
        }
    }
    if line_start < source.len() {
        flush(number, line_start, source.len(), &mut lines);
    }

    lines
}
