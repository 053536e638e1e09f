//! Error types for the front end

use thiserror::Error;

/// Errors raised while turning template text into a parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A line whose indentation does not match any open level.
    #[error("{location}: inconsistent indentation (dedent to column {found} matches no enclosing level)")]
    InconsistentIndentation { location: Location, found: usize },

    /// Malformed syntax on a single line.
    #[error("{location}: {message}")]
    Syntax { location: Location, message: String },

    /// The same non-aggregable attribute appears twice on one tag.
    #[error("{location}: duplicate attribute \"{name}\" is not allowed")]
    DuplicateAttribute { location: Location, name: String },
}

impl ParseError {
    pub fn syntax(location: Location, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            location,
            message: message.into(),
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            ParseError::InconsistentIndentation { location, .. }
            | ParseError::Syntax { location, .. }
            | ParseError::DuplicateAttribute { location, .. } => location,
        }
    }

    pub fn location_mut(&mut self) -> &mut Location {
        match self {
            ParseError::InconsistentIndentation { location, .. }
            | ParseError::Syntax { location, .. }
            | ParseError::DuplicateAttribute { location, .. } => location,
        }
    }
}

/// Where a parse error happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub filename: Option<String>,
}

impl Location {
    pub fn new(line: usize, filename: Option<&str>) -> Self {
        Self {
            line,
            filename: filename.map(str::to_string),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.filename {
            Some(filename) => write!(f, "{}:{}", filename, self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}
