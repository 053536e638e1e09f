//! Compile errors
//!
//!     User-facing failures are [`CompileError`] values propagated with `?`; every variant that
//!     concerns a template node carries the node's [`SourceLocation`]. A parse tree that breaks
//!     the front end contract is a bug in the front end, not in the template, and is raised as a
//!     [`ProtocolViolation`] panic instead.

use directiv_parser::ast::Node;
use directiv_parser::ParseError;
use std::fmt;
use thiserror::Error;

pub use directiv_parser::Location as SourceLocation;

#[derive(Debug, Error)]
pub enum CompileError {
    /// A construct the compiler deliberately rejects (mixins, doctypes).
    #[error("{location}: {message}")]
    Unsupported {
        message: String,
        location: SourceLocation,
    },

    /// A well-formed node used where it is not allowed.
    #[error("{location}: {message}")]
    Structural {
        message: String,
        location: SourceLocation,
    },

    #[error(transparent)]
    FrontEnd(#[from] ParseError),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to serialize IR: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompileError {
    pub(crate) fn unsupported(node: &Node, message: impl Into<String>) -> Self {
        CompileError::Unsupported {
            message: message.into(),
            location: location_of(node),
        }
    }

    pub(crate) fn structural(node: &Node, message: impl Into<String>) -> Self {
        CompileError::Structural {
            message: message.into(),
            location: location_of(node),
        }
    }

    /// Where the error happened, when it concerns a template location.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CompileError::Unsupported { location, .. }
            | CompileError::Structural { location, .. } => Some(location),
            CompileError::FrontEnd(err) => Some(err.location()),
            CompileError::Io { .. } | CompileError::Serialization(_) => None,
        }
    }

    /// Move the reported line by `offset`, for errors raised while compiling embedded text.
    pub(crate) fn shift_lines(mut self, offset: usize) -> Self {
        let location = match &mut self {
            CompileError::Unsupported { location, .. }
            | CompileError::Structural { location, .. } => Some(location),
            CompileError::FrontEnd(err) => Some(err.location_mut()),
            CompileError::Io { .. } | CompileError::Serialization(_) => None,
        };
        if let Some(location) = location {
            location.line += offset;
        }
        self
    }
}

pub(crate) fn location_of(node: &Node) -> SourceLocation {
    SourceLocation::new(node.line, node.filename.as_deref())
}

/// A parse tree that does not follow the front end contract.
///
/// Raised with [`std::panic::panic_any`], so callers that host untrusted front ends can recover
/// it with `catch_unwind` and `downcast_ref::<ProtocolViolation>()`.
#[derive(Debug, Clone)]
pub struct ProtocolViolation {
    pub reason: String,
    pub node: Node,
}

impl ProtocolViolation {
    pub(crate) fn raise(reason: impl Into<String>, node: &Node) -> ! {
        std::panic::panic_any(ProtocolViolation {
            reason: reason.into(),
            node: node.clone(),
        })
    }
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: front end protocol violation on {} node: {}",
            location_of(&self.node),
            self.node.type_name(),
            self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directiv_parser::testing::{at, doctype, raw_code};

    #[test]
    fn test_errors_render_their_location() {
        let node = at(doctype(), 4, Some("layout.dv"));
        let err = CompileError::unsupported(&node, "Doctypes are not supported at this time");
        assert_eq!(
            err.to_string(),
            "layout.dv:4: Doctypes are not supported at this time"
        );
        assert_eq!(err.location().map(|l| l.line), Some(4));
    }

    #[test]
    fn test_shift_lines() {
        let node = at(doctype(), 2, None);
        let err = CompileError::structural(&node, "nope").shift_lines(10);
        assert_eq!(err.location().map(|l| l.line), Some(12));
    }

    #[test]
    fn test_protocol_violation_display() {
        let violation = ProtocolViolation {
            reason: "unknown statement prefix `ZZZ`".into(),
            node: at(raw_code("ZZZx"), 9, None),
        };
        assert_eq!(
            violation.to_string(),
            "line 9: front end protocol violation on Code node: unknown statement prefix `ZZZ`"
        );
    }
}
