//! Front end seam
//!
//!     The compiler is written against [`TemplateFrontEnd`] rather than a concrete parser, so
//!     that it can re-enter the front end (captured filter bodies are recompiled from text) with
//!     whatever front end produced the outer tree.

use crate::ast::Node;
use crate::error::ParseError;
use crate::parsing::parse;

/// Something that turns template text into a parse tree rooted at a Block.
pub trait TemplateFrontEnd: Send + Sync {
    fn parse(&self, source: &str, filename: Option<&str>) -> Result<Node, ParseError>;
}

/// The indentation template parser shipped with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl TemplateFrontEnd for Parser {
    fn parse(&self, source: &str, filename: Option<&str>) -> Result<Node, ParseError> {
        parse(source, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    #[test]
    fn test_parser_through_trait_object() {
        let front_end: Box<dyn TemplateFrontEnd> = Box::new(Parser);
        let root = front_end.parse("p hi", Some("t.dv")).unwrap();
        assert!(matches!(root.kind, NodeKind::Block(_)));
        assert_eq!(root.filename.as_deref(), Some("t.dv"));
    }
}
