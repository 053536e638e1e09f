//! # directiv-parser
//!
//! The front end of the directiv template compiler: indentation-based template source in, a
//! parse tree of [`ast::Node`]s out.
//!
//! Pipeline
//!
//!     source ──lexing──▶ tokens ──line grouping──▶ SourceLine* ──parsing──▶ Node (root Block)
//!
//!     [lexing] tokenizes with logos and groups the tokens into physical lines with their
//!     indentation width. [parsing] classifies each line on its own and builds the tree from the
//!     indentation structure.
//!
//!     The compiler never depends on the parser directly, only on the [`TemplateFrontEnd`]
//!     trait and the node shapes in [`ast`]. Any front end that produces those shapes can be
//!     plugged in.

pub mod ast;
pub mod error;
pub mod front_end;
pub mod lexing;
pub mod parsing;
pub mod testing;

pub use ast::{CodePrefix, Node, NodeKind};
pub use error::{Location, ParseError};
pub use front_end::{Parser, TemplateFrontEnd};
pub use parsing::parse;
