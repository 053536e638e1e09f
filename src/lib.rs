//! # directiv
//!
//! Compiles indentation-based templates into a JSON intermediate representation for a
//! rendering runtime.
//!
//! Pipeline
//!
//!     source ──front end──▶ parse tree ──Compiler──▶ IR ──▶ `return <json>;`
//!
//!     The front end lives in `directiv-parser` and is reached through the
//!     [`TemplateFrontEnd`] trait. The [compiler](compiler) walks the parse tree and emits
//!     [IR](ir) nodes; capture filters re-enter the front end to compile embedded template text.
//!
//! Quick use
//!
//!     let out = directiv::compile_str("p Hello", &CompileOptions::default())?;
//!     assert!(out.starts_with("return ["));

pub mod compiler;
pub mod error;
pub mod ir;
pub mod options;

pub use compiler::{merge_children, Compiler, Visited};
pub use directiv_parser::{Parser, TemplateFrontEnd};
pub use error::{CompileError, ProtocolViolation, SourceLocation};
pub use ir::IrNode;
pub use options::CompileOptions;

use std::path::Path;

/// Parse and compile template source with the bundled front end.
pub fn compile_str(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let root = Parser.parse(source, options.filename.as_deref())?;
    Compiler::new(root, options.clone()).compile()
}

/// Read and compile a template file.
///
/// The path becomes the filename reported in errors and IR provenance unless the options
/// already name one.
pub fn compile_file(path: impl AsRef<Path>, options: &CompileOptions) -> Result<String, CompileError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| CompileError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    let mut options = options.clone();
    if options.filename.is_none() {
        options.filename = Some(path.display().to_string());
    }
    compile_str(&source, &options)
}
