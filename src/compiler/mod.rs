//! AST to IR compiler
//!
//!     A recursive visitor over the parse tree. Each node kind has one handler, and every
//!     handler returns a [`Visited`]: nothing, one IR node, or an ordered list of IR nodes that
//!     the caller splices into its own child list. Blocks are the usual source of lists; a
//!     capture filter is the other one.
//!
//!     Handlers are spread over submodules by concern:
//!
//!         blocks       Block (bare lists and named layout slots)
//!         control      Code statements, Case/When, Each/For
//!         tags         Tag, child compilation, component class injection
//!         attributes   attribute aggregation into props
//!         statements   import/export/var/const/function tags
//!         translation  the translation tag
//!         leaves       Text, Literal, Comment, BlockComment, Yield
//!         capture      filters, the capture sub-compilation and its serializer
//!
//!     The compiler holds no mutable state. A [`Compiler`] can be compiled any number of times
//!     and always yields the same IR.

mod attributes;
mod blocks;
mod capture;
mod control;
mod leaves;
mod statements;
mod tags;
mod translation;

pub use capture::serializer::format_children;

use crate::error::CompileError;
use crate::ir::IrNode;
use crate::options::CompileOptions;
use directiv_parser::ast::{Node, NodeKind};
use directiv_parser::{Parser, TemplateFrontEnd};
use std::sync::Arc;

/// The result of visiting one parse tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Visited {
    Skip,
    One(IrNode),
    Many(Vec<IrNode>),
}

impl Visited {
    /// The visited nodes as a list: `Skip` is empty, `One` is a single element.
    pub fn into_vec(self) -> Vec<IrNode> {
        match self {
            Visited::Skip => Vec::new(),
            Visited::One(node) => vec![node],
            Visited::Many(nodes) => nodes,
        }
    }
}

impl From<IrNode> for Visited {
    fn from(node: IrNode) -> Self {
        Visited::One(node)
    }
}

/// Append a visit result to `acc`: lists are spliced in order, skips leave it untouched.
pub fn merge_children(acc: &mut Vec<IrNode>, visited: Visited) {
    match visited {
        Visited::Skip => {}
        Visited::One(node) => acc.push(node),
        Visited::Many(nodes) => acc.extend(nodes),
    }
}

pub struct Compiler {
    root: Node,
    options: CompileOptions,
    front_end: Arc<dyn TemplateFrontEnd>,
}

impl Compiler {
    /// A compiler for `root` using the bundled [`Parser`] for capture re-parsing.
    pub fn new(root: Node, options: CompileOptions) -> Self {
        Self {
            root,
            options,
            front_end: Arc::new(Parser),
        }
    }

    pub fn with_front_end(mut self, front_end: Arc<dyn TemplateFrontEnd>) -> Self {
        self.front_end = front_end;
        self
    }

    /// Compile to the runtime artifact: `return <IR as JSON>;`.
    pub fn compile(&self) -> Result<String, CompileError> {
        let ir = self.compile_ir()?;
        let json = if self.options.pretty {
            serde_json::to_string_pretty(&ir)?
        } else {
            serde_json::to_string(&ir)?
        };
        Ok(format!("return {};", json))
    }

    /// Compile to the IR list.
    pub fn compile_ir(&self) -> Result<Vec<IrNode>, CompileError> {
        tracing::debug!(
            filename = self.options.filename.as_deref().unwrap_or("<anonymous>"),
            "compiling template"
        );
        Ok(self.visit(Some(&self.root))?.into_vec())
    }

    /// Compile a single node. An absent node is skipped.
    pub fn visit(&self, node: Option<&Node>) -> Result<Visited, CompileError> {
        let Some(node) = node else {
            return Ok(Visited::Skip);
        };
        tracing::trace!(kind = node.type_name(), line = node.line, "visit");

        match &node.kind {
            NodeKind::Block(block) => self.visit_block(node, block),
            NodeKind::Tag(tag) => self.visit_tag(node, tag),
            NodeKind::Text(text) => Ok(self.visit_text(node, text)),
            NodeKind::Comment(comment) => Ok(self.visit_comment(node, comment)),
            NodeKind::BlockComment(comment) => Ok(self.visit_block_comment(node, comment)),
            NodeKind::Code(code) => self.visit_code(node, code),
            NodeKind::Each(each) => self.visit_each(node, each),
            NodeKind::Case(case) => self.visit_case(node, case),
            NodeKind::When(when) => self.visit_when(node, when),
            NodeKind::Literal(literal) => Ok(self.visit_literal(node, literal)),
            NodeKind::Filter(filter) => self.visit_filter(node, filter),
            NodeKind::Yield(y) => Ok(self.visit_yield(node, y)),
            NodeKind::Mixin(_) | NodeKind::MixinBlock => Err(CompileError::unsupported(
                node,
                "Mixins are not supported at this time",
            )),
            NodeKind::Doctype(_) => Err(CompileError::unsupported(
                node,
                "Doctypes are not supported at this time",
            )),
        }
    }

    /// Visit sibling nodes and flatten the results into one list.
    fn visit_nodes(&self, nodes: &[Node]) -> Result<Vec<IrNode>, CompileError> {
        let mut acc = Vec::new();
        for node in nodes {
            merge_children(&mut acc, self.visit(Some(node))?);
        }
        Ok(acc)
    }
}

/// Encode `value` as a JSON string literal.
pub(crate) fn json_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
