//! Filters and captures
//!
//!     A filter hands its raw body to the runtime as a `filter` node. The `capture` filter is
//!     the exception: its body is template source, compiled on the spot with a fresh compiler
//!     sharing this one's front end and options, and a `var` statement assigning the body to a
//!     variable is put in front of the compiled nodes:
//!
//!         :capture(as="snippet")           var { expression: "snippet = \"p Hello\";" }
//!           p Hello                  →     tag p { ... }
//!
//!     With `unquote` the variable gets the [serializer](serializer)'s rendering of the
//!     compiled nodes instead of the raw text, an expression that rebuilds the source with
//!     runtime values substituted.
//!
//!     Nodes compiled from the body carry line numbers of the outer template.

pub mod serializer;

use super::{json_literal, Compiler, Visited};
use crate::error::CompileError;
use crate::ir::{FilterNode, IrNode, Provenance, StatementNode};
use directiv_parser::ast::{AttributeValue, Filter, Node};
use indexmap::IndexMap;
use std::sync::Arc;

pub const CAPTURE_FILTER: &str = "capture";

impl Compiler {
    pub(in crate::compiler) fn visit_filter(
        &self,
        node: &Node,
        filter: &Filter,
    ) -> Result<Visited, CompileError> {
        let content = filter
            .block
            .nodes
            .iter()
            .map(|line| line.text().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n");

        if filter.name == CAPTURE_FILTER {
            return self.visit_capture(node, filter, &content);
        }

        let attrs: IndexMap<String, AttributeValue> = filter
            .attrs
            .iter()
            .map(|attr| (attr.name.clone(), attr.val.clone()))
            .collect();

        Ok(Visited::One(IrNode::Filter(FilterNode {
            name: filter.name.clone(),
            attrs,
            content,
            provenance: Provenance::of(node),
        })))
    }

    fn visit_capture(
        &self,
        node: &Node,
        filter: &Filter,
        source: &str,
    ) -> Result<Visited, CompileError> {
        let offset = node.line;
        let filename = node
            .filename
            .as_deref()
            .or(self.options.filename.as_deref());
        tracing::debug!(line = offset, "compiling captured block");

        let root = self
            .front_end
            .parse(source, filename)
            .map_err(|err| CompileError::from(err).shift_lines(offset))?;
        let nested = Compiler {
            root,
            options: self.options.clone(),
            front_end: Arc::clone(&self.front_end),
        };
        let mut children = nested.compile_ir().map_err(|err| err.shift_lines(offset))?;
        for child in children.iter_mut() {
            child.walk_mut(&mut |ir| {
                if let Some(line) = ir.provenance_mut().line.as_mut() {
                    *line += offset;
                }
            });
        }

        let target = self.capture_target(filter);
        let value = if unquote(filter) {
            serializer::format_children(&children, 0)
        } else {
            json_literal(source)
        };

        children.insert(
            0,
            IrNode::Var(StatementNode {
                expression: format!("{} = {};", target, value),
                provenance: Provenance::of(node),
            }),
        );
        Ok(Visited::Many(children))
    }

    /// The variable named by `as`, quotes removed, or the configured default.
    fn capture_target(&self, filter: &Filter) -> String {
        match filter.attr("as") {
            Some(AttributeValue::Expression(expr)) => strip_quotes(expr).to_string(),
            Some(AttributeValue::Flag(_)) => {
                tracing::warn!(
                    fallback = %self.options.capture_variable,
                    "capture `as` has no value, using the default variable"
                );
                self.options.capture_variable.clone()
            }
            None => self.options.capture_variable.clone(),
        }
    }
}

/// `unquote` is on as a bare flag or with any value other than `false`.
fn unquote(filter: &Filter) -> bool {
    match filter.attr("unquote") {
        None => false,
        Some(AttributeValue::Flag(flag)) => *flag,
        Some(AttributeValue::Expression(expr)) => expr.trim() != "false",
    }
}

fn strip_quotes(expr: &str) -> &str {
    let expr = expr.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|q| expr.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)))
        .unwrap_or(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use directiv_parser::testing::*;
    use serde_json::json;

    fn visit(node: Node, options: CompileOptions) -> Result<Vec<IrNode>, CompileError> {
        Ok(Compiler::new(block(vec![]), options)
            .visit(Some(&node))?
            .into_vec())
    }

    fn var_expression(nodes: &[IrNode]) -> &str {
        match &nodes[0] {
            IrNode::Var(var) => &var.expression,
            other => panic!("expected the capture var first, got {:?}", other),
        }
    }

    #[test]
    fn test_capture_quotes_source_by_default() {
        let node = at(filter("capture", vec![], &["p Hello", "  b= name"]), 5, Some("c.dv"));
        let out = visit(node, CompileOptions::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(var_expression(&out), r#"capture = "p Hello\n  b= name";"#);
        assert_eq!(out[0].provenance().line, Some(5));

        let IrNode::Tag(p) = &out[1] else {
            panic!("expected p");
        };
        assert_eq!(p.provenance.line, Some(6));
        assert_eq!(p.provenance.filename.as_deref(), Some("c.dv"));
        assert_eq!(p.children[1].provenance().line, Some(7));
    }

    #[test]
    fn test_capture_target() {
        let node = filter("capture", vec![attr("as", "\"snippet\"")], &["| x"]);
        let out = visit(node, CompileOptions::default()).unwrap();
        assert_eq!(var_expression(&out), r#"snippet = "| x";"#);

        let node = filter("capture", vec![], &["| x"]);
        let out = visit(node, CompileOptions::default().with_capture_variable("buf")).unwrap();
        assert_eq!(var_expression(&out), r#"buf = "| x";"#);
    }

    #[test]
    fn test_capture_unquote() {
        let node = filter("capture", vec![flag("unquote")], &["p hi"]);
        let out = visit(node, CompileOptions::default()).unwrap();
        insta::assert_snapshot!(var_expression(&out), @r#"capture = "" + "p(" + ")\n" + "  " + "| " + "hi";"#);

        let node = filter("capture", vec![attr("unquote", "false")], &["p hi"]);
        let out = visit(node, CompileOptions::default()).unwrap();
        assert_eq!(var_expression(&out), r#"capture = "p hi";"#);
    }

    #[test]
    fn test_capture_errors_point_into_outer_template() {
        let node = at(filter("capture", vec![], &["p", "doctype html"]), 3, None);
        let err = visit(node, CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::Unsupported { .. }));
        assert_eq!(err.location().map(|l| l.line), Some(5));

        let node = at(filter("capture", vec![], &["a(x=1, x=2)"]), 3, None);
        let err = visit(node, CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::FrontEnd(_)));
        assert_eq!(err.location().map(|l| l.line), Some(4));
    }

    #[test]
    fn test_other_filters_pass_content_through() {
        let node = filter(
            "markdown",
            vec![attr("lang", "\"en\""), flag("raw")],
            &["# Title", "", "  indented"],
        );
        let out = visit(node, CompileOptions::default()).unwrap();
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!([{
                "type": "filter",
                "name": "markdown",
                "attrs": {"lang": "\"en\"", "raw": true},
                "content": "# Title\n\n  indented",
                "line": 1
            }])
        );
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"a\""), "a");
        assert_eq!(strip_quotes(" 'b' "), "b");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes("\"half"), "\"half");
    }
}
