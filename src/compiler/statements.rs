//! Statement tags
//!
//!     `import`, `export`, `var` and `const` tags hold module-level statements for the runtime.
//!     Their lines are passed through as one newline-joined expression:
//!
//!         import { format } from "./util"        →  import { expression: "{ format } from \"./util\"" }
//!         var
//!           total = 0
//!           count = 0                           →  var { expression: "total = 0\ncount = 0" }
//!
//!     A `function` tag takes its signature from the first line and compiles the rest as its
//!     body.

use super::{Compiler, Visited};
use crate::error::CompileError;
use crate::ir::{FunctionNode, IrNode, Provenance, StatementNode};
use directiv_parser::ast::{Node, Tag};

impl Compiler {
    /// Called for `import`, `export`, `var` and `const` tags only.
    pub(super) fn visit_statement(&self, node: &Node, tag: &Tag) -> Result<Visited, CompileError> {
        let statement = StatementNode {
            expression: lines_to_expression(tag)?,
            provenance: Provenance::of(node),
        };
        let ir = match tag.name.as_str() {
            "import" => IrNode::Import(statement),
            "export" => IrNode::Export(statement),
            "const" => IrNode::Const(statement),
            _ => IrNode::Var(statement),
        };
        Ok(Visited::One(ir))
    }

    pub(super) fn visit_function(&self, node: &Node, tag: &Tag) -> Result<Visited, CompileError> {
        let Some((signature, body)) = tag.block.nodes.split_first() else {
            return Err(CompileError::structural(node, "function is missing a signature"));
        };
        let Some(signature) = signature.text() else {
            return Err(CompileError::structural(
                signature,
                "function signature must be on the function line",
            ));
        };

        Ok(Visited::One(IrNode::Function(FunctionNode {
            expression: signature.to_string(),
            children: self.visit_nodes(body)?,
            buffer: false,
            provenance: Provenance::of(node),
        })))
    }
}

fn lines_to_expression(tag: &Tag) -> Result<String, CompileError> {
    let lines = tag
        .block
        .nodes
        .iter()
        .map(|node| {
            node.text().ok_or_else(|| {
                CompileError::structural(
                    node,
                    format!("{} statements may only contain text lines", tag.name),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use directiv_parser::testing::*;
    use rstest::rstest;
    use serde_json::json;

    fn visit(node: Node) -> Result<serde_json::Value, CompileError> {
        let visited = Compiler::new(block(vec![]), CompileOptions::default()).visit(Some(&node))?;
        Ok(serde_json::to_value(visited.into_vec()).unwrap())
    }

    #[rstest]
    #[case("import")]
    #[case("export")]
    #[case("var")]
    #[case("const")]
    fn test_statements_join_lines(#[case] name: &str) {
        let out = visit(tag(name, vec![text("a = 1"), text("b = 2")])).unwrap();
        assert_eq!(
            out,
            json!([{"type": name, "expression": "a = 1\nb = 2", "line": 1}])
        );
    }

    #[test]
    fn test_statement_rejects_non_text_lines() {
        let err = visit(tag("var", vec![at(tag("total", vec![text("= 0")]), 2, None)])).unwrap_err();
        assert!(matches!(err, CompileError::Structural { .. }));
        assert_eq!(
            err.to_string(),
            "line 2: var statements may only contain text lines"
        );
    }

    #[test]
    fn test_function() {
        let out = visit(tag(
            "function",
            vec![text("greet(name)"), tag("p", vec![text("hi")])],
        ))
        .unwrap();
        assert_eq!(out[0]["type"], "function");
        assert_eq!(out[0]["expression"], "greet(name)");
        assert_eq!(out[0]["buffer"], false);
        assert_eq!(out[0]["children"][0]["name"], "p");
    }

    #[test]
    fn test_function_without_signature() {
        let err = visit(at(tag("function", vec![]), 6, Some("f.dv"))).unwrap_err();
        assert!(matches!(err, CompileError::Structural { .. }));
        assert_eq!(err.to_string(), "f.dv:6: function is missing a signature");
    }
}
