//! Control flow
//!
//!     Statements arrive as Code nodes whose value starts with a 3 character prefix code (see
//!     [`CodePrefix`]). The prefix picks the IR node type and the rest of the value is the
//!     expression text. A value without a known prefix can only come from a broken front end,
//!     so it panics with a [`ProtocolViolation`] payload rather than returning an error.
//!
//!     Loop headers are split on the first standalone `in`:
//!
//!         each item, i in items   →  each { value: item, key: i, expression: items }
//!         each item in items      →  each { value: item, key: $index, ... }
//!         for (i = 0; i < 5; i++) →  for { expression: "i = 0; i < 5; i++" }

use super::{Compiler, Visited};
use crate::error::{CompileError, ProtocolViolation};
use crate::ir::{
    BranchNode, ConditionalNode, DefaultNode, EachNode, ElseNode, ExpressionNode, ForNode, IrNode,
    Provenance,
};
use directiv_parser::ast::{Block, Case, Code, CodePrefix, Each, Node, When};
use once_cell::sync::Lazy;
use regex::Regex;

static IN_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+in\s+").unwrap());
static LEADING_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\(").unwrap());
static TRAILING_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)\s*$").unwrap());

impl Compiler {
    fn visit_optional_block(&self, block: Option<&Block>) -> Result<Vec<IrNode>, CompileError> {
        match block {
            Some(block) => self.visit_nodes(&block.nodes),
            None => Ok(Vec::new()),
        }
    }

    pub(super) fn visit_code(&self, node: &Node, code: &Code) -> Result<Visited, CompileError> {
        let Some((prefix, expr)) = CodePrefix::decode(&code.val) else {
            let found: String = code.val.chars().take(3).collect();
            ProtocolViolation::raise(format!("unknown statement prefix `{}`", found), node);
        };

        let children = self.visit_optional_block(code.block.as_ref())?;
        let conditional = |children| ConditionalNode {
            expression: expr.to_string(),
            children,
            provenance: Provenance::of(node),
        };

        let ir = match prefix {
            CodePrefix::If => IrNode::If(conditional(children)),
            CodePrefix::Unless => IrNode::Unless(conditional(children)),
            CodePrefix::ElseIf => IrNode::Elseif(conditional(children)),
            CodePrefix::Else => IrNode::Else(ElseNode {
                children,
                provenance: Provenance::of(node),
            }),
            CodePrefix::Expression => IrNode::Expression(ExpressionNode {
                expression: expr.to_string(),
                escape: code.escape,
                buffer: code.buffer,
                provenance: Provenance::of(node),
            }),
        };
        Ok(Visited::One(ir))
    }

    pub(super) fn visit_case(&self, node: &Node, case: &Case) -> Result<Visited, CompileError> {
        Ok(Visited::One(IrNode::Switch(BranchNode {
            expression: case.expr.clone(),
            children: self.visit_nodes(&case.block.nodes)?,
            buffer: true,
            provenance: Provenance::of(node),
        })))
    }

    pub(super) fn visit_when(&self, node: &Node, when: &When) -> Result<Visited, CompileError> {
        let children = self.visit_optional_block(when.block.as_ref())?;
        let provenance = Provenance::of(node);

        let ir = if when.expr == "default" {
            IrNode::Default(DefaultNode {
                children,
                buffer: true,
                provenance,
            })
        } else {
            IrNode::Case(BranchNode {
                expression: when.expr.clone(),
                children,
                buffer: true,
                provenance,
            })
        };
        Ok(Visited::One(ir))
    }

    pub(super) fn visit_each(&self, node: &Node, each: &Each) -> Result<Visited, CompileError> {
        let children = self.visit_optional_block(each.block.as_ref())?;
        let provenance = Provenance::of(node);

        let Some((binding, iterable)) = split_loop_header(&each.val) else {
            let expression = LEADING_PAREN.replace(&each.val, "");
            let expression = TRAILING_PAREN.replace(&expression, "");
            return Ok(Visited::One(IrNode::For(ForNode {
                expression: expression.into_owned(),
                children,
                buffer: true,
                provenance,
            })));
        };

        let (value, key) = match binding.split_once(',') {
            Some((value, key)) if !key.trim().is_empty() => (value, key.trim()),
            Some((value, _)) => (value, each.key.as_str()),
            None => (binding, each.key.as_str()),
        };

        Ok(Visited::One(IrNode::Each(EachNode {
            key: key.to_string(),
            value: value.trim().to_string(),
            expression: iterable.trim().to_string(),
            children,
            buffer: true,
            provenance,
        })))
    }
}

/// Split `binding in iterable` on the first standalone `in`.
fn split_loop_header(header: &str) -> Option<(&str, &str)> {
    let m = IN_SEPARATOR.find(header)?;
    Some((&header[..m.start()], &header[m.end()..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use directiv_parser::testing::*;
    use rstest::rstest;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn visit_one(node: Node) -> IrNode {
        match Compiler::new(block(vec![]), CompileOptions::default())
            .visit(Some(&node))
            .unwrap()
        {
            Visited::One(ir) => ir,
            other => panic!("expected one node, got {:?}", other),
        }
    }

    #[rstest]
    #[case(CodePrefix::If, "if")]
    #[case(CodePrefix::Unless, "unless")]
    #[case(CodePrefix::ElseIf, "elseif")]
    fn test_conditionals(#[case] prefix: CodePrefix, #[case] type_name: &str) {
        let ir = visit_one(code(prefix, "user.admin", Some(vec![text("yes")])));
        assert_eq!(ir.type_name(), type_name);
        let json = serde_json::to_value(&ir).unwrap();
        assert_eq!(json["expression"], "user.admin");
        assert_eq!(json["children"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_else_has_no_expression() {
        let ir = visit_one(code(CodePrefix::Else, "", Some(vec![text("no")])));
        let json = serde_json::to_value(&ir).unwrap();
        assert_eq!(json["type"], "else");
        assert!(json.get("expression").is_none());
    }

    #[test]
    fn test_expression_keeps_buffer_and_escape() {
        let IrNode::Expression(expr) = visit_one(code(CodePrefix::Expression, "a + b", None)) else {
            panic!("expected expression");
        };
        assert_eq!(expr.expression, "a + b");
        assert!(expr.buffer && expr.escape);
    }

    #[rstest]
    #[case("XYZfoo")]
    #[case("IF")]
    #[case("")]
    fn test_unknown_prefix_panics_with_violation(#[case] val: &str) {
        let compiler = Compiler::new(block(vec![]), CompileOptions::default());
        let node = raw_code(val);
        let payload = catch_unwind(AssertUnwindSafe(|| compiler.visit(Some(&node)))).unwrap_err();
        let violation = payload
            .downcast_ref::<ProtocolViolation>()
            .expect("payload is a ProtocolViolation");
        assert_eq!(violation.node, node);
    }

    #[test]
    fn test_case_and_when() {
        let ir = visit_one(case(
            "kind",
            vec![when("1", vec![text("one")]), when("default", vec![text("other")])],
        ));
        assert_eq!(
            serde_json::to_value(&ir).unwrap(),
            serde_json::json!({
                "type": "switch",
                "expression": "kind",
                "children": [
                    {"type": "case", "expression": "1", "buffer": true, "line": 1, "children": [
                        {"type": "text", "expression": "\"one\"", "buffer": true, "line": 1}
                    ]},
                    {"type": "default", "buffer": true, "line": 1, "children": [
                        {"type": "text", "expression": "\"other\"", "buffer": true, "line": 1}
                    ]}
                ],
                "buffer": true,
                "line": 1
            })
        );
    }

    #[rstest]
    #[case("val, i in items", "val", "i", "items")]
    #[case("item in list.items", "item", "$index", "list.items")]
    #[case("  a ,b   in   c ", "a", "b", "c")]
    #[case("index in indexes", "index", "$index", "indexes")]
    #[case("v, in items", "v", "$index", "items")]
    #[case("v,   in items", "v", "$index", "items")]
    fn test_each(
        #[case] header: &str,
        #[case] value: &str,
        #[case] key: &str,
        #[case] iterable: &str,
    ) {
        let IrNode::Each(ir) = visit_one(each(header, vec![])) else {
            panic!("expected each");
        };
        assert_eq!(
            (ir.value.as_str(), ir.key.as_str(), ir.expression.as_str()),
            (value, key, iterable)
        );
        assert!(ir.buffer);
    }

    #[rstest]
    #[case("(i=0;i<5;i++)", "i=0;i<5;i++")]
    #[case(" ( x of y ) ", " x of y ")]
    #[case(";;", ";;")]
    fn test_for(#[case] header: &str, #[case] expression: &str) {
        let IrNode::For(ir) = visit_one(each(header, vec![text("x")])) else {
            panic!("expected for");
        };
        assert_eq!(ir.expression, expression);
        assert_eq!(ir.children.len(), 1);
    }
}
