//! IR to pseudo-source
//!
//!     Renders compiled nodes back into template source, as a string *expression* for the
//!     runtime rather than a string: every piece of text is a string literal and every dynamic
//!     value is wrapped in `JSON.stringify(...)`, joined with `+`. Evaluating the expression
//!     yields source text in which the runtime values are baked in.
//!
//!     Each node starts with an indentation literal of two spaces per level and nodes are
//!     separated by a newline literal:
//!
//!         tag          "  " + "name(" + <props> + ")\n" + <children one level deeper>
//!         expression   "  " + "= " + JSON.stringify(<expr>)
//!         import       "  " + "import " + "<statement>"      (export and var alike)
//!         text         "  " + "| " + <text literal>
//!
//!     Props render as `"key=" + JSON.stringify(<expr>)` separated by spaces. Node kinds not
//!     listed above, block-valued props and empty pieces are left out.

use super::super::json_literal;
use crate::ir::{AttrValue, IrNode, Prop, Props};

const NEWLINE: &str = r#" + "\n" + "#;
const SPACE: &str = r#" + " " + "#;

/// Render `children` at indentation level `depth`.
pub fn format_children(children: &[IrNode], depth: usize) -> String {
    children
        .iter()
        .filter_map(|child| format_node(child, depth))
        .collect::<Vec<_>>()
        .join(NEWLINE)
}

fn format_node(node: &IrNode, depth: usize) -> Option<String> {
    let body = match node {
        IrNode::Tag(tag) => {
            let mut parts = vec![json_literal(&format!("{}(", tag.name))];
            parts.push(format_props(&tag.props));
            parts.push(json_literal(")\n"));
            parts.push(format_children(&tag.children, depth + 1));
            parts.retain(|part| !part.is_empty());
            parts.join(" + ")
        }
        IrNode::Expression(expr) => format!("\"= \" + JSON.stringify({})", expr.expression),
        IrNode::Import(statement) => statement_line("import", &statement.expression),
        IrNode::Export(statement) => statement_line("export", &statement.expression),
        IrNode::Var(statement) => statement_line("var", &statement.expression),
        IrNode::Text(text) => format!("\"| \" + {}", text.expression),
        _ => return None,
    };
    Some(format!("{} + {}", json_literal(&"  ".repeat(depth)), body))
}

fn statement_line(keyword: &str, expression: &str) -> String {
    format!(
        "{} + {}",
        json_literal(&format!("{} ", keyword)),
        json_literal(expression)
    )
}

fn format_props(props: &Props) -> String {
    props
        .iter()
        .filter_map(|(key, prop)| {
            let expression = match prop {
                Prop::Attribute {
                    expression: AttrValue::Expr(expr),
                    ..
                } => expr.clone(),
                Prop::Attribute {
                    expression: AttrValue::Flag(flag),
                    ..
                } => flag.to_string(),
                Prop::Attribute {
                    expression: AttrValue::Block(_),
                    ..
                } => return None,
                Prop::Aggregate { expressions } => expressions.join(SPACE),
                Prop::Key { expression, .. } => expression.clone(),
            };
            Some(format!(
                "{} + JSON.stringify({})",
                json_literal(&format!("{}=", key)),
                expression
            ))
        })
        .collect::<Vec<_>>()
        .join(SPACE)
}
