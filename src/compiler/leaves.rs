//! Leaf nodes: text, literals, comments and yields.

use super::{json_literal, Compiler, Visited};
use crate::ir::{CommentNode, ExpressionNode, IrNode, Provenance, TextNode, YieldNode};
use directiv_parser::ast::{BlockComment, Comment, Literal, Node, Text, Yield};

impl Compiler {
    pub(super) fn visit_text(&self, node: &Node, text: &Text) -> Visited {
        if text.val.is_empty() {
            return Visited::Skip;
        }
        Visited::One(IrNode::Text(TextNode {
            expression: json_literal(&text.val),
            buffer: true,
            provenance: Provenance::of(node),
        }))
    }

    pub(super) fn visit_literal(&self, node: &Node, literal: &Literal) -> Visited {
        Visited::One(IrNode::Expression(ExpressionNode {
            expression: literal.value.clone(),
            escape: literal.escape,
            buffer: literal.buffer,
            provenance: Provenance::of(node),
        }))
    }

    pub(super) fn visit_comment(&self, node: &Node, comment: &Comment) -> Visited {
        Visited::One(comment_node(node, comment.buffer, comment.val.clone()))
    }

    pub(super) fn visit_block_comment(&self, node: &Node, comment: &BlockComment) -> Visited {
        let value = comment
            .block
            .nodes
            .iter()
            .filter_map(Node::text)
            .collect::<Vec<_>>()
            .join("\n");
        Visited::One(comment_node(node, comment.buffer, value))
    }

    pub(super) fn visit_yield(&self, node: &Node, y: &Yield) -> Visited {
        Visited::One(IrNode::Yield(YieldNode {
            name: y.val.clone(),
            args: y.args.clone(),
            provenance: Provenance::of(node),
        }))
    }
}

/// Buffered comments are rendered into the output; the others are code comments.
fn comment_node(node: &Node, buffer: bool, value: String) -> IrNode {
    let comment = CommentNode {
        value,
        provenance: Provenance::of(node),
    };
    if buffer {
        IrNode::Comment(comment)
    } else {
        IrNode::JsComment(comment)
    }
}
