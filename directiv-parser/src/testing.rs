//! Node factories for tests
//!
//!     Compiler tests build parse trees directly instead of going through source text, so that a
//!     test pins down exactly the shape it exercises. These helpers keep that terse:
//!
//!         block(vec![tag("p", vec![text("hi")])])
//!
//!     Every factory stamps line 1 and no filename; use [`at`] to move a node elsewhere.

use crate::ast::*;

fn node(kind: NodeKind) -> Node {
    Node::new(kind, 1)
}

/// Set the line and filename of a node.
pub fn at(mut node: Node, line: usize, filename: Option<&str>) -> Node {
    node.line = line;
    node.filename = filename.map(str::to_string);
    node
}

pub fn block(nodes: Vec<Node>) -> Node {
    node(NodeKind::Block(Block::new(nodes)))
}

pub fn named_block(name: &str, nodes: Vec<Node>) -> Node {
    node(NodeKind::Block(Block {
        nodes,
        name: Some(name.to_string()),
        args: None,
        is_sub_block: false,
    }))
}

pub fn sub_block(name: &str, args: Option<&str>, nodes: Vec<Node>) -> Node {
    node(NodeKind::Block(Block {
        nodes,
        name: Some(name.to_string()),
        args: args.map(str::to_string),
        is_sub_block: true,
    }))
}

pub fn tag(name: &str, nodes: Vec<Node>) -> Node {
    tag_with(name, Vec::new(), nodes)
}

pub fn tag_with(name: &str, attrs: Vec<Attribute>, nodes: Vec<Node>) -> Node {
    let mut tag = Tag::new(name);
    tag.attrs = attrs;
    tag.block = Block::new(nodes);
    node(NodeKind::Tag(tag))
}

/// An escaped attribute carrying a raw expression.
pub fn attr(name: &str, expr: &str) -> Attribute {
    Attribute {
        name: name.to_string(),
        val: AttributeValue::Expression(expr.to_string()),
        escaped: true,
    }
}

pub fn flag(name: &str) -> Attribute {
    Attribute {
        name: name.to_string(),
        val: AttributeValue::Flag(true),
        escaped: true,
    }
}

pub fn text(val: &str) -> Node {
    node(NodeKind::Text(Text {
        val: val.to_string(),
    }))
}

/// A prefix-coded statement with an optional nested block.
pub fn code(prefix: CodePrefix, expr: &str, nodes: Option<Vec<Node>>) -> Node {
    node(NodeKind::Code(Code {
        val: prefix.encode(expr),
        buffer: prefix == CodePrefix::Expression,
        escape: prefix == CodePrefix::Expression,
        block: nodes.map(Block::new),
    }))
}

/// A Code node with a raw, possibly invalid, value.
pub fn raw_code(val: &str) -> Node {
    node(NodeKind::Code(Code {
        val: val.to_string(),
        buffer: false,
        escape: false,
        block: None,
    }))
}

pub fn each(val: &str, nodes: Vec<Node>) -> Node {
    node(NodeKind::Each(Each {
        val: val.to_string(),
        key: "$index".to_string(),
        block: Some(Block::new(nodes)),
    }))
}

pub fn case(expr: &str, whens: Vec<Node>) -> Node {
    node(NodeKind::Case(Case {
        expr: expr.to_string(),
        block: Block::new(whens),
    }))
}

pub fn when(expr: &str, nodes: Vec<Node>) -> Node {
    node(NodeKind::When(When {
        expr: expr.to_string(),
        block: Some(Block::new(nodes)),
    }))
}

pub fn comment(val: &str, buffer: bool) -> Node {
    node(NodeKind::Comment(Comment {
        val: val.to_string(),
        buffer,
    }))
}

pub fn filter(name: &str, attrs: Vec<Attribute>, lines: &[&str]) -> Node {
    node(NodeKind::Filter(Filter {
        name: name.to_string(),
        attrs,
        block: Block::new(lines.iter().map(|line| text(line)).collect()),
    }))
}

pub fn yield_node(name: Option<&str>) -> Node {
    node(NodeKind::Yield(Yield {
        val: name.map(str::to_string),
        args: None,
    }))
}

pub fn mixin(name: &str) -> Node {
    node(NodeKind::Mixin(Mixin {
        name: name.to_string(),
        args: None,
        call: false,
        block: None,
    }))
}

pub fn doctype() -> Node {
    node(NodeKind::Doctype(Doctype {
        val: Some("html".to_string()),
    }))
}
