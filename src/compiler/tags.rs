//! Tags
//!
//!     A tag compiles to a `tag` node with its props and its compiled children. Reserved names
//!     are routed elsewhere first: the translation tag and the statement tags (`import`,
//!     `export`, `var`, `const`, `function`).
//!
//!     The children are the tag's block, or its inline code (`p= expr`) when the block is
//!     empty. A named Block child (`@header`) is not a child at all: its compiled content is
//!     passed to the tag as a block-valued attribute under the block's name.
//!
//! Component Classes
//!
//!     Tags whose name starts with an upper-case letter are components. Their direct content
//!     gets a class naming the component and the slot it sits in, so that components can style
//!     what they are given:
//!
//!         Card                      Card
//!           p Body            →       p(class="Card-block") Body
//!           @footer                   @footer
//!             | Thanks                  span(class="Card-block-footer") Thanks
//!
//!     Bare text is wrapped in a `span` to have something to put the class on. Blocks, code
//!     statements and loops are transparent: their content is treated as direct content of the
//!     component. Nested tags are not descended into.

use super::attributes::{aggregate_props, PendingAttr};
use super::{json_literal, merge_children, Compiler, Visited};
use crate::error::CompileError;
use crate::ir::{AttrValue, IrNode, Provenance, TagNode};
use directiv_parser::ast::{Attribute, AttributeValue, Block, Code, Each, Node, NodeKind, Tag};
use std::borrow::Cow;

impl Compiler {
    pub(super) fn visit_tag(&self, node: &Node, tag: &Tag) -> Result<Visited, CompileError> {
        if tag.self_closing && !tag.block.nodes.iter().all(Node::is_whitespace_text) {
            return Err(CompileError::structural(
                node,
                format!("{} is self closing and should not have content.", tag.name),
            ));
        }

        if tag.name == self.options.translation_tag {
            return self.visit_translation(node, tag);
        }
        match tag.name.as_str() {
            "import" | "export" | "var" | "const" => return self.visit_statement(node, tag),
            "function" => return self.visit_function(node, tag),
            _ => {}
        }

        let mut attrs: Vec<PendingAttr> = tag.attrs.iter().map(PendingAttr::from).collect();
        let children = self.visit_children(tag, &mut attrs)?;

        Ok(Visited::One(IrNode::Tag(TagNode {
            name: tag.name.clone(),
            props: aggregate_props(attrs, &tag.attribute_blocks, false),
            children,
            buffer: true,
            provenance: Provenance::of(node),
        })))
    }

    /// Compile the children of `tag`, moving named sub-blocks into `attrs`.
    fn visit_children(
        &self,
        tag: &Tag,
        attrs: &mut Vec<PendingAttr>,
    ) -> Result<Vec<IrNode>, CompileError> {
        let mut children = Vec::new();

        for child in tag_children(tag) {
            let child = inject_component_class(&tag.name, None, child);
            let visited = self.visit(Some(child.as_ref()))?;

            match &child.kind {
                NodeKind::Block(Block {
                    name: Some(name),
                    args,
                    ..
                }) => attrs.push(PendingAttr {
                    name: name.clone(),
                    val: AttrValue::Block(visited.into_vec()),
                    escaped: None,
                    args: args.clone(),
                }),
                _ => merge_children(&mut children, visited),
            }
        }

        Ok(children)
    }
}

/// The block nodes of a tag, or its inline code when the block is empty.
pub(super) fn tag_children(tag: &Tag) -> &[Node] {
    if !tag.block.is_empty() {
        return &tag.block.nodes;
    }
    match &tag.code {
        Some(code) => std::slice::from_ref(code.as_ref()),
        None => &[],
    }
}

fn is_component(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Add the component class for `parent` to `child`, descending through transparent nodes.
///
/// Children of non-component tags, and nodes that take no class, are returned as they are.
fn inject_component_class<'a>(parent: &str, slot: Option<&str>, child: &'a Node) -> Cow<'a, Node> {
    if !is_component(parent) {
        return Cow::Borrowed(child);
    }

    let mut injected = child.clone();
    match &mut injected.kind {
        NodeKind::Block(block) => {
            let slot = block.name.clone();
            inject_into(parent, slot.as_deref(), block);
        }
        NodeKind::Code(Code {
            block: Some(block), ..
        })
        | NodeKind::Each(Each {
            block: Some(block), ..
        }) => inject_into(parent, slot, block),
        NodeKind::Tag(tag) => tag.attrs.push(component_class(parent, slot)),
        NodeKind::Text(_) => {
            let mut span = Tag::new("span");
            span.attrs.push(component_class(parent, slot));
            span.block = Block::new(vec![child.clone()]);
            let span = Node::new(NodeKind::Tag(span), child.line);
            return Cow::Owned(span.with_filename(child.filename.clone()));
        }
        _ => return Cow::Borrowed(child),
    }
    Cow::Owned(injected)
}

fn inject_into(parent: &str, slot: Option<&str>, block: &mut Block) {
    for node in block.nodes.iter_mut() {
        if let Cow::Owned(injected) = inject_component_class(parent, slot, node) {
            *node = injected;
        }
    }
}

fn component_class(parent: &str, slot: Option<&str>) -> Attribute {
    let class = match slot {
        Some(slot) => format!("{}-block-{}", parent, slot),
        None => format!("{}-block", parent),
    };
    Attribute {
        name: "class".to_string(),
        val: AttributeValue::Expression(json_literal(&class)),
        escaped: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Prop;
    use crate::options::CompileOptions;
    use directiv_parser::ast::CodePrefix;
    use directiv_parser::testing::*;
    use serde_json::json;

    fn visit_tag_node(node: Node) -> TagNode {
        match Compiler::new(block(vec![]), CompileOptions::default()).visit(Some(&node)) {
            Ok(Visited::One(IrNode::Tag(tag))) => tag,
            other => panic!("expected a tag, got {:?}", other),
        }
    }

    fn classes(tag: &TagNode) -> Vec<String> {
        match tag.props.get("class") {
            Some(Prop::Aggregate { expressions }) => expressions.clone(),
            _ => Vec::new(),
        }
    }

    fn self_closing(nodes: Vec<Node>) -> Node {
        let mut node = tag("img", nodes);
        if let NodeKind::Tag(tag) = &mut node.kind {
            tag.self_closing = true;
        }
        node
    }

    #[test]
    fn test_plain_tag() {
        let ir = visit_tag_node(tag_with("a", vec![attr("href", "url")], vec![text("Home")]));
        assert_eq!(
            serde_json::to_value(IrNode::Tag(ir)).unwrap(),
            json!({
                "type": "tag",
                "name": "a",
                "props": {"href": {"expression": "url", "escaped": true}},
                "children": [{"type": "text", "expression": "\"Home\"", "buffer": true, "line": 1}],
                "buffer": true,
                "line": 1
            })
        );
    }

    #[test]
    fn test_self_closing_allows_only_whitespace() {
        visit_tag_node(self_closing(vec![text("  "), text("")]));

        let err = Compiler::new(block(vec![]), CompileOptions::default())
            .visit(Some(&at(self_closing(vec![text("oops")]), 5, Some("p.dv"))))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "p.dv:5: img is self closing and should not have content."
        );
    }

    #[test]
    fn test_inline_code_is_the_only_child() {
        let mut node = tag("p", vec![]);
        if let NodeKind::Tag(tag) = &mut node.kind {
            tag.code = Some(Box::new(code(CodePrefix::Expression, "user.name", None)));
        }
        let ir = visit_tag_node(node);
        assert_eq!(ir.children.len(), 1);
        assert_eq!(ir.children[0].type_name(), "expression");
    }

    #[test]
    fn test_named_sub_block_becomes_attribute() {
        let ir = visit_tag_node(tag(
            "card",
            vec![
                sub_block("header", Some("title"), vec![text("Hi")]),
                text("body"),
            ],
        ));
        assert_eq!(ir.children.len(), 1);
        let Some(Prop::Attribute {
            expression: AttrValue::Block(nodes),
            escaped: None,
            args: Some(args),
        }) = ir.props.get("header")
        else {
            panic!("expected a block attribute, got {:?}", ir.props);
        };
        assert_eq!(args, "title");
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_component_classes() {
        let ir = visit_tag_node(tag(
            "Card",
            vec![
                tag_with("p", vec![attr("class", "\"lead\"")], vec![text("x")]),
                text("loose"),
                sub_block("footer", None, vec![text("Thanks"), tag("b", vec![])]),
            ],
        ));

        let IrNode::Tag(p) = &ir.children[0] else {
            panic!("expected p");
        };
        assert_eq!(classes(p), vec!["\"lead\"", "\"Card-block\""]);
        assert_eq!(p.children[0].type_name(), "text");

        let IrNode::Tag(span) = &ir.children[1] else {
            panic!("expected the text to be wrapped");
        };
        assert_eq!(span.name, "span");
        assert_eq!(classes(span), vec!["\"Card-block\""]);
        assert_eq!(span.children[0].type_name(), "text");

        let Some(Prop::Attribute {
            expression: AttrValue::Block(footer),
            ..
        }) = ir.props.get("footer")
        else {
            panic!("expected footer block");
        };
        let slot_classes: Vec<_> = footer
            .iter()
            .map(|node| match node {
                IrNode::Tag(tag) => classes(tag),
                other => panic!("expected tags, got {:?}", other),
            })
            .collect();
        assert_eq!(
            slot_classes,
            vec![vec!["\"Card-block-footer\"".to_string()]; 2]
        );
    }

    #[test]
    fn test_component_class_descends_through_statements() {
        let ir = visit_tag_node(tag(
            "List",
            vec![
                code(CodePrefix::If, "ok", Some(vec![tag("li", vec![])])),
                each("x in xs", vec![text("item")]),
            ],
        ));
        let IrNode::If(cond) = &ir.children[0] else {
            panic!("expected if");
        };
        let IrNode::Tag(li) = &cond.children[0] else {
            panic!("expected li");
        };
        assert_eq!(classes(li), vec!["\"List-block\""]);
        let IrNode::Each(each) = &ir.children[1] else {
            panic!("expected each");
        };
        assert_eq!(each.children[0].type_name(), "tag");
    }

    #[test]
    fn test_lower_case_parents_leave_children_alone() {
        let child = text("plain");
        assert!(matches!(
            inject_component_class("div", None, &child),
            Cow::Borrowed(_)
        ));
        let ir = visit_tag_node(tag("div", vec![text("plain"), tag("p", vec![])]));
        assert_eq!(ir.children[0].type_name(), "text");
        let IrNode::Tag(p) = &ir.children[1] else {
            panic!("expected p");
        };
        assert!(classes(p).is_empty());
    }

    #[test]
    fn test_nested_tags_are_not_descended() {
        let ir = visit_tag_node(tag("Card", vec![tag("div", vec![tag("p", vec![])])]));
        let IrNode::Tag(div) = &ir.children[0] else {
            panic!("expected div");
        };
        let IrNode::Tag(p) = &div.children[0] else {
            panic!("expected p");
        };
        assert_eq!(classes(div), vec!["\"Card-block\""]);
        assert!(classes(p).is_empty());
    }
}
