//! Translations
//!
//!     The translation tag (`t` by default) holds one named sub-block per translatable
//!     fragment. Each fragment is compiled on its own and passed as a block-valued attribute
//!     under its name; a fragment made of a single tag also gets a `key` prop naming it. A bare
//!     flag in first position is the translation path:
//!
//!         t(home.greeting)                 tag t {
//!           @name                             path:  "\"home.greeting\"",
//!             b= user.name           →        name:  [b { key: {name, "\"name\""} }],
//!                                           }
//!
//!     The translation tag itself has no children.

use super::attributes::{aggregate_props, PendingAttr};
use super::tags::tag_children;
use super::{json_literal, Compiler, Visited};
use crate::error::CompileError;
use crate::ir::{AttrValue, IrNode, Prop, Provenance, TagNode};
use directiv_parser::ast::{Node, NodeKind, Tag};

impl Compiler {
    pub(super) fn visit_translation(&self, node: &Node, tag: &Tag) -> Result<Visited, CompileError> {
        let mut attrs: Vec<PendingAttr> = tag.attrs.iter().map(PendingAttr::from).collect();

        for child in tag_children(tag) {
            let NodeKind::Block(block) = &child.kind else {
                return Err(CompileError::structural(node, "Invalid child for translation"));
            };
            let Some(name) = &block.name else {
                return Err(CompileError::structural(node, "Block missing name"));
            };

            let mut fragment = self.visit(Some(child))?.into_vec();
            if let [IrNode::Tag(single)] = fragment.as_mut_slice() {
                single.props.insert(
                    "key".to_string(),
                    Prop::Key {
                        name: name.clone(),
                        expression: json_literal(name),
                    },
                );
            }

            attrs.push(PendingAttr {
                name: name.clone(),
                val: AttrValue::Block(fragment),
                escaped: None,
                args: None,
            });
        }

        Ok(Visited::One(IrNode::Tag(TagNode {
            name: tag.name.clone(),
            props: aggregate_props(attrs, &tag.attribute_blocks, true),
            children: Vec::new(),
            buffer: true,
            provenance: Provenance::of(node),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;
    use directiv_parser::ast::CodePrefix;
    use directiv_parser::testing::*;
    use serde_json::json;

    fn visit(node: Node, options: CompileOptions) -> Result<serde_json::Value, CompileError> {
        let visited = Compiler::new(block(vec![]), options).visit(Some(&node))?;
        Ok(serde_json::to_value(visited.into_vec()).unwrap())
    }

    #[test]
    fn test_fragments_become_keyed_attributes() {
        let node = tag_with(
            "t",
            vec![flag("home.greeting")],
            vec![
                sub_block(
                    "name",
                    None,
                    vec![tag("b", vec![code(CodePrefix::Expression, "user.name", None)])],
                ),
                sub_block("count", None, vec![text("many"), text("things")]),
            ],
        );
        assert_eq!(
            visit(node, CompileOptions::default()).unwrap(),
            json!([{
                "type": "tag",
                "name": "t",
                "props": {
                    "path": {"expression": "\"home.greeting\"", "escaped": true},
                    "name": {"expression": [{
                        "type": "tag",
                        "name": "b",
                        "props": {"key": {"name": "name", "expression": "\"name\""}},
                        "children": [{
                            "type": "expression",
                            "expression": "user.name",
                            "escape": true,
                            "buffer": true,
                            "line": 1
                        }],
                        "buffer": true,
                        "line": 1
                    }]},
                    "count": {"expression": [
                        {"type": "text", "expression": "\"many\"", "buffer": true, "line": 1},
                        {"type": "text", "expression": "\"things\"", "buffer": true, "line": 1}
                    ]}
                },
                "children": [],
                "buffer": true,
                "line": 1
            }])
        );
    }

    #[test]
    fn test_single_text_fragment_gets_no_key() {
        let node = tag("t", vec![sub_block("label", None, vec![text("Hi")])]);
        let out = visit(node, CompileOptions::default()).unwrap();
        assert!(out[0]["props"]["label"]["expression"][0].get("props").is_none());
    }

    #[test]
    fn test_invalid_children() {
        let err = visit(tag("t", vec![text("loose")]), CompileOptions::default()).unwrap_err();
        assert!(err.to_string().ends_with("Invalid child for translation"));

        let err = visit(tag("t", vec![block(vec![])]), CompileOptions::default()).unwrap_err();
        assert!(err.to_string().ends_with("Block missing name"));
    }

    #[test]
    fn test_custom_translation_tag() {
        let options = CompileOptions::default().with_translation_tag("i18n");
        let out = visit(tag("i18n", vec![]), options.clone()).unwrap();
        assert_eq!(out[0]["children"], json!([]));

        let err = visit(tag("i18n", vec![text("x")]), options).unwrap_err();
        assert!(matches!(err, CompileError::Structural { .. }));
        let out = visit(tag("t", vec![text("x")]), CompileOptions::default().with_translation_tag("i18n"))
            .unwrap();
        assert_eq!(out[0]["children"][0]["type"], "text");
    }
}
