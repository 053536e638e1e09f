//! Attribute aggregation
//!
//!     Turns a tag's attributes into its `props` map. Attributes are taken in source order:
//!
//!         class, className   collected into one `class: {expressions: [...]}` entry
//!         style              collected into one `style: {expressions: [...]}` entry
//!         anything else      `name: {expression, escaped, args}`; a repeat replaces the value
//!                            in place
//!
//!     The aggregated entries go after the direct ones, `style` before `class`, followed by
//!     `&props` holding the `&attributes(...)` spread expressions when there are any.

use super::json_literal;
use crate::ir::{AttrValue, Prop, Props};
use directiv_parser::ast::{Attribute, AttributeValue};

/// Key of the spread attributes entry.
pub const SPREAD_PROPS: &str = "&props";

/// An attribute on its way into the props map: a source attribute, or a compiled sub-block.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PendingAttr {
    pub name: String,
    pub val: AttrValue,
    pub escaped: Option<bool>,
    pub args: Option<String>,
}

impl From<&Attribute> for PendingAttr {
    fn from(attr: &Attribute) -> Self {
        let val = match &attr.val {
            AttributeValue::Expression(expr) => AttrValue::Expr(expr.clone()),
            AttributeValue::Flag(flag) => AttrValue::Flag(*flag),
        };
        Self {
            name: attr.name.clone(),
            val,
            escaped: Some(attr.escaped),
            args: None,
        }
    }
}

/// Build the props map.
///
/// With `translation` set, a bare flag in first position names the translation path:
/// `t(home.title)` yields `path: {expression: "\"home.title\""}`.
pub(super) fn aggregate_props(
    attrs: Vec<PendingAttr>,
    attribute_blocks: &[String],
    translation: bool,
) -> Props {
    let mut props = Props::new();
    let mut classes = Vec::new();
    let mut styles = Vec::new();

    for (i, attr) in attrs.into_iter().enumerate() {
        match attr.name.as_str() {
            "class" | "className" => classes.extend(aggregated_expression(attr)),
            "style" => styles.extend(aggregated_expression(attr)),
            _ if translation && i == 0 && attr.val == AttrValue::Flag(true) => {
                props.insert(
                    "path".to_string(),
                    Prop::Attribute {
                        expression: AttrValue::Expr(json_literal(&attr.name)),
                        escaped: attr.escaped,
                        args: attr.args,
                    },
                );
            }
            _ => {
                props.insert(
                    attr.name,
                    Prop::Attribute {
                        expression: attr.val,
                        escaped: attr.escaped,
                        args: attr.args,
                    },
                );
            }
        }
    }

    if !styles.is_empty() {
        props.insert("style".to_string(), Prop::Aggregate { expressions: styles });
    }
    if !classes.is_empty() {
        props.insert("class".to_string(), Prop::Aggregate { expressions: classes });
    }
    if !attribute_blocks.is_empty() {
        props.insert(
            SPREAD_PROPS.to_string(),
            Prop::Aggregate {
                expressions: attribute_blocks.to_vec(),
            },
        );
    }

    props
}

fn aggregated_expression(attr: PendingAttr) -> Option<String> {
    match attr.val {
        AttrValue::Expr(expr) => Some(expr),
        AttrValue::Flag(flag) => Some(flag.to_string()),
        AttrValue::Block(_) => {
            tracing::warn!(name = %attr.name, "ignoring block content passed as an aggregated attribute");
            None
        }
    }
}
