use super::IrNode;
use indexmap::IndexMap;
use serde::Serialize;

/// A tag's attribute map, in insertion order.
pub type Props = IndexMap<String, Prop>;

/// One entry of a tag's attribute map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prop {
    Attribute {
        expression: AttrValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        escaped: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        args: Option<String>,
    },
    /// `class`, `style` and `&props`: every contributing expression, in source order.
    Aggregate { expressions: Vec<String> },
    /// Translation lookup key of a compiled sub-block.
    Key { name: String, expression: String },
}

impl Prop {
    pub fn expression(value: impl Into<AttrValue>, escaped: bool) -> Self {
        Prop::Attribute {
            expression: value.into(),
            escaped: Some(escaped),
            args: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Expr(String),
    Flag(bool),
    /// Compiled content of a named sub-block passed as an attribute.
    Block(Vec<IrNode>),
}

impl From<String> for AttrValue {
    fn from(expr: String) -> Self {
        AttrValue::Expr(expr)
    }
}

impl From<&str> for AttrValue {
    fn from(expr: &str) -> Self {
        AttrValue::Expr(expr.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(flag: bool) -> Self {
        AttrValue::Flag(flag)
    }
}
