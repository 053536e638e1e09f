//! Intermediate representation
//!
//!     The compiler's output: a JSON-serializable tree consumed by the rendering runtime. Every
//!     node serializes as an object whose `type` field names the variant in snake case, followed
//!     by the variant's fields and then its provenance (`line`, `filename`), which is omitted when
//!     unknown.
//!
//!         {"type":"tag","name":"p","props":{},"children":[...],"buffer":true,"line":3}
//!
//!     Expressions are raw code strings handed through untouched. Literal text is already
//!     JSON-encoded by the compiler (`"\"hello\""`), so the runtime can treat every `expression`
//!     field the same way.

mod props;

pub use props::{AttrValue, Prop, Props};

use directiv_parser::ast::{AttributeValue, Node};
use indexmap::IndexMap;
use serde::Serialize;

/// Source position of the node an IR node was compiled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Provenance {
    pub fn of(node: &Node) -> Self {
        Self {
            line: Some(node.line),
            filename: node.filename.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IrNode {
    Tag(TagNode),
    Text(TextNode),
    Expression(ExpressionNode),
    If(ConditionalNode),
    Unless(ConditionalNode),
    Elseif(ConditionalNode),
    Else(ElseNode),
    Switch(BranchNode),
    Case(BranchNode),
    Default(DefaultNode),
    For(ForNode),
    Each(EachNode),
    Import(StatementNode),
    Export(StatementNode),
    Var(StatementNode),
    Const(StatementNode),
    Function(FunctionNode),
    Comment(CommentNode),
    JsComment(CommentNode),
    NamedBlock(NamedBlockNode),
    Yield(YieldNode),
    Filter(FilterNode),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagNode {
    pub name: String,
    pub props: Props,
    pub children: Vec<IrNode>,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    /// JSON string literal of the text.
    pub expression: String,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionNode {
    pub expression: String,
    pub escape: bool,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

/// `if`, `unless` and `elseif`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalNode {
    pub expression: String,
    pub children: Vec<IrNode>,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElseNode {
    pub children: Vec<IrNode>,
    #[serde(flatten)]
    pub provenance: Provenance,
}

/// `switch` and `case`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchNode {
    pub expression: String,
    pub children: Vec<IrNode>,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultNode {
    pub children: Vec<IrNode>,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForNode {
    /// The loop header without its surrounding parentheses.
    pub expression: String,
    pub children: Vec<IrNode>,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EachNode {
    pub key: String,
    pub value: String,
    /// The iterable.
    pub expression: String,
    pub children: Vec<IrNode>,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

/// `import`, `export`, `var` and `const`: raw statement text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementNode {
    pub expression: String,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionNode {
    /// The function signature.
    pub expression: String,
    pub children: Vec<IrNode>,
    pub buffer: bool,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    pub value: String,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedBlockNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    pub children: Vec<IrNode>,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(flatten)]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterNode {
    pub name: String,
    pub attrs: IndexMap<String, AttributeValue>,
    pub content: String,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl IrNode {
    /// The serialized `type` name.
    pub fn type_name(&self) -> &'static str {
        match self {
            IrNode::Tag(_) => "tag",
            IrNode::Text(_) => "text",
            IrNode::Expression(_) => "expression",
            IrNode::If(_) => "if",
            IrNode::Unless(_) => "unless",
            IrNode::Elseif(_) => "elseif",
            IrNode::Else(_) => "else",
            IrNode::Switch(_) => "switch",
            IrNode::Case(_) => "case",
            IrNode::Default(_) => "default",
            IrNode::For(_) => "for",
            IrNode::Each(_) => "each",
            IrNode::Import(_) => "import",
            IrNode::Export(_) => "export",
            IrNode::Var(_) => "var",
            IrNode::Const(_) => "const",
            IrNode::Function(_) => "function",
            IrNode::Comment(_) => "comment",
            IrNode::JsComment(_) => "js_comment",
            IrNode::NamedBlock(_) => "named_block",
            IrNode::Yield(_) => "yield",
            IrNode::Filter(_) => "filter",
        }
    }

    pub fn provenance(&self) -> &Provenance {
        match self {
            IrNode::Tag(n) => &n.provenance,
            IrNode::Text(n) => &n.provenance,
            IrNode::Expression(n) => &n.provenance,
            IrNode::If(n) | IrNode::Unless(n) | IrNode::Elseif(n) => &n.provenance,
            IrNode::Else(n) => &n.provenance,
            IrNode::Switch(n) | IrNode::Case(n) => &n.provenance,
            IrNode::Default(n) => &n.provenance,
            IrNode::For(n) => &n.provenance,
            IrNode::Each(n) => &n.provenance,
            IrNode::Import(n) | IrNode::Export(n) | IrNode::Var(n) | IrNode::Const(n) => {
                &n.provenance
            }
            IrNode::Function(n) => &n.provenance,
            IrNode::Comment(n) | IrNode::JsComment(n) => &n.provenance,
            IrNode::NamedBlock(n) => &n.provenance,
            IrNode::Yield(n) => &n.provenance,
            IrNode::Filter(n) => &n.provenance,
        }
    }

    pub fn provenance_mut(&mut self) -> &mut Provenance {
        match self {
            IrNode::Tag(n) => &mut n.provenance,
            IrNode::Text(n) => &mut n.provenance,
            IrNode::Expression(n) => &mut n.provenance,
            IrNode::If(n) | IrNode::Unless(n) | IrNode::Elseif(n) => &mut n.provenance,
            IrNode::Else(n) => &mut n.provenance,
            IrNode::Switch(n) | IrNode::Case(n) => &mut n.provenance,
            IrNode::Default(n) => &mut n.provenance,
            IrNode::For(n) => &mut n.provenance,
            IrNode::Each(n) => &mut n.provenance,
            IrNode::Import(n) | IrNode::Export(n) | IrNode::Var(n) | IrNode::Const(n) => {
                &mut n.provenance
            }
            IrNode::Function(n) => &mut n.provenance,
            IrNode::Comment(n) | IrNode::JsComment(n) => &mut n.provenance,
            IrNode::NamedBlock(n) => &mut n.provenance,
            IrNode::Yield(n) => &mut n.provenance,
            IrNode::Filter(n) => &mut n.provenance,
        }
    }

    /// The ordered child list, for the node kinds that have one.
    pub fn children(&self) -> Option<&[IrNode]> {
        match self {
            IrNode::Tag(n) => Some(&n.children),
            IrNode::If(n) | IrNode::Unless(n) | IrNode::Elseif(n) => Some(&n.children),
            IrNode::Else(n) => Some(&n.children),
            IrNode::Switch(n) | IrNode::Case(n) => Some(&n.children),
            IrNode::Default(n) => Some(&n.children),
            IrNode::For(n) => Some(&n.children),
            IrNode::Each(n) => Some(&n.children),
            IrNode::Function(n) => Some(&n.children),
            IrNode::NamedBlock(n) => Some(&n.children),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<IrNode>> {
        match self {
            IrNode::Tag(n) => Some(&mut n.children),
            IrNode::If(n) | IrNode::Unless(n) | IrNode::Elseif(n) => Some(&mut n.children),
            IrNode::Else(n) => Some(&mut n.children),
            IrNode::Switch(n) | IrNode::Case(n) => Some(&mut n.children),
            IrNode::Default(n) => Some(&mut n.children),
            IrNode::For(n) => Some(&mut n.children),
            IrNode::Each(n) => Some(&mut n.children),
            IrNode::Function(n) => Some(&mut n.children),
            IrNode::NamedBlock(n) => Some(&mut n.children),
            _ => None,
        }
    }

    /// Apply `f` to this node and every node below it, block-valued props included.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut IrNode)) {
        f(self);
        if let IrNode::Tag(tag) = self {
            for prop in tag.props.values_mut() {
                if let Prop::Attribute {
                    expression: AttrValue::Block(nodes),
                    ..
                } = prop
                {
                    for node in nodes.iter_mut() {
                        node.walk_mut(&mut *f);
                    }
                }
            }
        }
        if let Some(children) = self.children_mut() {
            for node in children.iter_mut() {
                node.walk_mut(&mut *f);
            }
        }
    }
}
