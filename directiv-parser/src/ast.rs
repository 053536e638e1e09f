//! Parse tree
//!
//!     This is the contract between a front end and the directiv compiler. A front end turns
//!     template text into a tree of [`Node`]s; the compiler only ever reads these shapes and never
//!     looks at source text again.
//!
//!     Every node carries its 1-based source line and the filename it came from, so that errors
//!     raised deep in the compiler can still point at the originating template location.
//!
//! Statement Prefix Codes
//!
//!     Control statements (`if`, `unless`, `else if`, `else`) and plain code lines all arrive as
//!     [`Code`] nodes. The kind of statement is recovered from a 3 character prefix at the start
//!     of [`Code::val`]: `IFF`, `NIF`, `ELF`, `ELS` and `EXP`. See [`CodePrefix`].

use serde::Serialize;
use std::fmt;

/// A parse tree node with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self {
            kind,
            line,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    /// The node kind name, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// The raw text of a Text node.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(&text.val),
            _ => None,
        }
    }

    /// True for Text nodes made only of whitespace.
    pub fn is_whitespace_text(&self) -> bool {
        self.text()
            .is_some_and(|val| val.chars().all(char::is_whitespace))
    }
}

/// Every node kind a front end may produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Block(Block),
    Tag(Tag),
    Text(Text),
    Comment(Comment),
    BlockComment(BlockComment),
    Code(Code),
    Each(Each),
    Case(Case),
    When(When),
    Literal(Literal),
    Filter(Filter),
    Yield(Yield),
    Mixin(Mixin),
    MixinBlock,
    Doctype(Doctype),
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Block(_) => "Block",
            NodeKind::Tag(_) => "Tag",
            NodeKind::Text(_) => "Text",
            NodeKind::Comment(_) => "Comment",
            NodeKind::BlockComment(_) => "BlockComment",
            NodeKind::Code(_) => "Code",
            NodeKind::Each(_) => "Each",
            NodeKind::Case(_) => "Case",
            NodeKind::When(_) => "When",
            NodeKind::Literal(_) => "Literal",
            NodeKind::Filter(_) => "Filter",
            NodeKind::Yield(_) => "Yield",
            NodeKind::Mixin(_) => "Mixin",
            NodeKind::MixinBlock => "MixinBlock",
            NodeKind::Doctype(_) => "Doctype",
        }
    }
}

/// An ordered list of child nodes.
///
/// Blocks double as named regions: `block name` produces a named block that a layout can
/// override, while `@name` produces a *sub-block* used to pass named content into a tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub nodes: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_sub_block: bool,
}

impl Block {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// `&attributes(expr)` spreads, in source order.
    pub attribute_blocks: Vec<String>,
    pub block: Block,
    /// Inline code following the tag (`p= expr`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Box<Node>>,
    pub self_closing: bool,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            attribute_blocks: Vec::new(),
            block: Block::default(),
            code: None,
            self_closing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub val: AttributeValue,
    pub escaped: bool,
}

/// An attribute value: raw expression text, or the bare flag form (`input(disabled)`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Expression(String),
    Flag(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Expression(expr) => write!(f, "{}", expr),
            AttributeValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub val: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub val: String,
    pub buffer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockComment {
    pub val: String,
    pub buffer: bool,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Code {
    /// Prefix-coded statement: 3 characters of [`CodePrefix`] followed by the expression.
    pub val: String,
    pub buffer: bool,
    pub escape: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Each {
    /// Raw loop header, e.g. `item, i in items` or `(i = 0; i < 5; i++)`.
    pub val: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub expr: String,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct When {
    /// The discriminant, or the literal `default`.
    pub expr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    /// Already an expression (a JSON string literal for raw markup lines).
    pub value: String,
    pub buffer: bool,
    pub escape: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// Raw body lines as Text nodes, relative indentation preserved.
    pub block: Block,
}

impl Filter {
    pub fn attr(&self, name: &str) -> Option<&AttributeValue> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.val)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yield {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mixin {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    pub call: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctype {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<String>,
}

/// The statement kinds encoded at the start of [`Code::val`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePrefix {
    If,
    Unless,
    ElseIf,
    Else,
    Expression,
}

impl CodePrefix {
    pub const ALL: [CodePrefix; 5] = [
        CodePrefix::If,
        CodePrefix::Unless,
        CodePrefix::ElseIf,
        CodePrefix::Else,
        CodePrefix::Expression,
    ];

    pub fn code(self) -> &'static str {
        match self {
            CodePrefix::If => "IFF",
            CodePrefix::Unless => "NIF",
            CodePrefix::ElseIf => "ELF",
            CodePrefix::Else => "ELS",
            CodePrefix::Expression => "EXP",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prefix| prefix.code() == code)
    }

    /// Split a prefix-coded value into its statement kind and expression text.
    ///
    /// Returns `None` when the value is shorter than a prefix or the prefix is unknown.
    pub fn decode(val: &str) -> Option<(Self, &str)> {
        let code = val.get(..3)?;
        let prefix = Self::from_code(code)?;
        Some((prefix, &val[3..]))
    }

    pub fn encode(self, expr: &str) -> String {
        format!("{}{}", self.code(), expr)
    }
}

impl fmt::Display for CodePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_prefix() {
        for prefix in CodePrefix::ALL {
            let encoded = prefix.encode(" x > 1");
            assert_eq!(CodePrefix::decode(&encoded), Some((prefix, " x > 1")));
        }
    }

    #[test]
    fn rejects_short_and_unknown_prefixes() {
        assert_eq!(CodePrefix::decode("IF"), None);
        assert_eq!(CodePrefix::decode("XYZfoo"), None);
        assert_eq!(CodePrefix::decode(""), None);
    }

    #[test]
    fn whitespace_text_detection() {
        let blank = Node::new(NodeKind::Text(Text { val: "  \t".into() }), 1);
        let word = Node::new(NodeKind::Text(Text { val: " a ".into() }), 1);
        assert!(blank.is_whitespace_text());
        assert!(!word.is_whitespace_text());
    }
}
