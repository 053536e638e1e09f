//! Tag line parsing
//!
//!     A tag line is a tag name (or a `.class` / `#id` shorthand for `div`) followed, in any
//!     order, by class and id shorthands, attribute lists and `&attributes(...)` spreads. After
//!     those come an optional `/` for self-closing tags and then at most one of:
//!
//!         p.              raw text block: nested lines become Text nodes
//!         p= expr         inline buffered code (`!=` for unescaped)
//!         li: a(href=x)   block expansion: the rest of the line is parsed as a child line
//!         p Hello         inline text

use super::attributes::{find_closing, scan_attribute_list};
use crate::ast::{Attribute, AttributeValue};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][\w-]*(?::[\w-]+)*").unwrap());
static SHORTHAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[.#]([\w-]+)").unwrap());

/// Attribute names that may repeat on one tag; their values are aggregated by the compiler.
const AGGREGATED: &[&str] = &["class", "className", "style"];

/// The head of a tag line, everything up to what follows the attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TagHead<'a> {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub attribute_blocks: Vec<String>,
    pub self_closing: bool,
    pub tail: TagTail<'a>,
}

/// What follows the head of a tag line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagTail<'a> {
    None,
    TextBlock,
    Code { expr: &'a str, escape: bool },
    Expansion(&'a str),
    Text(&'a str),
}

/// Errors from tag head parsing, converted to parse errors with a location by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    Syntax(String),
    Duplicate(String),
}

pub fn parse_tag_head(content: &str) -> Result<TagHead<'_>, TagError> {
    let (name, mut rest) = match TAG_NAME.find(content) {
        Some(m) => (m.as_str().to_string(), &content[m.end()..]),
        None if content.starts_with(['.', '#']) => ("div".to_string(), content),
        None => {
            return Err(TagError::Syntax(format!(
                "unexpected text `{}`",
                content
            )))
        }
    };

    let mut head = TagHead {
        name,
        attrs: Vec::new(),
        attribute_blocks: Vec::new(),
        self_closing: false,
        tail: TagTail::None,
    };

    loop {
        if let Some(caps) = SHORTHAND.captures(rest) {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let value = caps.get(1).map_or("", |m| m.as_str());
            let name = if whole.starts_with('.') { "class" } else { "id" };
            push_attr(
                &mut head.attrs,
                Attribute {
                    name: name.to_string(),
                    val: AttributeValue::Expression(json_string(value)),
                    escaped: false,
                },
            )?;
            rest = &rest[whole.len()..];
        } else if rest.starts_with('(') {
            let (attrs, consumed) = scan_attribute_list(rest).map_err(TagError::Syntax)?;
            for attr in attrs {
                push_attr(&mut head.attrs, attr)?;
            }
            rest = &rest[consumed..];
        } else if let Some(spread) = rest.strip_prefix("&attributes") {
            if !spread.starts_with('(') {
                return Err(TagError::Syntax("expected `(` after &attributes".into()));
            }
            let close = find_closing(spread, 0)
                .ok_or_else(|| TagError::Syntax("unterminated &attributes".into()))?;
            head.attribute_blocks.push(spread[1..close].trim().to_string());
            rest = &spread[close + 1..];
        } else {
            break;
        }
    }

    if let Some(after) = rest.strip_prefix('/') {
        head.self_closing = true;
        rest = after;
    }

    head.tail = if rest.is_empty() {
        TagTail::None
    } else if rest == "." {
        TagTail::TextBlock
    } else if let Some(expr) = rest.strip_prefix("!=") {
        TagTail::Code {
            expr: expr.trim(),
            escape: false,
        }
    } else if let Some(expr) = rest.strip_prefix('=') {
        TagTail::Code {
            expr: expr.trim(),
            escape: true,
        }
    } else if let Some(child) = rest.strip_prefix(':') {
        if !child.starts_with(char::is_whitespace) {
            return Err(TagError::Syntax(format!("unexpected `:{}`", child)));
        }
        TagTail::Expansion(child.trim())
    } else if let Some(text) = rest.strip_prefix(' ') {
        TagTail::Text(text)
    } else {
        return Err(TagError::Syntax(format!(
            "unexpected `{}` after tag `{}`",
            rest, head.name
        )));
    };

    Ok(head)
}

fn push_attr(attrs: &mut Vec<Attribute>, attr: Attribute) -> Result<(), TagError> {
    if !AGGREGATED.contains(&attr.name.as_str()) && attrs.iter().any(|a| a.name == attr.name) {
        return Err(TagError::Duplicate(attr.name));
    }
    attrs.push(attr);
    Ok(())
}

pub(crate) fn json_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
