//! Line grammar
//!
//!     Every non-blank line is classified on its own, before looking at anything nested under
//!     it. Patterns are tried in declaration order; the first match wins and anything left over
//!     is parsed as a tag line.
//!
//!     Keywords must be followed by whitespace or the end of the line, so `iframe` and `blockquote`
//!     stay tags.

use once_cell::sync::Lazy;
use regex::Regex;

static CONDITIONAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(if|unless|else\s+if|else)(?:\s+(.*)|\s*)$").unwrap());
static EACH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:-\s*)?(?:each|for|repeat)\s+(.+)$").unwrap());
static CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^case\s+(.+)$").unwrap());
static WHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^when\s+(.+)$").unwrap());
static BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^block(?:\s+([^\s(]+)\s*(?:\((.*)\))?)?\s*$").unwrap());
static SUB_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([\w$-]+)\s*(?:\((.*)\))?\s*$").unwrap());
static YIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^yield(?:\s+([^\s(]+))?\s*(?:\((.*)\))?\s*$").unwrap());
static MIXIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(mixin\s+|\+)([\w-]+)\s*(?:\((.*)\))?\s*$").unwrap());
static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:doctype|!!!)(?:\s+(.*))?$").unwrap());
static FILTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:([\w-]+)(.*)$").unwrap());

/// What a single line is, before its nested lines are looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Comment { val: &'a str, buffer: bool },
    Text(&'a str),
    Literal(&'a str),
    Code { expr: &'a str, buffer: bool, escape: bool },
    Conditional { keyword: Conditional, expr: &'a str },
    Each(&'a str),
    Case(&'a str),
    When(&'a str),
    Default,
    Block { name: Option<&'a str>, args: Option<&'a str> },
    SubBlock { name: &'a str, args: Option<&'a str> },
    Yield { name: Option<&'a str>, args: Option<&'a str> },
    Mixin { name: &'a str, args: Option<&'a str>, call: bool },
    Doctype(Option<&'a str>),
    Filter { name: &'a str, rest: &'a str },
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conditional {
    If,
    Unless,
    ElseIf,
    Else,
}

/// Classify the content of a non-blank line.
pub fn classify(content: &str) -> LineKind<'_> {
    if let Some(rest) = content.strip_prefix("//") {
        return match rest.strip_prefix('-') {
            Some(val) => LineKind::Comment { val, buffer: false },
            None => LineKind::Comment {
                val: rest,
                buffer: true,
            },
        };
    }
    if let Some(rest) = content.strip_prefix('|') {
        return LineKind::Text(rest.strip_prefix(' ').unwrap_or(rest));
    }
    if content.starts_with('<') {
        return LineKind::Literal(content);
    }
    if let Some(expr) = content.strip_prefix("!=") {
        return LineKind::Code {
            expr: expr.trim(),
            buffer: true,
            escape: false,
        };
    }
    if let Some(expr) = content.strip_prefix('=') {
        return LineKind::Code {
            expr: expr.trim(),
            buffer: true,
            escape: true,
        };
    }
    if let Some(caps) = EACH.captures(content) {
        return LineKind::Each(caps.get(1).map_or("", |m| m.as_str().trim()));
    }
    if let Some(expr) = content.strip_prefix('-') {
        return LineKind::Code {
            expr: expr.trim(),
            buffer: false,
            escape: false,
        };
    }
    if let Some(caps) = CONDITIONAL.captures(content) {
        let keyword = match caps.get(1).map_or("", |m| m.as_str()) {
            "if" => Conditional::If,
            "unless" => Conditional::Unless,
            "else" => Conditional::Else,
            _ => Conditional::ElseIf,
        };
        let expr = caps.get(2).map_or("", |m| m.as_str().trim());
        return LineKind::Conditional { keyword, expr };
    }
    if let Some(caps) = CASE.captures(content) {
        return LineKind::Case(caps.get(1).map_or("", |m| m.as_str().trim()));
    }
    if content == "default" {
        return LineKind::Default;
    }
    if let Some(caps) = WHEN.captures(content) {
        return LineKind::When(caps.get(1).map_or("", |m| m.as_str().trim()));
    }
    if let Some(caps) = BLOCK.captures(content) {
        return LineKind::Block {
            name: caps.get(1).map(|m| m.as_str()),
            args: caps.get(2).map(|m| m.as_str()),
        };
    }
    if let Some(caps) = SUB_BLOCK.captures(content) {
        return LineKind::SubBlock {
            name: caps.get(1).map_or("", |m| m.as_str()),
            args: caps.get(2).map(|m| m.as_str()),
        };
    }
    if let Some(caps) = YIELD.captures(content) {
        return LineKind::Yield {
            name: caps.get(1).map(|m| m.as_str()),
            args: caps.get(2).map(|m| m.as_str()),
        };
    }
    if let Some(caps) = MIXIN.captures(content) {
        return LineKind::Mixin {
            name: caps.get(2).map_or("", |m| m.as_str()),
            args: caps.get(3).map(|m| m.as_str()),
            call: caps.get(1).is_some_and(|m| m.as_str() == "+"),
        };
    }
    if let Some(caps) = DOCTYPE.captures(content) {
        return LineKind::Doctype(caps.get(1).map(|m| m.as_str().trim()));
    }
    if let Some(caps) = FILTER.captures(content) {
        return LineKind::Filter {
            name: caps.get(1).map_or("", |m| m.as_str()),
            rest: caps.get(2).map_or("", |m| m.as_str()),
        };
    }
    LineKind::Tag
}
