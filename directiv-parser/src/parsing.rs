//! Parsing
//!
//!     Turns the [`SourceLine`]s produced by [lexing](crate::lexing) into a parse tree.
//!
//!     The parser is a recursive descent over indentation. Siblings share an indentation width;
//!     a line indented deeper than the line before it opens that line's block, and a dedent
//!     must land exactly on a width that is already open. Each line is classified by the
//!     [grammar](grammar) and then turned into one node, consuming its nested lines on the way.
//!
//!     Raw text bodies (filters, `tag.` blocks, block comments) are not parsed: every nested line
//!     becomes one Text node, with the common indentation stripped and deeper indentation kept.
//!
//!     The root of every parse is an unnamed Block.

pub mod attributes;
pub mod grammar;
pub mod tags;

use crate::ast::{
    Block, BlockComment, Case, Code, CodePrefix, Comment, Doctype, Each, Filter, Literal, Mixin,
    Node, NodeKind, Tag, Text, When, Yield,
};
use crate::error::{Location, ParseError};
use crate::lexing::{lex, SourceLine};
use grammar::{classify, Conditional, LineKind};
use tags::{json_string, parse_tag_head, TagError, TagTail};

/// Tags whose nested lines are statement source rather than template lines.
const STATEMENT_TAGS: &[&str] = &["import", "export", "var", "const"];

/// Parse template source into a parse tree rooted at an unnamed Block.
pub fn parse(source: &str, filename: Option<&str>) -> Result<Node, ParseError> {
    let lines = lex(source);
    let mut builder = TreeBuilder {
        lines: &lines,
        pos: 0,
        filename,
    };
    let nodes = builder.parse_children(None)?;
    tracing::trace!(lines = lines.len(), nodes = nodes.len(), "parsed template");
    Ok(builder.node(NodeKind::Block(Block::new(nodes)), 1))
}

struct TreeBuilder<'a> {
    lines: &'a [SourceLine],
    pos: usize,
    filename: Option<&'a str>,
}

impl<'a> TreeBuilder<'a> {
    fn node(&self, kind: NodeKind, line: usize) -> Node {
        Node::new(kind, line).with_filename(self.filename.map(str::to_string))
    }

    fn location(&self, line: usize) -> Location {
        Location::new(line, self.filename)
    }

    fn skip_blank_lines(&mut self) {
        while self.lines.get(self.pos).is_some_and(SourceLine::is_blank) {
            self.pos += 1;
        }
    }

    /// True when the next non-blank line is indented deeper than `indent`.
    fn has_nested(&self, indent: usize) -> bool {
        self.lines[self.pos..]
            .iter()
            .find(|line| !line.is_blank())
            .is_some_and(|line| line.indent > indent)
    }

    /// Parse the sibling lines nested under a line indented at `parent_indent`.
    ///
    /// `None` parses the whole document.
    fn parse_children(&mut self, parent_indent: Option<usize>) -> Result<Vec<Node>, ParseError> {
        let lines = self.lines;
        let mut nodes = Vec::new();
        let mut level: Option<usize> = None;

        loop {
            self.skip_blank_lines();
            let Some(line) = lines.get(self.pos) else {
                break;
            };
            if parent_indent.is_some_and(|parent| line.indent <= parent) {
                break;
            }
            match level {
                None => level = Some(line.indent),
                Some(width) if line.indent == width => {}
                Some(width) if line.indent < width => {
                    return Err(ParseError::InconsistentIndentation {
                        location: self.location(line.number),
                        found: line.indent,
                    })
                }
                Some(_) => {
                    return Err(ParseError::syntax(
                        self.location(line.number),
                        "unexpected indentation",
                    ))
                }
            }
            self.pos += 1;
            nodes.push(self.parse_line(line)?);
        }

        Ok(nodes)
    }

    /// Parse the block nested under `line`, if any.
    fn nested_block(&mut self, line: &SourceLine) -> Result<Block, ParseError> {
        Ok(Block::new(self.parse_children(Some(line.indent))?))
    }

    fn optional_block(&mut self, line: &SourceLine) -> Result<Option<Block>, ParseError> {
        if self.has_nested(line.indent) {
            Ok(Some(self.nested_block(line)?))
        } else {
            Ok(None)
        }
    }

    /// Collect every line nested under `parent_indent` verbatim, as Text nodes.
    fn raw_block(&mut self, parent_indent: usize) -> Block {
        let lines = self.lines;
        let start = self.pos;
        while lines
            .get(self.pos)
            .is_some_and(|line| line.is_blank() || line.indent > parent_indent)
        {
            self.pos += 1;
        }

        let mut body = &lines[start..self.pos];
        while body.last().is_some_and(SourceLine::is_blank) {
            body = &body[..body.len() - 1];
        }
        let base = body
            .iter()
            .filter(|line| !line.is_blank())
            .map(|line| line.indent)
            .min()
            .unwrap_or(0);

        let nodes = body
            .iter()
            .map(|line| {
                let val = if line.is_blank() {
                    String::new()
                } else {
                    line.raw[base..].to_string()
                };
                self.node(NodeKind::Text(Text { val }), line.number)
            })
            .collect();
        Block::new(nodes)
    }

    /// Reject nested lines under a line that cannot have any.
    fn no_nested(&self, line: &SourceLine, what: &str) -> Result<(), ParseError> {
        if self.has_nested(line.indent) {
            return Err(ParseError::syntax(
                self.location(line.number),
                format!("{} cannot have nested content", what),
            ));
        }
        Ok(())
    }

    fn parse_line(&mut self, line: &SourceLine) -> Result<Node, ParseError> {
        let number = line.number;
        let kind = match classify(&line.content) {
            LineKind::Comment { val, buffer } => {
                if self.has_nested(line.indent) {
                    NodeKind::BlockComment(BlockComment {
                        val: val.to_string(),
                        buffer,
                        block: self.raw_block(line.indent),
                    })
                } else {
                    NodeKind::Comment(Comment {
                        val: val.to_string(),
                        buffer,
                    })
                }
            }
            LineKind::Text(val) => {
                self.no_nested(line, "piped text")?;
                NodeKind::Text(Text {
                    val: val.to_string(),
                })
            }
            LineKind::Literal(markup) => {
                self.no_nested(line, "literal markup")?;
                NodeKind::Literal(Literal {
                    value: json_string(markup),
                    buffer: true,
                    escape: false,
                })
            }
            LineKind::Code {
                expr,
                buffer,
                escape,
            } => NodeKind::Code(Code {
                val: CodePrefix::Expression.encode(expr),
                buffer,
                escape,
                block: self.optional_block(line)?,
            }),
            LineKind::Conditional { keyword, expr } => {
                let prefix = match keyword {
                    Conditional::If => CodePrefix::If,
                    Conditional::Unless => CodePrefix::Unless,
                    Conditional::ElseIf => CodePrefix::ElseIf,
                    Conditional::Else => {
                        if !expr.is_empty() {
                            return Err(ParseError::syntax(
                                self.location(number),
                                "`else` cannot have a condition, perhaps you meant `else if`",
                            ));
                        }
                        CodePrefix::Else
                    }
                };
                NodeKind::Code(Code {
                    val: prefix.encode(expr),
                    buffer: false,
                    escape: false,
                    block: Some(self.nested_block(line)?),
                })
            }
            LineKind::Each(val) => NodeKind::Each(Each {
                val: val.to_string(),
                key: "$index".to_string(),
                block: self.optional_block(line)?,
            }),
            LineKind::Case(expr) => NodeKind::Case(Case {
                expr: expr.to_string(),
                block: self.nested_block(line)?,
            }),
            LineKind::When(expr) => NodeKind::When(When {
                expr: expr.to_string(),
                block: self.optional_block(line)?,
            }),
            LineKind::Default => NodeKind::When(When {
                expr: "default".to_string(),
                block: self.optional_block(line)?,
            }),
            LineKind::Block { name: None, .. } => {
                self.no_nested(line, "a mixin block")?;
                NodeKind::MixinBlock
            }
            LineKind::Block {
                name: Some(name),
                args,
            } => NodeKind::Block(Block {
                nodes: self.parse_children(Some(line.indent))?,
                name: Some(name.to_string()),
                args: args.map(str::to_string),
                is_sub_block: false,
            }),
            LineKind::SubBlock { name, args } => NodeKind::Block(Block {
                nodes: self.parse_children(Some(line.indent))?,
                name: Some(name.to_string()),
                args: args.map(str::to_string),
                is_sub_block: true,
            }),
            LineKind::Yield { name, args } => {
                self.no_nested(line, "yield")?;
                NodeKind::Yield(Yield {
                    val: name.map(str::to_string),
                    args: args.map(str::to_string),
                })
            }
            LineKind::Mixin { name, args, call } => NodeKind::Mixin(Mixin {
                name: name.to_string(),
                args: args.map(str::to_string),
                call,
                block: self.optional_block(line)?,
            }),
            LineKind::Doctype(val) => {
                // Nested lines are dropped; the compiler rejects doctypes either way.
                self.raw_block(line.indent);
                NodeKind::Doctype(Doctype {
                    val: val.map(str::to_string),
                })
            }
            LineKind::Filter { name, rest } => self.parse_filter(line, name, rest)?,
            LineKind::Tag => self.parse_tag(line)?,
        };

        Ok(self.node(kind, number))
    }

    fn parse_filter(
        &mut self,
        line: &SourceLine,
        name: &str,
        rest: &str,
    ) -> Result<NodeKind, ParseError> {
        let rest = rest.trim();
        let attrs = if rest.is_empty() {
            Vec::new()
        } else {
            let (attrs, consumed) = attributes::scan_attribute_list(rest)
                .map_err(|message| ParseError::syntax(self.location(line.number), message))?;
            if !rest[consumed..].trim().is_empty() {
                return Err(ParseError::syntax(
                    self.location(line.number),
                    format!("unexpected `{}` after filter `{}`", &rest[consumed..], name),
                ));
            }
            attrs
        };

        Ok(NodeKind::Filter(Filter {
            name: name.to_string(),
            attrs,
            block: self.raw_block(line.indent),
        }))
    }

    fn parse_tag(&mut self, line: &SourceLine) -> Result<NodeKind, ParseError> {
        let head = parse_tag_head(&line.content).map_err(|err| match err {
            TagError::Syntax(message) => ParseError::syntax(self.location(line.number), message),
            TagError::Duplicate(name) => ParseError::DuplicateAttribute {
                location: self.location(line.number),
                name,
            },
        })?;

        let mut tag = Tag::new(head.name);
        tag.attrs = head.attrs;
        tag.attribute_blocks = head.attribute_blocks;
        tag.self_closing = head.self_closing;

        if STATEMENT_TAGS.contains(&tag.name.as_str()) {
            match head.tail {
                TagTail::None | TagTail::TextBlock => {
                    tag.block = self.raw_block(line.indent);
                    return Ok(NodeKind::Tag(tag));
                }
                TagTail::Text(text) => {
                    let mut nodes = vec![self.node(
                        NodeKind::Text(Text {
                            val: text.to_string(),
                        }),
                        line.number,
                    )];
                    nodes.extend(self.raw_block(line.indent).nodes);
                    tag.block = Block::new(nodes);
                    return Ok(NodeKind::Tag(tag));
                }
                _ => {}
            }
        }

        match head.tail {
            TagTail::None => tag.block = self.nested_block(line)?,
            TagTail::TextBlock => tag.block = self.raw_block(line.indent),
            TagTail::Code { expr, escape } => {
                let code = Code {
                    val: CodePrefix::Expression.encode(expr),
                    buffer: true,
                    escape,
                    block: None,
                };
                tag.code = Some(Box::new(self.node(NodeKind::Code(code), line.number)));
                tag.block = self.nested_block(line)?;
            }
            TagTail::Expansion(child) => {
                let child_line = SourceLine {
                    number: line.number,
                    indent: line.indent,
                    content: child.to_string(),
                    raw: child.to_string(),
                };
                let child = self.parse_line(&child_line)?;
                tag.block = Block::new(vec![child]);
            }
            TagTail::Text(text) => {
                let mut nodes = vec![self.node(
                    NodeKind::Text(Text {
                        val: text.to_string(),
                    }),
                    line.number,
                )];
                nodes.extend(self.parse_children(Some(line.indent))?);
                tag.block = Block::new(nodes);
            }
        }

        Ok(NodeKind::Tag(tag))
    }
}
