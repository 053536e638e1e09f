//! Attribute list scanning
//!
//!     Attribute values are raw expressions handed through to the runtime, so the scanner never
//!     interprets them. It only has to find where each attribute ends: at a comma, or at
//!     whitespace that is followed by something that looks like a new attribute name. Quotes,
//!     template strings and bracket nesting are respected throughout.
//!
//!         a(href="/", title=user.name)
//!         input(type="checkbox" checked)
//!         div(data-x != raw, class=[a, b])

use crate::ast::{Attribute, AttributeValue};

const OPERATOR_CHARS: &[char] = &[
    '+', '-', '*', '/', '%', '&', '|', '^', '?', ':', '<', '>', '=', '!', ',', '.', '~', '(', '[',
];

/// Find the index of the bracket closing the one at `open`.
///
/// `open` must point at `(`, `[` or `{`. Quoted strings are skipped, backslash escapes honored.
pub(crate) fn find_closing(input: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < open) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Scan an attribute list starting at the `(` at the beginning of `input`.
///
/// Returns the attributes and the number of bytes consumed, closing paren included.
pub fn scan_attribute_list(input: &str) -> Result<(Vec<Attribute>, usize), String> {
    if !input.starts_with('(') {
        return Err("expected `(` to open an attribute list".to_string());
    }
    let close = find_closing(input, 0).ok_or_else(|| "unterminated attribute list".to_string())?;
    let inner = &input[1..close];

    let attrs = split_items(inner)
        .into_iter()
        .map(|item| parse_item(&item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((attrs, close + 1))
}

fn split_items(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in inner.char_indices() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => push_item(&mut items, &mut current),
            c if c.is_whitespace() && depth == 0 => {
                if starts_new_attribute(current.trim(), inner[i..].trim_start()) {
                    push_item(&mut items, &mut current);
                } else if !current.is_empty() {
                    current.push(c);
                }
            }
            _ => current.push(c),
        }
    }
    push_item(&mut items, &mut current);

    items
}

fn push_item(items: &mut Vec<String>, current: &mut String) {
    let item = current.trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
    current.clear();
}

/// Whitespace separates attributes only when the text so far is a complete attribute and the
/// text after it is not the continuation of an expression.
fn starts_new_attribute(current: &str, next: &str) -> bool {
    let Some(first) = next.chars().next() else {
        return false;
    };
    if current.is_empty() || first == ',' {
        return false;
    }
    if current.ends_with(OPERATOR_CHARS) {
        return false;
    }
    !OPERATOR_CHARS.contains(&first)
}

fn parse_item(item: &str) -> Result<Attribute, String> {
    let (name, rest) = split_name(item)?;
    let rest = rest.trim_start();

    let (val, escaped) = if let Some(value) = rest.strip_prefix("!=") {
        (value.trim(), false)
    } else if let Some(value) = rest.strip_prefix('=') {
        (value.trim(), true)
    } else if rest.is_empty() {
        return Ok(Attribute {
            name,
            val: AttributeValue::Flag(true),
            escaped: true,
        });
    } else {
        return Err(format!("unexpected `{}` after attribute `{}`", rest, name));
    };

    if val.is_empty() {
        return Err(format!("attribute `{}` is missing a value", name));
    }

    Ok(Attribute {
        name,
        val: AttributeValue::Expression(val.to_string()),
        escaped,
    })
}

fn split_name(item: &str) -> Result<(String, &str), String> {
    if let Some(q) = item.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let end = item[1..]
            .find(q)
            .ok_or_else(|| format!("unterminated attribute name in `{}`", item))?;
        return Ok((item[1..end + 1].to_string(), &item[end + 2..]));
    }

    let end = item
        .char_indices()
        .find(|(i, c)| c.is_whitespace() || *c == '=' || (*c == '!' && item[i + 1..].starts_with('=')))
        .map(|(i, _)| i)
        .unwrap_or(item.len());
    if end == 0 {
        return Err(format!("missing attribute name in `{}`", item));
    }
    Ok((item[..end].to_string(), &item[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(name: &str, val: &str, escaped: bool) -> Attribute {
        Attribute {
            name: name.to_string(),
            val: AttributeValue::Expression(val.to_string()),
            escaped,
        }
    }

    fn flag(name: &str) -> Attribute {
        Attribute {
            name: name.to_string(),
            val: AttributeValue::Flag(true),
            escaped: true,
        }
    }

    #[test]
    fn test_comma_separated() {
        let (attrs, consumed) = scan_attribute_list(r#"(href="/", title=user.name) Home"#).unwrap();
        assert_eq!(attrs, vec![expr("href", "\"/\"", true), expr("title", "user.name", true)]);
        assert_eq!(consumed, 27);
    }

    #[test]
    fn test_whitespace_separated_with_flags() {
        let (attrs, _) = scan_attribute_list(r#"(type="checkbox" checked disabled)"#).unwrap();
        assert_eq!(
            attrs,
            vec![expr("type", "\"checkbox\"", true), flag("checked"), flag("disabled")]
        );
    }

    #[test]
    fn test_expressions_keep_their_spaces() {
        let (attrs, _) = scan_attribute_list("(a = x + y, b=fn(1, 2) c=cond ? 1 : 2)").unwrap();
        assert_eq!(
            attrs,
            vec![
                expr("a", "x + y", true),
                expr("b", "fn(1, 2)", true),
                expr("c", "cond ? 1 : 2", true)
            ]
        );
    }

    #[test]
    fn test_unescaped_and_quoted_values() {
        let (attrs, _) = scan_attribute_list(r#"(body!=html, 'data-x'="a, b) c")"#).unwrap();
        assert_eq!(
            attrs,
            vec![expr("body", "html", false), expr("data-x", "\"a, b) c\"", true)]
        );
    }

    #[test]
    fn test_unterminated_list() {
        assert!(scan_attribute_list("(a=1").is_err());
        assert!(scan_attribute_list("(a=)").is_err());
    }

    #[test]
    fn test_find_closing_skips_strings() {
        let input = r#"(a=")", b=[1, (2)])"#;
        assert_eq!(find_closing(input, 0), Some(input.len() - 1));
    }
}
