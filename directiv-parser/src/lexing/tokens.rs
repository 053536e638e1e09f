//! Token definitions for the directiv template language
//!
//! The base tokenization is deliberately coarse: the language is line oriented and all of its
//! structure comes from indentation, so logos only has to tell line breaks, runs of horizontal
//! whitespace and everything else apart. The line grammar works on whole line contents.
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"[^ \t\r\n]+")]
    Text,
}

/// Tokenize source code with location information.
pub fn tokenize(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_with_locations() {
        let tokens = tokenize("div\n  p hi");
        assert_eq!(
            tokens,
            vec![
                (Token::Text, 0..3),
                (Token::Newline, 3..4),
                (Token::Whitespace, 4..6),
                (Token::Text, 6..7),
                (Token::Whitespace, 7..8),
                (Token::Text, 8..10),
            ]
        );
    }

    #[test]
    fn test_crlf_is_one_newline() {
        let tokens = tokenize("a\r\nb");
        assert_eq!(tokens[1], (Token::Newline, 1..3));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }
}
