use super::token::{TokenKind, KEYWORDS};

const OPERATOR_CHARS: &str = "+-*/><=!";
const DELIMITER_CHARS: &str = "()[]{},:";

/// A token category the lexer tries at the current scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Keyword,
    Identifier,
    Number,
    String,
    Operator,
    Delimiter,
    Whitespace,
}

/// Rules in priority order. Keywords come before identifiers so a keyword is never read as a
/// name.
pub const RULES: [Rule; 7] = [
    Rule::Keyword,
    Rule::Identifier,
    Rule::Number,
    Rule::String,
    Rule::Operator,
    Rule::Delimiter,
    Rule::Whitespace,
];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn run_length(text: &str, accept: impl Fn(char) -> bool) -> usize {
    text.char_indices()
        .find(|(_, c)| !accept(*c))
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

impl Rule {
    /// Length in bytes of the prefix of `text` this rule matches.
    pub fn try_match(&self, text: &str) -> Option<usize> {
        let first = text.chars().next()?;
        let length = match self {
            Rule::Keyword => KEYWORDS
                .iter()
                .find(|keyword| {
                    text.starts_with(*keyword)
                        && !text[keyword.len()..].starts_with(is_word_char)
                })
                .map(|keyword| keyword.len())?,
            Rule::Identifier => {
                if !(first.is_ascii_alphabetic() || first == '_') {
                    return None;
                }
                run_length(text, |c| c.is_ascii_alphanumeric() || c == '_')
            }
            Rule::Number => run_length(text, |c| c.is_ascii_digit()),
            Rule::String => {
                if first != '"' {
                    return None;
                }
                text[1..].find('"')? + 2
            }
            Rule::Operator => run_length(text, |c| OPERATOR_CHARS.contains(c)),
            Rule::Delimiter => {
                if DELIMITER_CHARS.contains(first) {
                    first.len_utf8()
                } else {
                    0
                }
            }
            Rule::Whitespace => run_length(text, char::is_whitespace),
        };
        (length > 0).then_some(length)
    }

    /// The kind of token this rule emits, or `None` for discarded input.
    pub fn token_kind(&self) -> Option<TokenKind> {
        match self {
            Rule::Keyword => Some(TokenKind::Keyword),
            Rule::Identifier => Some(TokenKind::Identifier),
            Rule::Number => Some(TokenKind::Number),
            Rule::String => Some(TokenKind::String),
            Rule::Operator => Some(TokenKind::Operator),
            Rule::Delimiter => Some(TokenKind::Delimiter),
            Rule::Whitespace => None,
        }
    }
}
