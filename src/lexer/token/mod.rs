use compact_str::CompactString;
use std::fmt::Display;
use std::ops::Range;

/// Keywords in match priority order. The first entry matching at the scan position wins, so
/// multi-word keywords are only recognised when written with a single separating space.
pub const KEYWORDS: [&str; 19] = [
    "start",
    "define function",
    "rest",
    "pause",
    "Done",
    "constant",
    "return",
    "end",
    "for each",
    "parallel for each",
    "if",
    "else",
    "while",
    "print",
    "try",
    "except",
    "lambda",
    "break rest",
    "continue rest",
];

/// The keyword that opens a comment running to the end of the line.
pub const COMMENT_MARKER: &str = "start";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: usize,
    /// The length of the token in bytes.
    pub length: usize,
}

impl Span {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    String,
    Operator,
    Delimiter,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Keyword => write!(f, "KEYWORD"),
            TokenKind::Identifier => write!(f, "IDENTIFIER"),
            TokenKind::Number => write!(f, "NUMBER"),
            TokenKind::String => write!(f, "STRING"),
            TokenKind::Operator => write!(f, "OPERATOR"),
            TokenKind::Delimiter => write!(f, "DELIMITER"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
    pub span: Span,
}

impl Token {
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    pub fn is_delimiter(&self, delimiter: char) -> bool {
        self.kind == TokenKind::Delimiter && self.text.starts_with(delimiter)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == operator
    }

    /// The contents of a string literal with its quotes removed.
    pub fn string_contents(&self) -> Option<&str> {
        match self.kind {
            TokenKind::String => self.text.get(1..self.text.len() - 1),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
