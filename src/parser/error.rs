use crate::lexer::LexicalError;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Encountered a lexer error: {}.", .0.kind)]
    LexicalError(#[from] LexicalError),
    #[error("Malformed statement, expected `{expected}`.")]
    MalformedStatement { expected: &'static str },
    #[error("Unterminated `{construct}` block opened on line {opened}.")]
    UnterminatedBlock {
        construct: &'static str,
        opened: u32,
    },
    #[error("Unexpected `{0}` outside of a matching block.")]
    UnexpectedTerminator(CompactString),
    #[error("Expected an expression.")]
    EmptyExpression,
    #[error("Missing operand for operator `{0}`.")]
    MissingOperand(CompactString),
    #[error("Invalid expression `{0}`.")]
    InvalidExpression(String),
    #[error("Unbalanced delimiters in `{0}`.")]
    UnbalancedDelimiters(String),
    #[error("Invalid integer literal `{0}`.")]
    InvalidInteger(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {line}] {kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub line: u32,
}

impl ParserError {
    pub fn new(kind: ParserErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}
