use super::token::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unrecognized character `{0}`")]
    Unrecognized(char),
    #[error("Unterminated string literal")]
    UnterminatedString,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {line}] {kind}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub span: Span,
    pub line: u32,
}

impl LexicalError {
    /// The character at which no token rule matched.
    pub fn offending_char(&self) -> char {
        match self.kind {
            LexicalErrorKind::Unrecognized(c) => c,
            LexicalErrorKind::UnterminatedString => '"',
        }
    }

    /// Byte offset of the offending character.
    pub fn position(&self) -> usize {
        self.span.start
    }
}
