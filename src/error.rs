use crate::{interpreter::error::RuntimeError, lexer::LexicalError, parser::ParserError};
use thiserror::Error;

/// Any failure of a run, from whichever stage raised it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn category(&self) -> &'static str {
        match self {
            Error::Lexical(_) => "LexError",
            Error::Parser(_) => "ParseError",
            Error::Runtime(error) => error.category(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Error::Lexical(error) => error.line,
            Error::Parser(error) => error.line,
            Error::Runtime(error) => error.line,
        }
    }

    /// Errors raised before anything executed.
    pub fn is_static(&self) -> bool {
        matches!(self, Error::Lexical(_) | Error::Parser(_))
    }
}
