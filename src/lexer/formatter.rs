use super::{
    token::{Token, TokenKind},
    LexicalError, LexicalErrorKind,
};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

/// One token per line as `KIND lexeme literal`, with `null` for tokens that carry no literal.
pub struct BasicFormatter;

impl TokenFormatter for BasicFormatter {
    fn format(&self, token: &Token) -> String {
        match token.kind {
            TokenKind::Number => format!("{} {} {}", token.kind, token.text, token.text),
            TokenKind::String => format!(
                "{} {} {}",
                token.kind,
                token.text,
                token.string_contents().unwrap_or_default()
            ),
            kind => format!("{kind} {} null", token.text),
        }
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => {
                format!("[line {}] Error: Unexpected character: {c}", error.line)
            }
            LexicalErrorKind::UnterminatedString => {
                format!("[line {}] Error: Unterminated string.", error.line)
            }
        }
    }
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}
