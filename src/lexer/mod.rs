mod error;
pub mod formatter;
mod rule;
mod token;

pub use error::{LexicalError, LexicalErrorKind};
use rule::{Rule, RULES};
use std::{ops::Range, rc::Rc};
pub use token::{Span, Token, TokenKind, COMMENT_MARKER, KEYWORDS};

/// Converts source text into tokens, stopping at the first character no rule matches.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexicalError> {
    Lexer::new(source).collect()
}

#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_breaks: Rc<[Range<usize>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let mut line_breaks = Vec::new();
        let mut cursor = 0;
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_breaks.push(cursor..offset + 1);
                cursor = offset + 1;
            }
        }
        if cursor < text.len() || line_breaks.is_empty() {
            line_breaks.push(cursor..text.len() + 1);
        }
        Self {
            line_breaks: line_breaks.into(),
        }
    }

    pub fn get_max_line(&self) -> u32 {
        self.line_breaks.len() as u32
    }

    /// The 1-based line containing the byte `offset`.
    pub fn get_line(&self, offset: usize) -> u32 {
        self.line_breaks
            .binary_search_by(|r| {
                if offset < r.start {
                    std::cmp::Ordering::Greater
                } else if offset >= r.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|v| (v + 1) as u32)
            .unwrap_or(self.get_max_line())
    }

    /// Byte range of a 1-based line without its trailing newline.
    pub fn get_line_range(&self, line: u32) -> Range<usize> {
        let index = (line.max(1) as usize - 1).min(self.line_breaks.len() - 1);
        let range = &self.line_breaks[index];
        range.start..range.end.saturating_sub(1).max(range.start)
    }
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    line: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
        }
    }

    fn advance(&mut self, length: usize) {
        let consumed = &self.source[self.offset..self.offset + length];
        self.line += consumed.bytes().filter(|b| *b == b'\n').count() as u32;
        self.offset += length;
    }

    pub fn next_token(&mut self) -> Option<Result<Token, LexicalError>> {
        loop {
            let rest = &self.source[self.offset..];
            let current = rest.chars().next()?;

            let Some((rule, length)) = RULES
                .iter()
                .find_map(|rule| rule.try_match(rest).map(|length| (*rule, length)))
            else {
                let start = self.offset;
                let line = self.line;
                let (kind, skipped) = match current {
                    '"' => (LexicalErrorKind::UnterminatedString, rest.len()),
                    c => (LexicalErrorKind::Unrecognized(c), c.len_utf8()),
                };
                self.advance(skipped);
                return Some(Err(LexicalError {
                    kind,
                    span: Span::new(start, skipped),
                    line,
                }));
            };

            // Comments run to the end of the line and are dropped like whitespace.
            if rule == Rule::Keyword && &rest[..length] == COMMENT_MARKER {
                let length = rest.find('\n').unwrap_or(rest.len());
                self.advance(length);
                continue;
            }

            let Some(kind) = rule.token_kind() else {
                self.advance(length);
                continue;
            };

            let token = Token {
                kind,
                text: rest[..length].into(),
                span: Span::new(self.offset, length),
            };
            self.advance(length);
            return Some(Ok(token));
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
