mod operator;
mod tree;

use super::{
    error::{ParserError, ParserErrorKind},
    statement::{Statement, StatementKind},
};
use crate::{
    lexer::{tokenize, Token, TokenKind},
    stack::ensure_sufficient_stack,
};
use compact_str::CompactString;
pub use operator::BinaryOperator;
use std::rc::Rc;
pub use tree::Expression;

const OPENERS: &str = "([{";
const CLOSERS: &str = ")]}";

/// Parses a single expression from source text.
pub fn parse_expression(text: &str) -> Result<Expression, ParserError> {
    let tokens = tokenize(text).map_err(|error| ParserError::new(error.into(), 1))?;
    parse_expression_tokens(&tokens, 1)
}

pub(crate) fn parse_expression_tokens(
    tokens: &[Token],
    line: u32,
) -> Result<Expression, ParserError> {
    let parser = ExpressionParser { line };
    parser.check_balanced(tokens)?;
    parser.parse(tokens)
}

fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn opens(token: &Token) -> bool {
    token.kind == TokenKind::Delimiter && OPENERS.contains(token.text.as_str())
}

fn closes(token: &Token) -> bool {
    token.kind == TokenKind::Delimiter && CLOSERS.contains(token.text.as_str())
}

/// Index of the delimiter closing the one opened at `open`.
fn find_closing(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if opens(token) {
            depth += 1;
        } else if closes(token) {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Splits at `separator` delimiters outside any nesting. An empty slice yields no pieces.
fn split_top_level(tokens: &[Token], separator: char) -> Vec<&[Token]> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        if opens(token) {
            depth += 1;
        } else if closes(token) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_delimiter(separator) {
            pieces.push(&tokens[start..index]);
            start = index + 1;
        }
    }
    pieces.push(&tokens[start..]);
    pieces
}

fn find_top_level(tokens: &[Token], separator: char) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        if opens(token) {
            depth += 1;
        } else if closes(token) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_delimiter(separator) {
            return Some(index);
        }
    }
    None
}

struct ExpressionParser {
    line: u32,
}

impl ExpressionParser {
    fn error(&self, kind: ParserErrorKind) -> ParserError {
        ParserError::new(kind, self.line)
    }

    fn check_balanced(&self, tokens: &[Token]) -> Result<(), ParserError> {
        let mut open = Vec::new();
        for token in tokens {
            if opens(token) {
                open.push(token.text.as_str());
            } else if closes(token) {
                let expected = match open.pop() {
                    Some("(") => ")",
                    Some("[") => "]",
                    Some(_) => "}",
                    None => {
                        return Err(self.error(ParserErrorKind::UnbalancedDelimiters(render(
                            tokens,
                        ))))
                    }
                };
                if token.text != expected {
                    return Err(self.error(ParserErrorKind::UnbalancedDelimiters(render(tokens))));
                }
            }
        }
        if open.is_empty() {
            Ok(())
        } else {
            Err(self.error(ParserErrorKind::UnbalancedDelimiters(render(tokens))))
        }
    }

    fn parse(&self, tokens: &[Token]) -> Result<Expression, ParserError> {
        ensure_sufficient_stack(|| self.parse_inner(tokens))
    }

    fn parse_inner(&self, tokens: &[Token]) -> Result<Expression, ParserError> {
        let Some(first) = tokens.first() else {
            return Err(self.error(ParserErrorKind::EmptyExpression));
        };
        let last = tokens.len() - 1;

        if let [token] = tokens {
            return match token.kind {
                TokenKind::Number => token
                    .text
                    .parse::<i64>()
                    .map(Expression::IntLiteral)
                    .map_err(|_| self.error(ParserErrorKind::InvalidInteger(token.text.clone()))),
                TokenKind::String => Ok(Expression::StringLiteral(
                    token.string_contents().unwrap_or_default().into(),
                )),
                TokenKind::Identifier => Ok(Expression::Identifier(token.text.clone())),
                _ => Err(self.error(ParserErrorKind::InvalidExpression(render(tokens)))),
            };
        }

        if first.is_keyword("lambda") {
            return self.parse_lambda(&tokens[1..]);
        }

        if first.kind == TokenKind::Identifier
            && tokens[1].is_delimiter('(')
            && find_closing(tokens, 1) == Some(last)
        {
            let arguments = self.parse_sequence(&tokens[2..last])?;
            return Ok(Expression::Call {
                name: first.text.clone(),
                arguments,
            });
        }

        if first.is_delimiter('[') && find_closing(tokens, 0) == Some(last) {
            return Ok(Expression::ListLiteral(
                self.parse_sequence(&tokens[1..last])?,
            ));
        }

        if first.is_delimiter('{') && find_closing(tokens, 0) == Some(last) {
            return self.parse_dict(&tokens[1..last]);
        }

        if first.is_delimiter('(') && find_closing(tokens, 0) == Some(last) {
            return self.parse(&tokens[1..last]);
        }

        self.parse_binary(tokens)
    }

    fn parse_sequence(&self, tokens: &[Token]) -> Result<Vec<Expression>, ParserError> {
        split_top_level(tokens, ',')
            .into_iter()
            .map(|piece| self.parse(piece))
            .collect()
    }

    fn parse_dict(&self, tokens: &[Token]) -> Result<Expression, ParserError> {
        let mut pairs = Vec::new();
        for piece in split_top_level(tokens, ',') {
            let Some(colon) = find_top_level(piece, ':') else {
                return Err(self.error(ParserErrorKind::InvalidExpression(render(piece))));
            };
            let key = self.parse(&piece[..colon])?;
            let value = self.parse(&piece[colon + 1..])?;
            pairs.push((key, value));
        }
        Ok(Expression::DictLiteral(pairs))
    }

    /// `lambda(p1, p2): body` with the keyword already consumed.
    fn parse_lambda(&self, tokens: &[Token]) -> Result<Expression, ParserError> {
        let malformed = || {
            self.error(ParserErrorKind::MalformedStatement {
                expected: "lambda(PARAMS): EXPR",
            })
        };
        if !tokens.first().is_some_and(|token| token.is_delimiter('(')) {
            return Err(malformed());
        }
        let close = find_closing(tokens, 0).ok_or_else(malformed)?;
        if !tokens.get(close + 1).is_some_and(|token| token.is_delimiter(':')) {
            return Err(malformed());
        }
        let parameters = self.parse_parameters(&tokens[1..close])?;
        let body = self.parse(&tokens[close + 2..])?;
        Ok(Expression::Lambda {
            parameters,
            body: Rc::from([Statement::new(StatementKind::Return(Some(body)), self.line)]),
        })
    }

    fn parse_parameters(&self, tokens: &[Token]) -> Result<Rc<[CompactString]>, ParserError> {
        split_top_level(tokens, ',')
            .into_iter()
            .map(|piece| match piece {
                [name] if name.kind == TokenKind::Identifier => Ok(name.text.clone()),
                _ => Err(self.error(ParserErrorKind::MalformedStatement {
                    expected: "a comma separated list of parameter names",
                })),
            })
            .collect()
    }

    /// Splits at the rightmost top-level operator of the loosest binding power, which keeps
    /// every level left-associative.
    fn parse_binary(&self, tokens: &[Token]) -> Result<Expression, ParserError> {
        let mut depth = 0usize;
        let mut split: Option<(usize, u8)> = None;
        for (index, token) in tokens.iter().enumerate() {
            if opens(token) {
                depth += 1;
            } else if closes(token) {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && token.kind == TokenKind::Operator {
                let power = BinaryOperator::from_symbol(&token.text).get_binding_power();
                if split.map_or(true, |(_, best)| power <= best) {
                    split = Some((index, power));
                }
            }
        }

        let Some((index, _)) = split else {
            return Err(self.error(ParserErrorKind::InvalidExpression(render(tokens))));
        };
        let symbol = &tokens[index].text;
        let (lhs, rhs) = (&tokens[..index], &tokens[index + 1..]);
        if lhs.is_empty() || rhs.is_empty() {
            return Err(self.error(ParserErrorKind::MissingOperand(symbol.clone())));
        }
        Ok(Expression::binary(
            self.parse(lhs)?,
            BinaryOperator::from_symbol(symbol),
            self.parse(rhs)?,
        ))
    }
}

/// Parameter list of a function header, between its parentheses.
pub(crate) fn parse_parameter_list(
    tokens: &[Token],
    line: u32,
) -> Result<Rc<[CompactString]>, ParserError> {
    ExpressionParser { line }.parse_parameters(tokens)
}
