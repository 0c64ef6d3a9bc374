mod cursor;
mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

use crate::{
    lexer::{tokenize, Token, TokenKind, COMMENT_MARKER},
    stack::ensure_sufficient_stack,
};
use cursor::{LineCursor, SourceLine};
pub use error::{ParserError, ParserErrorKind};
use expression::{parse_expression_tokens, parse_parameter_list, Expression};
use statement::{Statement, StatementKind};
use tracing::debug;

/// Lines that close a block or switch which branch collects statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    End,
    Else,
    Except,
}

impl Terminator {
    fn from_tokens(tokens: &[Token]) -> Option<Self> {
        let [head, tail] = tokens else {
            return None;
        };
        if !tail.is_keyword("rest") {
            return None;
        }
        match head.text.as_str() {
            "end" if head.kind == TokenKind::Keyword => Some(Self::End),
            "else" if head.kind == TokenKind::Keyword => Some(Self::Else),
            "except" if head.kind == TokenKind::Keyword => Some(Self::Except),
            _ => None,
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Self::End => "end rest",
            Self::Else => "else rest",
            Self::Except => "except rest",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    pub fn get_statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Parses a whole program.
pub fn parse_program(source: &str) -> Result<Program, ParserError> {
    Parser::new(source).parse()
}

pub struct Parser<'src> {
    cursor: LineCursor<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: LineCursor::new(source),
        }
    }

    fn tokenize_line(line: SourceLine<'_>) -> Result<Vec<Token>, ParserError> {
        tokenize(line.text).map_err(|error| ParserError::new(error.into(), line.number))
    }

    fn malformed(line: SourceLine<'_>, expected: &'static str) -> ParserError {
        ParserError::new(ParserErrorKind::MalformedStatement { expected }, line.number)
    }

    /// The tokens between the statement head of `skip` tokens and the closing `rest`.
    fn between_head_and_rest<'t>(
        tokens: &'t [Token],
        skip: usize,
        line: SourceLine<'_>,
        expected: &'static str,
    ) -> Result<&'t [Token], ParserError> {
        match tokens.split_last() {
            Some((last, rest)) if last.is_keyword("rest") && rest.len() >= skip => {
                Ok(&rest[skip..])
            }
            _ => Err(Self::malformed(line, expected)),
        }
    }

    fn expression(tokens: &[Token], line: SourceLine<'_>) -> Result<Expression, ParserError> {
        parse_expression_tokens(tokens, line.number)
    }

    pub fn parse(&mut self) -> Result<Program, ParserError> {
        let mut statements = Vec::new();
        while let Some(line) = self.cursor.next_line() {
            let tokens = Self::tokenize_line(line)?;
            if let Some(terminator) = Terminator::from_tokens(&tokens) {
                return Err(ParserError::new(
                    ParserErrorKind::UnexpectedTerminator(terminator.text().into()),
                    line.number,
                ));
            }
            statements.push(self.parse_statement(line, &tokens)?);
        }
        debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    /// Collects statements until one of `terminators` closes the block. The terminator line is
    /// consumed here and never seen by an enclosing block.
    fn parse_block(
        &mut self,
        construct: &'static str,
        opened: u32,
        terminators: &[Terminator],
    ) -> Result<(Vec<Statement>, Terminator), ParserError> {
        ensure_sufficient_stack(|| {
            let mut body = Vec::new();
            loop {
                let Some(line) = self.cursor.next_line() else {
                    return Err(ParserError::new(
                        ParserErrorKind::UnterminatedBlock { construct, opened },
                        opened,
                    ));
                };
                let tokens = Self::tokenize_line(line)?;
                if let Some(terminator) = Terminator::from_tokens(&tokens) {
                    if terminators.contains(&terminator) {
                        return Ok((body, terminator));
                    }
                    return Err(ParserError::new(
                        ParserErrorKind::UnexpectedTerminator(terminator.text().into()),
                        line.number,
                    ));
                }
                body.push(self.parse_statement(line, &tokens)?);
            }
        })
    }

    fn parse_statement(
        &mut self,
        line: SourceLine<'src>,
        tokens: &[Token],
    ) -> Result<Statement, ParserError> {
        let kind = match tokens {
            [head, ..] if head.is_keyword("define function") => {
                self.parse_function_definition(line, tokens)?
            }
            [name, equal, ..] if name.kind == TokenKind::Identifier && equal.is_operator("=") => {
                let value = Self::between_head_and_rest(tokens, 2, line, "NAME = EXPR rest")?;
                StatementKind::Assign {
                    name: name.text.clone(),
                    value: Self::expression(value, line)?,
                }
            }
            [head, ..] if head.is_keyword("if") => self.parse_if(line, tokens)?,
            [head, ..] if head.is_keyword("for each") || head.is_keyword("parallel for each") => {
                self.parse_for_range(line, tokens)?
            }
            [head, ..] if head.is_keyword("while") => {
                let condition = Self::between_head_and_rest(tokens, 1, line, "while EXPR rest")?;
                let condition = Self::expression(condition, line)?;
                let (body, _) = self.parse_block("while", line.number, &[Terminator::End])?;
                StatementKind::While { condition, body }
            }
            [head, ..] if head.is_keyword("print") => {
                let value = Self::between_head_and_rest(tokens, 1, line, "print EXPR rest")?;
                StatementKind::Print(Self::expression(value, line)?)
            }
            // Only a comment tokenizes to nothing on a non-blank line.
            [] => StatementKind::Comment(
                line.text
                    .strip_prefix(COMMENT_MARKER)
                    .unwrap_or(line.text)
                    .trim()
                    .into(),
            ),
            [head, ..] if head.is_keyword("return") => {
                let value = Self::between_head_and_rest(tokens, 1, line, "return EXPR rest")?;
                if value.is_empty() {
                    StatementKind::Return(None)
                } else {
                    StatementKind::Return(Some(Self::expression(value, line)?))
                }
            }
            [head, ..] if head.is_keyword("try") => {
                if tokens.len() != 2 || !tokens[1].is_keyword("rest") {
                    return Err(Self::malformed(line, "try rest"));
                }
                let (body, _) = self.parse_block("try", line.number, &[Terminator::Except])?;
                let (handler, _) = self.parse_block("try", line.number, &[Terminator::End])?;
                StatementKind::TryExcept { body, handler }
            }
            [head, ..] if head.is_keyword("lambda") => {
                StatementKind::Expression(Self::expression(Self::strip_rest(tokens), line)?)
            }
            [head, ..] if head.is_keyword("break rest") => {
                if tokens.len() != 1 {
                    return Err(Self::malformed(line, "break rest"));
                }
                StatementKind::Break
            }
            [head, ..] if head.is_keyword("continue rest") => {
                if tokens.len() != 1 {
                    return Err(Self::malformed(line, "continue rest"));
                }
                StatementKind::Continue
            }
            _ => StatementKind::Expression(Self::expression(Self::strip_rest(tokens), line)?),
        };
        Ok(Statement::new(kind, line.number))
    }

    /// Bare expression statements may omit their `rest`.
    fn strip_rest(tokens: &[Token]) -> &[Token] {
        match tokens.split_last() {
            Some((last, rest)) if last.is_keyword("rest") => rest,
            _ => tokens,
        }
    }

    fn parse_function_definition(
        &mut self,
        line: SourceLine<'src>,
        tokens: &[Token],
    ) -> Result<StatementKind, ParserError> {
        const EXPECTED: &str = "define function NAME(PARAMS) rest";
        let header = Self::between_head_and_rest(tokens, 1, line, EXPECTED)?;
        let [name, open, parameters @ .., close] = header else {
            return Err(Self::malformed(line, EXPECTED));
        };
        if name.kind != TokenKind::Identifier || !open.is_delimiter('(') || !close.is_delimiter(')')
        {
            return Err(Self::malformed(line, EXPECTED));
        }
        let parameters = parse_parameter_list(parameters, line.number)?;
        let (body, _) = self.parse_block("define function", line.number, &[Terminator::End])?;
        Ok(StatementKind::FunctionDef {
            name: name.text.clone(),
            parameters,
            body: body.into(),
        })
    }

    fn parse_if(
        &mut self,
        line: SourceLine<'src>,
        tokens: &[Token],
    ) -> Result<StatementKind, ParserError> {
        let condition = Self::between_head_and_rest(tokens, 1, line, "if EXPR rest")?;
        let condition = Self::expression(condition, line)?;
        let (success, terminator) =
            self.parse_block("if", line.number, &[Terminator::Else, Terminator::End])?;
        let failure = match terminator {
            Terminator::Else => self.parse_block("if", line.number, &[Terminator::End])?.0,
            _ => Vec::new(),
        };
        Ok(StatementKind::If {
            condition,
            success,
            failure,
        })
    }

    fn parse_for_range(
        &mut self,
        line: SourceLine<'src>,
        tokens: &[Token],
    ) -> Result<StatementKind, ParserError> {
        const EXPECTED: &str = "for each NAME in INT to INT rest";
        let [head, variable, in_word, start, to_word, end, tail] = tokens else {
            return Err(Self::malformed(line, EXPECTED));
        };
        let is_word = |token: &Token, word: &str| {
            token.kind == TokenKind::Identifier && token.text == word
        };
        if variable.kind != TokenKind::Identifier
            || !is_word(in_word, "in")
            || !is_word(to_word, "to")
            || start.kind != TokenKind::Number
            || end.kind != TokenKind::Number
            || !tail.is_keyword("rest")
        {
            return Err(Self::malformed(line, EXPECTED));
        }
        let integer = |token: &Token| {
            token.text.parse::<i64>().map_err(|_| {
                ParserError::new(
                    ParserErrorKind::InvalidInteger(token.text.clone()),
                    line.number,
                )
            })
        };
        let (start, end) = (integer(start)?, integer(end)?);
        let parallel = head.is_keyword("parallel for each");
        let construct = if parallel {
            "parallel for each"
        } else {
            "for each"
        };
        let (body, _) = self.parse_block(construct, line.number, &[Terminator::End])?;
        Ok(StatementKind::ForRange {
            variable: variable.text.clone(),
            start,
            end,
            body,
            parallel,
        })
    }
}
