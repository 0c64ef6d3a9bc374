use super::operator::BinaryOperator;
use crate::parser::statement::Statement;
use compact_str::CompactString;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntLiteral(i64),
    StringLiteral(CompactString),
    Identifier(CompactString),
    ListLiteral(Vec<Expression>),
    DictLiteral(Vec<(Expression, Expression)>),
    BinaryOp {
        lhs: Box<Expression>,
        operator: BinaryOperator,
        rhs: Box<Expression>,
    },
    Call {
        name: CompactString,
        arguments: Vec<Expression>,
    },
    /// Anonymous function. The body is a single `return` of the lambda's expression.
    Lambda {
        parameters: Rc<[CompactString]>,
        body: Rc<[Statement]>,
    },
}

impl Expression {
    pub fn binary(lhs: Expression, operator: BinaryOperator, rhs: Expression) -> Self {
        Self::BinaryOp {
            lhs: Box::new(lhs),
            operator,
            rhs: Box::new(rhs),
        }
    }
}
