use super::expression::Expression;
use compact_str::CompactString;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Line of the statement head.
    pub line: u32,
}

impl Statement {
    pub fn new(kind: StatementKind, line: u32) -> Self {
        Self { kind, line }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    FunctionDef {
        name: CompactString,
        parameters: Rc<[CompactString]>,
        body: Rc<[Statement]>,
    },
    Assign {
        name: CompactString,
        value: Expression,
    },
    If {
        condition: Expression,
        success: Vec<Statement>,
        failure: Vec<Statement>,
    },
    /// Inclusive range loop. `parallel` records the `parallel for each` spelling; it runs
    /// sequentially all the same.
    ForRange {
        variable: CompactString,
        start: i64,
        end: i64,
        body: Vec<Statement>,
        parallel: bool,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Print(Expression),
    Return(Option<Expression>),
    TryExcept {
        body: Vec<Statement>,
        handler: Vec<Statement>,
    },
    Break,
    Continue,
    Comment(CompactString),
    Expression(Expression),
}
