use super::{
    expression::Expression,
    statement::{Statement, StatementKind},
    Program,
};

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
}

pub struct DebugFormatter;

impl ProgramFormatter for DebugFormatter {
    fn format(&self, program: &Program) -> String {
        program
            .iter()
            .map(|statement| format!("{statement:?}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders each top-level statement as one parenthesized prefix form per line, e.g.
/// `(print (+ 1 (* 2 3)))`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    pub fn format_expression(&self, expression: &Expression) -> String {
        match expression {
            Expression::IntLiteral(value) => value.to_string(),
            Expression::StringLiteral(value) => format!("\"{value}\""),
            Expression::Identifier(name) => name.to_string(),
            Expression::ListLiteral(elements) => {
                self.format_form("list", elements.iter().map(|e| self.format_expression(e)))
            }
            Expression::DictLiteral(pairs) => self.format_form(
                "dict",
                pairs.iter().map(|(key, value)| {
                    format!(
                        "({} {})",
                        self.format_expression(key),
                        self.format_expression(value)
                    )
                }),
            ),
            Expression::BinaryOp { lhs, operator, rhs } => format!(
                "({operator} {} {})",
                self.format_expression(lhs),
                self.format_expression(rhs)
            ),
            Expression::Call { name, arguments } => self.format_form(
                "call",
                std::iter::once(name.to_string())
                    .chain(arguments.iter().map(|e| self.format_expression(e))),
            ),
            Expression::Lambda { parameters, body } => format!(
                "(lambda ({}) {})",
                parameters.join(" "),
                self.format_body(body)
            ),
        }
    }

    pub fn format_statement(&self, statement: &Statement) -> String {
        match &statement.kind {
            StatementKind::FunctionDef {
                name,
                parameters,
                body,
            } => format!(
                "(define {name} ({}) {})",
                parameters.join(" "),
                self.format_body(body)
            ),
            StatementKind::Assign { name, value } => {
                format!("(assign {name} {})", self.format_expression(value))
            }
            StatementKind::If {
                condition,
                success,
                failure,
            } => format!(
                "(if {} {} {})",
                self.format_expression(condition),
                self.format_body(success),
                self.format_body(failure)
            ),
            StatementKind::ForRange {
                variable,
                start,
                end,
                body,
                parallel,
            } => format!(
                "({} {variable} {start} {end} {})",
                if *parallel { "parallel-for" } else { "for" },
                self.format_body(body)
            ),
            StatementKind::While { condition, body } => format!(
                "(while {} {})",
                self.format_expression(condition),
                self.format_body(body)
            ),
            StatementKind::Print(value) => format!("(print {})", self.format_expression(value)),
            StatementKind::Return(Some(value)) => {
                format!("(return {})", self.format_expression(value))
            }
            StatementKind::Return(None) => "(return)".into(),
            StatementKind::TryExcept { body, handler } => format!(
                "(try {} {})",
                self.format_body(body),
                self.format_body(handler)
            ),
            StatementKind::Break => "(break)".into(),
            StatementKind::Continue => "(continue)".into(),
            StatementKind::Comment(text) => format!("(comment \"{text}\")"),
            StatementKind::Expression(value) => self.format_expression(value),
        }
    }

    fn format_body(&self, body: &[Statement]) -> String {
        format!(
            "({})",
            body.iter()
                .map(|statement| self.format_statement(statement))
                .collect::<Vec<_>>()
                .join(" ")
        )
    }

    fn format_form(&self, head: &str, items: impl Iterator<Item = String>) -> String {
        let mut buffer = format!("({head}");
        for item in items {
            buffer.push(' ');
            buffer.push_str(&item);
        }
        buffer.push(')');
        buffer
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format(&self, program: &Program) -> String {
        program
            .iter()
            .map(|statement| self.format_statement(statement))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
