use super::{
    environment::{FunctionTable, ScopeStack},
    error::{RuntimeError, RuntimeErrorKind},
    value::{Function, Value},
    ControlSignal, InterpreterConfig, SystemContext,
};
use crate::{
    parser::{
        expression::{BinaryOperator, Expression},
        statement::{Statement, StatementKind},
        Program,
    },
    stack::ensure_sufficient_stack,
};
use compact_str::CompactString;
use std::rc::Rc;
use tracing::{debug, trace, warn};

pub struct TreeWalkInterpreter<C> {
    scopes: ScopeStack,
    functions: FunctionTable,
    context: C,
    config: InterpreterConfig,
}

impl<C: SystemContext> TreeWalkInterpreter<C> {
    pub fn new(context: C) -> Self {
        Self::with_config(context, InterpreterConfig::default())
    }

    pub fn with_config(context: C, config: InterpreterConfig) -> Self {
        Self {
            scopes: ScopeStack::new(),
            functions: FunctionTable::default(),
            context,
            config,
        }
    }

    pub fn get_context(&self) -> &C {
        &self.context
    }

    pub fn get_global(&self, name: &str) -> Option<&Value> {
        self.scopes.global(name)
    }

    /// Runs a whole program and hands back the context holding its output. A top-level `return`
    /// stops the program early.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(mut self, program: &Program) -> Result<C, RuntimeError> {
        for statement in program.iter() {
            match self.execute_statement(statement)? {
                ControlSignal::Normal => {}
                ControlSignal::Return(value) => {
                    debug!(%value, "program returned early");
                    break;
                }
                ControlSignal::Break => {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::ControlFlowOutsideLoop("break rest"),
                        statement.line,
                    ))
                }
                ControlSignal::Continue => {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::ControlFlowOutsideLoop("continue rest"),
                        statement.line,
                    ))
                }
            }
        }
        Ok(self.context)
    }

    /// Runs statements in order against the innermost frame, stopping at the first signal other
    /// than `Normal`.
    pub fn execute(&mut self, statements: &[Statement]) -> Result<ControlSignal, RuntimeError> {
        ensure_sufficient_stack(|| {
            for statement in statements {
                match self.execute_statement(statement)? {
                    ControlSignal::Normal => {}
                    signal => return Ok(signal),
                }
            }
            Ok(ControlSignal::Normal)
        })
    }

    fn execute_statement(&mut self, statement: &Statement) -> Result<ControlSignal, RuntimeError> {
        let line = statement.line;
        match &statement.kind {
            StatementKind::FunctionDef {
                name,
                parameters,
                body,
            } => {
                let function = Rc::new(Function {
                    name: Some(name.clone()),
                    parameters: parameters.clone(),
                    body: body.clone(),
                });
                let replaced = self.functions.define(name.clone(), function);
                debug!(%name, arity = parameters.len(), replaced, "registered function");
                Ok(ControlSignal::Normal)
            }
            StatementKind::Assign { name, value } => {
                let value = self.evaluate(value, line)?;
                self.scopes.assign(name.clone(), value);
                Ok(ControlSignal::Normal)
            }
            StatementKind::If {
                condition,
                success,
                failure,
            } => {
                if self.evaluate(condition, line)?.is_truthy() {
                    self.execute(success)
                } else {
                    self.execute(failure)
                }
            }
            StatementKind::ForRange {
                variable,
                start,
                end,
                body,
                parallel,
            } => {
                if *parallel {
                    warn!(line, "`parallel for each` is not supported, iterating sequentially");
                }
                for step in *start..=*end {
                    self.scopes.assign(variable.clone(), Value::Int(step));
                    match self.execute(body)? {
                        ControlSignal::Normal | ControlSignal::Continue => {}
                        ControlSignal::Break => break,
                        signal @ ControlSignal::Return(_) => return Ok(signal),
                    }
                }
                Ok(ControlSignal::Normal)
            }
            StatementKind::While { condition, body } => {
                while self.evaluate(condition, line)?.is_truthy() {
                    match self.execute(body)? {
                        ControlSignal::Normal | ControlSignal::Continue => {}
                        ControlSignal::Break => break,
                        signal @ ControlSignal::Return(_) => return Ok(signal),
                    }
                }
                Ok(ControlSignal::Normal)
            }
            StatementKind::Print(value) => {
                let value = self.evaluate(value, line)?;
                self.context.writeln(&value.to_string());
                Ok(ControlSignal::Normal)
            }
            StatementKind::Return(value) => {
                let value = match value {
                    Some(value) => self.evaluate(value, line)?,
                    None => Value::Null,
                };
                Ok(ControlSignal::Return(value))
            }
            StatementKind::TryExcept { body, handler } => match self.execute(body) {
                Err(error) if error.is_recoverable() => {
                    debug!(%error, "caught runtime error");
                    self.execute(handler)
                }
                result => result,
            },
            StatementKind::Break => Ok(ControlSignal::Break),
            StatementKind::Continue => Ok(ControlSignal::Continue),
            StatementKind::Comment(_) => Ok(ControlSignal::Normal),
            StatementKind::Expression(value) => {
                self.evaluate(value, line)?;
                Ok(ControlSignal::Normal)
            }
        }
    }

    pub fn evaluate(&mut self, expression: &Expression, line: u32) -> Result<Value, RuntimeError> {
        ensure_sufficient_stack(|| self.evaluate_inner(expression, line))
    }

    fn evaluate_inner(&mut self, expression: &Expression, line: u32) -> Result<Value, RuntimeError> {
        let value = match expression {
            Expression::IntLiteral(value) => Value::Int(*value),
            Expression::StringLiteral(value) => Value::Str(value.clone()),
            Expression::Identifier(name) => self.read_variable(name).ok_or_else(|| {
                RuntimeError::new(RuntimeErrorKind::UndefinedName(name.clone()), line)
            })?,
            Expression::ListLiteral(elements) => Value::List(
                elements
                    .iter()
                    .map(|element| self.evaluate(element, line))
                    .collect::<Result<_, _>>()?,
            ),
            Expression::DictLiteral(pairs) => {
                let mut entries: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
                for (key, value) in pairs {
                    let key = self.evaluate(key, line)?;
                    let value = self.evaluate(value, line)?;
                    match entries.iter_mut().find(|(existing, _)| existing.is_equal(&key)) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Value::Dict(entries)
            }
            Expression::BinaryOp { lhs, operator, rhs } => {
                let lhs = self.evaluate(lhs, line)?;
                let rhs = self.evaluate(rhs, line)?;
                Self::apply_operator(operator, &lhs, &rhs)
                    .map_err(|kind| RuntimeError::new(kind, line))?
            }
            Expression::Call { name, arguments } => self.evaluate_call(name, arguments, line)?,
            Expression::Lambda { parameters, body } => Value::Func(Rc::new(Function {
                name: None,
                parameters: parameters.clone(),
                body: body.clone(),
            })),
        };
        Ok(value)
    }

    fn apply_operator(
        operator: &BinaryOperator,
        lhs: &Value,
        rhs: &Value,
    ) -> Result<Value, RuntimeErrorKind> {
        match operator {
            BinaryOperator::Multiply => lhs.multiply(rhs),
            BinaryOperator::Divide => lhs.divide(rhs),
            BinaryOperator::Add => lhs.add(rhs),
            BinaryOperator::Subtract => lhs.subtract(rhs),
            BinaryOperator::LessThan => lhs.less_than(rhs),
            BinaryOperator::LessThanEqual => lhs.less_than_or_equal(rhs),
            BinaryOperator::GreaterThan => lhs.greater_than(rhs),
            BinaryOperator::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            BinaryOperator::EqualEqual => Ok(Value::Bool(lhs.is_equal(rhs))),
            BinaryOperator::BangEqual => Ok(Value::Bool(lhs.is_not_equal(rhs))),
            BinaryOperator::Unsupported(symbol) => {
                Err(RuntimeErrorKind::UnsupportedOperator(symbol.clone()))
            }
        }
    }

    /// Variables shadow functions of the same name.
    fn read_variable(&self, name: &str) -> Option<Value> {
        self.scopes
            .lookup(name)
            .cloned()
            .or_else(|| self.functions.get(name).map(Value::Func))
    }

    fn resolve_callee(&self, name: &CompactString) -> Result<Rc<Function>, RuntimeErrorKind> {
        if let Some(function) = self.functions.get(name) {
            return Ok(function);
        }
        match self.scopes.lookup(name) {
            Some(Value::Func(function)) => Ok(function.clone()),
            Some(value) => Err(RuntimeErrorKind::NotCallable {
                name: name.clone(),
                kind: value.type_name(),
            }),
            None => Err(RuntimeErrorKind::UndefinedName(name.clone())),
        }
    }

    fn evaluate_call(
        &mut self,
        name: &CompactString,
        arguments: &[Expression],
        line: u32,
    ) -> Result<Value, RuntimeError> {
        let function = self
            .resolve_callee(name)
            .map_err(|kind| RuntimeError::new(kind, line))?;
        if arguments.len() != function.arity() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::ArityMismatch {
                    name: name.clone(),
                    expected: function.arity(),
                    got: arguments.len(),
                },
                line,
            ));
        }
        let arguments = arguments
            .iter()
            .map(|argument| self.evaluate(argument, line))
            .collect::<Result<Vec<_>, _>>()?;
        self.call_function(&function, arguments, line)
    }

    /// Runs `function` in a fresh frame. The frame is popped however the body finishes.
    pub fn call_function(
        &mut self,
        function: &Function,
        arguments: Vec<Value>,
        line: u32,
    ) -> Result<Value, RuntimeError> {
        let depth = self.scopes.depth();
        if depth >= self.config.max_call_depth {
            return Err(RuntimeError::new(
                RuntimeErrorKind::StackExhausted {
                    depth: self.config.max_call_depth,
                },
                line,
            ));
        }
        trace!(function = function.display_name(), depth = depth + 1, "call");

        self.scopes
            .push_frame(function.parameters.iter().cloned().zip(arguments));
        let result = self.execute(&function.body);
        self.scopes.pop_frame();

        match result? {
            ControlSignal::Normal => Ok(Value::Null),
            ControlSignal::Return(value) => Ok(value),
            ControlSignal::Break => Err(RuntimeError::new(
                RuntimeErrorKind::ControlFlowOutsideLoop("break rest"),
                line,
            )),
            ControlSignal::Continue => Err(RuntimeError::new(
                RuntimeErrorKind::ControlFlowOutsideLoop("continue rest"),
                line,
            )),
        }
    }
}
