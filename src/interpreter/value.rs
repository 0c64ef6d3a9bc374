use super::error::RuntimeErrorKind;
use crate::{parser::statement::Statement, stack::ensure_sufficient_stack};
use compact_str::{CompactString, CompactStringExt};
use std::{fmt::Display, rc::Rc};

/// Longest string, in bytes, that repetition may build.
pub const MAX_STRING_LENGTH: usize = 1 << 24;

/// A named function or a lambda. Holds no captured scope.
#[derive(Debug)]
pub struct Function {
    pub name: Option<CompactString>,
    pub parameters: Rc<[CompactString]>,
    pub body: Rc<[Statement]>,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<lambda>")
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Str(CompactString),
    Bool(bool),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Func(Rc<Function>),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Func(_) => "function",
            Value::Null => "null",
        }
    }

    /// Display form used inside containers, where strings keep their quotes.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(v) => format!("\"{v}\""),
            v => v.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ensure_sufficient_stack(|| match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::List(elements) => {
                let elements: Vec<String> = elements.iter().map(Value::repr).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Self::Dict(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key.repr(), value.repr()))
                    .collect();
                write!(f, "{{{}}}", entries.join(", "))
            }
            Self::Func(function) => match &function.name {
                Some(name) => write!(f, "<function {name}>"),
                None => write!(f, "<lambda>"),
            },
            Self::Null => write!(f, "null"),
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            Value::Int(v) => *v != 0,
            Value::Str(v) => !v.is_empty(),
            Value::List(v) => !v.is_empty(),
            Value::Dict(v) => !v.is_empty(),
            Value::Func(_) => true,
            Value::Null => false,
        }
    }

    fn invalid(operator: &'static str, lhs: &Value, rhs: &Value) -> RuntimeErrorKind {
        RuntimeErrorKind::InvalidOperands {
            operator,
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }
    }

    fn checked(
        operator: &'static str,
        lhs: &Value,
        rhs: &Value,
        op: impl FnOnce(i64, i64) -> Option<i64>,
    ) -> Result<Value, RuntimeErrorKind> {
        match (lhs, rhs) {
            (Value::Int(l), Value::Int(r)) => op(*l, *r)
                .map(Value::Int)
                .ok_or(RuntimeErrorKind::Overflow(operator)),
            (l, r) => Err(Self::invalid(operator, l, r)),
        }
    }
}

impl Value {
    // Arithmetic, string and list concatenation
    pub fn add(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Str(lhs), Value::Str(rhs)) => Ok(Value::Str([lhs, rhs].concat_compact())),
            (Value::List(lhs), Value::List(rhs)) => {
                Ok(Value::List(lhs.iter().chain(rhs).cloned().collect()))
            }
            (lhs, rhs) => Self::checked("+", lhs, rhs, i64::checked_add),
        }
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        Self::checked("-", self, other, i64::checked_sub)
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Str(text), Value::Int(count)) | (Value::Int(count), Value::Str(text)) => {
                let count = usize::try_from(*count).map_err(|_| Self::invalid("*", self, other))?;
                match text.len().checked_mul(count) {
                    Some(length) if length <= MAX_STRING_LENGTH => {
                        Ok(Value::Str(text.repeat(count).into()))
                    }
                    _ => Err(RuntimeErrorKind::Overflow("*")),
                }
            }
            (lhs, rhs) => Self::checked("*", lhs, rhs, i64::checked_mul),
        }
    }

    /// Truncating integer division.
    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        match (self, other) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeErrorKind::DivisionByZero),
            (lhs, rhs) => Self::checked("/", lhs, rhs, i64::checked_div),
        }
    }

    // Comparison
    fn compare(
        operator: &'static str,
        lhs: &Value,
        rhs: &Value,
        test: impl FnOnce(std::cmp::Ordering) -> bool,
    ) -> Result<Value, RuntimeErrorKind> {
        match (lhs, rhs) {
            (Value::Int(l), Value::Int(r)) => Ok(Value::Bool(test(l.cmp(r)))),
            (Value::Str(l), Value::Str(r)) => Ok(Value::Bool(test(l.cmp(r)))),
            (l, r) => Err(Self::invalid(operator, l, r)),
        }
    }

    pub fn less_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        Self::compare("<", self, other, |ordering| ordering.is_lt())
    }

    pub fn less_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        Self::compare("<=", self, other, |ordering| ordering.is_le())
    }

    pub fn greater_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        Self::compare(">", self, other, |ordering| ordering.is_gt())
    }

    pub fn greater_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        Self::compare(">=", self, other, |ordering| ordering.is_ge())
    }

    // Equality
    pub fn is_equal(&self, other: &Value) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (Value::Int(lhs), Value::Int(rhs)) => lhs == rhs,
            (Value::Str(lhs), Value::Str(rhs)) => lhs == rhs,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::List(lhs), Value::List(rhs)) => {
                lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| l.is_equal(r))
            }
            (Value::Dict(lhs), Value::Dict(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().all(|(key, value)| {
                        rhs.iter()
                            .any(|(k, v)| k.is_equal(key) && v.is_equal(value))
                    })
            }
            (Value::Func(lhs), Value::Func(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Value::Null, Value::Null) => true,
            _ => false,
        })
    }

    pub fn is_not_equal(&self, other: &Value) -> bool {
        !self.is_equal(other)
    }
}
