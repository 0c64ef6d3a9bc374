use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Undefined name `{0}`.")]
    UndefinedName(CompactString),
    #[error("`{name}` is a {kind} and cannot be called.")]
    NotCallable {
        name: CompactString,
        kind: &'static str,
    },
    #[error("`{name}` expects {expected} argument(s) but got {got}.")]
    ArityMismatch {
        name: CompactString,
        expected: usize,
        got: usize,
    },
    #[error("Unsupported operator `{0}`.")]
    UnsupportedOperator(CompactString),
    #[error("Operator `{operator}` cannot be applied to {lhs} and {rhs}.")]
    InvalidOperands {
        operator: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Integer overflow in `{0}`.")]
    Overflow(&'static str),
    #[error("`{0}` used outside of a loop.")]
    ControlFlowOutsideLoop(&'static str),
    #[error("Call depth exceeded {depth}.")]
    StackExhausted { depth: usize },
}

impl RuntimeErrorKind {
    pub fn category(&self) -> &'static str {
        match self {
            Self::UndefinedName(_) | Self::NotCallable { .. } => "NameError",
            Self::ArityMismatch { .. } => "ArityError",
            Self::UnsupportedOperator(_)
            | Self::InvalidOperands { .. }
            | Self::DivisionByZero
            | Self::Overflow(_) => "OperatorError",
            Self::ControlFlowOutsideLoop(_) => "ControlFlowError",
            Self::StackExhausted { .. } => "StackExhausted",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {line}] {kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub line: u32,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: u32) -> Self {
        Self { kind, line }
    }

    pub fn category(&self) -> &'static str {
        self.kind.category()
    }

    /// Whether a `try` block may catch this error. Exhausting the call stack is fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.kind, RuntimeErrorKind::StackExhausted { .. })
    }
}
