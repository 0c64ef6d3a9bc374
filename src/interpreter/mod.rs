pub mod context;
pub mod environment;
pub mod error;
mod tree;
pub mod value;

pub use tree::TreeWalkInterpreter;
use value::Value;

/// Outcome of running a statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlSignal {
    Normal,
    Break,
    Continue,
    Return(Value),
}

pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Calls nested deeper than this fail with `StackExhausted`.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
        }
    }
}
