use super::value::{Function, Value};
use compact_str::CompactString;
use std::{collections::HashMap, rc::Rc};

type Frame = HashMap<CompactString, Value>;

/// Variable frames, global at the bottom and one per active call above it.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    /// Number of call frames above the global frame.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn push_frame(&mut self, bindings: impl IntoIterator<Item = (CompactString, Value)>) {
        self.frames.push(bindings.into_iter().collect());
    }

    pub fn pop_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "the global frame is never popped");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Resolves a name in the innermost frame, then the global frame. Frames of suspended
    /// callers are never consulted.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let innermost = self.frames.last()?;
        innermost
            .get(name)
            .or_else(|| self.frames.first().and_then(|global| global.get(name)))
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.frames.first().and_then(|global| global.get(name))
    }

    /// Binds in the innermost frame only.
    pub fn assign(&mut self, name: CompactString, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, value);
        }
    }
}

#[derive(Debug, Default)]
pub struct FunctionTable {
    functions: HashMap<CompactString, Rc<Function>>,
}

impl FunctionTable {
    /// Registers `function`, returning whether an earlier definition was replaced.
    pub fn define(&mut self, name: CompactString, function: Rc<Function>) -> bool {
        self.functions.insert(name, function).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Rc<Function>> {
        self.functions.get(name).cloned()
    }
}
