//! Call frames and the call stack.

use super::scope::ScopeId;

/// One active call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// Called function name, for tracing.
    pub function: String,
    /// The frame's own symbol table.
    pub scope: ScopeId,
    /// Address to resume at once the call returns.
    pub return_address: usize,
}

impl CallFrame {
    pub fn new(function: impl Into<String>, scope: ScopeId, return_address: usize) -> Self {
        Self {
            function: function.into(),
            scope,
            return_address,
        }
    }
}

/// Active calls, innermost last.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: CallFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<CallFrame> {
        self.frames.pop()
    }

    /// The currently executing frame.
    pub fn current(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Number of active frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Function names from outermost to innermost.
    pub fn backtrace(&self) -> Vec<&str> {
        self.frames.iter().map(|f| f.function.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_frame_is_current() {
        let mut calls = CallStack::new();
        assert!(calls.current().is_none());

        calls.push(CallFrame::new("main", ScopeId::GLOBAL, 10));
        calls.push(CallFrame::new("add", ScopeId::GLOBAL, 3));

        assert_eq!(calls.depth(), 2);
        assert_eq!(calls.current().map(|f| f.function.as_str()), Some("add"));
        assert_eq!(calls.backtrace(), vec!["main", "add"]);

        let popped = calls.pop().unwrap();
        assert_eq!(popped.return_address, 3);
        assert_eq!(calls.depth(), 1);
    }
}
