//! The operand stack shared by all frames.

use kestrel_core::{RuntimeError, Value};

/// A bounded LIFO stack of values.
#[derive(Debug, Clone)]
pub struct OperandStack {
    values: Vec<Value>,
    limit: usize,
}

impl OperandStack {
    /// Create an empty stack holding at most `limit` values.
    pub fn new(limit: usize) -> Self {
        Self {
            values: Vec::new(),
            limit,
        }
    }

    /// Push a value, failing with `StackOverflow` at the limit.
    pub fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.values.len() >= self.limit {
            return Err(RuntimeError::StackOverflow { limit: self.limit });
        }
        self.values.push(value);
        Ok(())
    }

    /// Pop a value, failing with `StackUnderflow` when empty.
    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    pub fn peek(&self) -> Option<&Value> {
        self.values.last()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_order() {
        let mut stack = OperandStack::new(8);
        stack.push(Value::Int(1)).unwrap();
        stack.push(Value::Int(2)).unwrap();
        assert_eq!(stack.peek(), Some(&Value::Int(2)));
        assert_eq!(stack.pop(), Ok(Value::Int(2)));
        assert_eq!(stack.pop(), Ok(Value::Int(1)));
        assert!(stack.is_empty());
    }

    #[test]
    fn underflow() {
        let mut stack = OperandStack::new(8);
        assert_eq!(stack.pop(), Err(RuntimeError::StackUnderflow));
    }

    #[test]
    fn overflow_at_limit() {
        let mut stack = OperandStack::new(2);
        stack.push(Value::None).unwrap();
        stack.push(Value::None).unwrap();
        assert_eq!(
            stack.push(Value::None),
            Err(RuntimeError::StackOverflow { limit: 2 })
        );
        assert_eq!(stack.len(), 2);
    }
}
