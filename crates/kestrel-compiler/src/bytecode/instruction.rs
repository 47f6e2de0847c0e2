//! A single bytecode instruction.

use std::fmt;

use kestrel_core::Value;

use super::OpCode;

/// One instruction: opcode, operand and a provenance tag.
///
/// The operand is a constant to push, a variable, field or function name
/// (as a String value), a relative jump offset (Int), or unused (None). The
/// debug tag is never consulted by the VM.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: Value,
    pub debug_tag: String,
}

impl Instruction {
    /// Create an instruction.
    pub fn new(opcode: OpCode, operand: Value, debug_tag: impl Into<String>) -> Self {
        Self {
            opcode,
            operand,
            debug_tag: debug_tag.into(),
        }
    }

    /// Create an instruction with no operand.
    pub fn bare(opcode: OpCode, debug_tag: impl Into<String>) -> Self {
        Self::new(opcode, Value::None, debug_tag)
    }

    /// Create an instruction whose operand is a name.
    pub fn named(opcode: OpCode, name: &str, debug_tag: impl Into<String>) -> Self {
        Self::new(opcode, Value::from(name), debug_tag)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<13}", self.opcode.name())?;
        if !self.operand.is_none() {
            write!(f, " {}", self.operand)?;
        }
        if !self.debug_tag.is_empty() {
            write!(f, " ; {}", self.debug_tag)?;
        }
        Ok(())
    }
}
