//! Bytecode emitter for the kestrel compiler.
//!
//! The [`BytecodeEmitter`] appends instructions to a [`Bytecode`] under a
//! current debug tag and manages forward jumps.
//!
//! # Example
//!
//! ```
//! use kestrel_compiler::bytecode::OpCode;
//! use kestrel_compiler::emit::BytecodeEmitter;
//! use kestrel_core::Value;
//!
//! let mut emitter = BytecodeEmitter::new();
//! emitter.set_tag("main:return");
//! emitter.emit_operand(OpCode::LoadConst, Value::Int(42));
//! emitter.emit(OpCode::ReturnValue);
//!
//! let bytecode = emitter.finish();
//! bytecode.assert_opcodes(&[OpCode::LoadConst, OpCode::ReturnValue]);
//! ```

use kestrel_core::Value;

use crate::bytecode::{Bytecode, Instruction, OpCode};

/// Emits bytecode instructions.
///
/// Each `BytecodeEmitter` produces the body of one function (or the global
/// initializer); bodies are appended to the program afterwards. All jump
/// offsets are relative, so a body can be placed at any address.
#[derive(Debug, Default)]
pub struct BytecodeEmitter {
    bytecode: Bytecode,
    tag: String,
}

impl BytecodeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debug tag attached to subsequent instructions.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Get the current debug tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Emit an opcode with no operand.
    pub fn emit(&mut self, op: OpCode) {
        self.emit_operand(op, Value::None);
    }

    /// Emit an opcode with a value operand.
    pub fn emit_operand(&mut self, op: OpCode, operand: Value) {
        self.bytecode
            .push(Instruction::new(op, operand, self.tag.clone()));
    }

    /// Emit an opcode whose operand is a variable, field or function name.
    pub fn emit_named(&mut self, op: OpCode, name: &str) {
        self.emit_operand(op, Value::from(name));
    }

    /// Emit a constant load.
    pub fn emit_constant(&mut self, value: Value) {
        self.emit_operand(OpCode::LoadConst, value);
    }

    // ==========================================================================
    // Jumps
    // ==========================================================================

    /// Emit a forward jump with a placeholder offset.
    ///
    /// The returned label must be passed to [`patch_jump`](Self::patch_jump)
    /// once the target is known.
    pub fn emit_jump(&mut self, op: OpCode) -> JumpLabel {
        let address = self.current_offset();
        self.emit_operand(op, Value::Int(0));
        JumpLabel(address)
    }

    /// Patch a forward jump to land on the next emitted instruction.
    pub fn patch_jump(&mut self, label: JumpLabel) {
        let offset = self.current_offset() - (label.0 + 1);
        if let Some(instruction) = self.bytecode.get_mut(label.0) {
            instruction.operand = Value::Int(offset as i64);
        }
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Address of the next emitted instruction, relative to this body.
    pub fn current_offset(&self) -> usize {
        self.bytecode.len()
    }

    /// Finish emission and return the bytecode.
    pub fn finish(self) -> Bytecode {
        self.bytecode
    }
}

/// A jump waiting for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel(usize);

impl JumpLabel {
    /// Get the offset of the jump instruction.
    pub fn offset(&self) -> usize {
        self.0
    }
}
