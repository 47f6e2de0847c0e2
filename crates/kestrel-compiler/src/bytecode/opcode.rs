//! Bytecode operation codes.
//!
//! The VM is a stack machine. Every instruction carries one operand
//! [`Value`](kestrel_core::Value) whose meaning depends on the opcode.

use std::fmt;

use kestrel_core::ArithmeticOp;

/// Bytecode operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // =========================================================================
    // Constants and stack
    // =========================================================================
    /// Push the operand.
    LoadConst,
    /// Push a copy of the operand, a prototype struct.
    NewStruct,
    /// Discard the top of stack.
    Pop,

    // =========================================================================
    // Arithmetic and comparison
    // =========================================================================
    /// Pop right, pop left, push `left + right`.
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,

    // =========================================================================
    // Variables and fields
    // =========================================================================
    /// Push the value bound to the variable named by the operand.
    LoadVar,
    /// Pop a value into the nearest existing binding of the operand name.
    StoreVar,
    /// Pop a value and bind it in the current scope.
    DefineVar,
    /// Pop a struct, pop a value, push the struct with the field set.
    StoreField,
    /// Pop a struct, push its field.
    LoadField,

    // =========================================================================
    // Control flow
    // =========================================================================
    /// Jump by the operand offset, relative to the next instruction.
    Jump,
    /// Pop a condition; jump by the operand offset if it is false.
    JumpIfFalse,
    /// Call the function named by the operand.
    CallFunc,
    /// Return from the current call, leaving the result on the stack.
    ReturnValue,
    /// Return from the current call.
    Return,
}

impl OpCode {
    /// Get the name of this opcode.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::LoadConst => "LOAD_CONST",
            OpCode::NewStruct => "NEW_STRUCT",
            OpCode::Pop => "POP",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Mod => "MOD",
            OpCode::Eq => "EQ",
            OpCode::Neq => "NEQ",
            OpCode::Lt => "LT",
            OpCode::Lte => "LTE",
            OpCode::Gt => "GT",
            OpCode::Gte => "GTE",
            OpCode::LoadVar => "LOAD_VAR",
            OpCode::StoreVar => "STORE_VAR",
            OpCode::DefineVar => "DEFINE_VAR",
            OpCode::StoreField => "STORE_FIELD",
            OpCode::LoadField => "LOAD_FIELD",
            OpCode::Jump => "JUMP",
            OpCode::JumpIfFalse => "JUMP_IF_FALSE",
            OpCode::CallFunc => "CALL_FUNC",
            OpCode::ReturnValue => "RETURN_VALUE",
            OpCode::Return => "RETURN",
        }
    }

    /// The value operator applied by an arithmetic or comparison opcode.
    pub fn arithmetic_op(&self) -> Option<ArithmeticOp> {
        let op = match self {
            OpCode::Add => ArithmeticOp::Add,
            OpCode::Sub => ArithmeticOp::Sub,
            OpCode::Mul => ArithmeticOp::Mul,
            OpCode::Div => ArithmeticOp::Div,
            OpCode::Mod => ArithmeticOp::Mod,
            OpCode::Eq => ArithmeticOp::Eq,
            OpCode::Neq => ArithmeticOp::Neq,
            OpCode::Lt => ArithmeticOp::Lt,
            OpCode::Lte => ArithmeticOp::Lte,
            OpCode::Gt => ArithmeticOp::Gt,
            OpCode::Gte => ArithmeticOp::Gte,
            _ => return None,
        };
        Some(op)
    }

    /// The opcode applying a value operator.
    pub fn for_arithmetic(op: ArithmeticOp) -> Self {
        match op {
            ArithmeticOp::Add => OpCode::Add,
            ArithmeticOp::Sub => OpCode::Sub,
            ArithmeticOp::Mul => OpCode::Mul,
            ArithmeticOp::Div => OpCode::Div,
            ArithmeticOp::Mod => OpCode::Mod,
            ArithmeticOp::Eq => OpCode::Eq,
            ArithmeticOp::Neq => OpCode::Neq,
            ArithmeticOp::Lt => OpCode::Lt,
            ArithmeticOp::Lte => OpCode::Lte,
            ArithmeticOp::Gt => OpCode::Gt,
            ArithmeticOp::Gte => OpCode::Gte,
        }
    }

    /// Check if this opcode ends the current call.
    pub fn is_return(&self) -> bool {
        matches!(self, OpCode::Return | OpCode::ReturnValue)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
